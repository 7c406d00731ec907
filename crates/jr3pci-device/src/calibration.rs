//! Calibration and housekeeping registers.
//!
//! These helpers read the blocks that surround the filtered force data:
//! the copyright banner, shunts, full scales, offsets, sensor settings,
//! peaks, raw transducer data and the filter sample counters.

use jr3pci_ioctl::registers::{
    raw_data_offset, AXES, COPYRIGHT, COPYRIGHT_WORDS, COUNT1, COUNTER_COUNT, DEFAULT_FULL_SCALE,
    FILTER_COUNT, FORCE_WORDS, FULL_SCALE, LOAD_ENVELOPE_NUM, MAXIMUM_DATA, MAX_FULL_SCALE,
    MINIMUM_DATA, MIN_FULL_SCALE, OFFSETS, OFFSET_NUM, SHUNTS, TRANSFORM_NUM, VECT_AXES,
};
use jr3pci_transport::ControlDevice;

use crate::error::{DeviceError, Result};
use crate::facade::Jr3Pci;
use crate::sample::{ForceArray, FullScaleLimit, Peaks, ScaledForces, SensorSettings};

fn signed<const N: usize>(words: [u16; N]) -> [i16; N] {
    words.map(|w| w as i16)
}

impl<D: ControlDevice> Jr3Pci<D> {
    /// Copyright banner stored in the DSP.
    ///
    /// Each word holds two characters, high byte first.
    pub fn copyright(&mut self, channel: u8) -> Result<String> {
        let words: [u16; COPYRIGHT_WORDS] = self.read_array(channel, COPYRIGHT)?;
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        let text = String::from_utf8_lossy(&bytes).replace('\0', "");
        Ok(text.trim().to_string())
    }

    /// Shunt readings per axis (fx..mz).
    pub fn shunts(&mut self, channel: u8) -> Result<[i16; AXES]> {
        Ok(signed(self.read_array(channel, SHUNTS)?))
    }

    /// Factory default full scale per axis (fx..mz).
    pub fn default_full_scales(&mut self, channel: u8) -> Result<[i16; AXES]> {
        Ok(signed(self.read_array(channel, DEFAULT_FULL_SCALE)?))
    }

    /// Load envelope, transform, offset and vector-axes selections.
    pub fn sensor_settings(&mut self, channel: u8) -> Result<SensorSettings> {
        Ok(SensorSettings {
            load_envelope: self.read_word(channel, LOAD_ENVELOPE_NUM)?,
            transform: self.read_word(channel, TRANSFORM_NUM)?,
            offset_number: self.read_word(channel, OFFSET_NUM)?,
            vector_axes: self.read_word(channel, VECT_AXES)?,
        })
    }

    /// Minimum and maximum peak blocks.
    pub fn peaks(&mut self, channel: u8) -> Result<Peaks> {
        let min: [u16; FORCE_WORDS] = self.read_array(channel, MINIMUM_DATA)?;
        let max: [u16; FORCE_WORDS] = self.read_array(channel, MAXIMUM_DATA)?;
        Ok(Peaks {
            min: ForceArray::from_words(min),
            max: ForceArray::from_words(max),
        })
    }

    /// Active full scale, one value per force/torque field.
    pub fn full_scales(&mut self, channel: u8) -> Result<ForceArray> {
        let words: [u16; FORCE_WORDS] = self.read_array(channel, FULL_SCALE)?;
        Ok(ForceArray::from_words(words))
    }

    /// Minimum and maximum full scale per axis (fx..mz).
    pub fn full_scale_limits(&mut self, channel: u8) -> Result<[FullScaleLimit; AXES]> {
        let mins = signed(self.read_array::<AXES>(channel, MIN_FULL_SCALE)?);
        let maxs = signed(self.read_array::<AXES>(channel, MAX_FULL_SCALE)?);
        Ok(std::array::from_fn(|i| FullScaleLimit {
            min: mins[i],
            max: maxs[i],
        }))
    }

    /// Sensor offsets per axis (fx..mz).
    pub fn offsets(&mut self, channel: u8) -> Result<[i16; AXES]> {
        Ok(signed(self.read_array(channel, OFFSETS)?))
    }

    /// The six filter sample counters, counter 1 first.
    pub fn counters(&mut self, channel: u8) -> Result<[u16; COUNTER_COUNT]> {
        self.read_array(channel, COUNT1)
    }

    /// Unfiltered transducer readings of raw channels 1 through 6.
    pub fn raw_readings(&mut self, channel: u8) -> Result<[i16; AXES]> {
        let mut readings = [0i16; AXES];
        for (i, slot) in readings.iter_mut().enumerate() {
            *slot = self.read_word(channel, raw_data_offset(i as u32 + 1))? as i16;
        }
        Ok(readings)
    }

    /// Raw readings, optionally offset-corrected, scaled by full scale.
    pub fn scaled_raw_readings(
        &mut self,
        channel: u8,
        apply_offsets: bool,
    ) -> Result<[f64; AXES]> {
        let raw = self.raw_readings(channel)?;
        let offsets = if apply_offsets {
            self.offsets(channel)?
        } else {
            [0; AXES]
        };
        let fs = self.full_scales(channel)?.to_array();
        Ok(std::array::from_fn(|i| {
            (f64::from(raw[i]) + f64::from(offsets[i])) / ScaledForces::COUNTS_PER_FULL_SCALE
                * f64::from(fs[i])
        }))
    }

    /// Filtered force/torque block scaled into engineering units.
    pub fn scaled_forces(&mut self, channel: u8, filter: u8) -> Result<ScaledForces> {
        if filter >= FILTER_COUNT {
            return Err(DeviceError::InvalidFilter {
                filter,
                min: 0,
                max: FILTER_COUNT - 1,
            });
        }
        let raw = self.force_array(channel, filter)?;
        let full_scale = self.full_scales(channel)?;
        Ok(ScaledForces::from_raw(raw, full_scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedDriver;

    #[test]
    fn copyright_decodes_big_endian_pairs() {
        let mut card = Jr3Pci::new(SimulatedDriver::demo());
        assert_eq!(card.copyright(0).unwrap(), "CALIBRATION DATA COPYRIGHT JR3 INC.");
    }

    #[test]
    fn copyright_drops_nul_padding() {
        let mut sim = SimulatedDriver::new(1);
        sim.set_registers(0, COPYRIGHT, &[0x4A52, 0x3300]);
        let mut card = Jr3Pci::new(sim);
        assert_eq!(card.copyright(0).unwrap(), "JR3");
    }

    #[test]
    fn full_scale_limits_pair_min_and_max() {
        let mut card = Jr3Pci::new(SimulatedDriver::demo());
        let limits = card.full_scale_limits(0).unwrap();
        assert_eq!(limits[0], FullScaleLimit { min: 50, max: 400 });
        assert_eq!(limits[2], FullScaleLimit { min: 100, max: 800 });
    }

    #[test]
    fn shunts_and_default_full_scales_come_from_their_blocks() {
        let mut sim = SimulatedDriver::new(1);
        sim.set_registers(0, SHUNTS, &[1, 2, 3, 4, 5, (-6i16) as u16]);
        sim.set_registers(0, DEFAULT_FULL_SCALE, &[10, 20, 30, 40, 50, 60]);
        let mut card = Jr3Pci::new(sim);
        assert_eq!(card.shunts(0).unwrap(), [1, 2, 3, 4, 5, -6]);
        assert_eq!(card.default_full_scales(0).unwrap(), [10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn sensor_settings_read_single_words() {
        let mut sim = SimulatedDriver::new(1);
        sim.set_register(0, LOAD_ENVELOPE_NUM, 1);
        sim.set_register(0, TRANSFORM_NUM, 2);
        sim.set_register(0, OFFSET_NUM, 3);
        sim.set_register(0, VECT_AXES, 0x3f);
        let mut card = Jr3Pci::new(sim);
        assert_eq!(
            card.sensor_settings(0).unwrap(),
            SensorSettings {
                load_envelope: 1,
                transform: 2,
                offset_number: 3,
                vector_axes: 0x3f,
            }
        );
    }

    #[test]
    fn peaks_decode_signed_blocks() {
        let mut sim = SimulatedDriver::new(1);
        sim.set_registers(0, MINIMUM_DATA, &[(-100i16) as u16, 0, 0, 0, 0, 0, 0, 0]);
        sim.set_registers(0, MAXIMUM_DATA, &[0, 0, 250, 0, 0, 0, 0, 0]);
        let mut card = Jr3Pci::new(sim);
        let peaks = card.peaks(0).unwrap();
        assert_eq!(peaks.min.fx, -100);
        assert_eq!(peaks.max.fz, 250);
    }

    #[test]
    fn offsets_are_signed() {
        let mut card = Jr3Pci::new(SimulatedDriver::demo());
        assert_eq!(card.offsets(0).unwrap(), [12, -8, 40, 0, -3, 1]);
    }

    #[test]
    fn counters_read_from_count1() {
        let mut sim = SimulatedDriver::new(1);
        sim.set_registers(0, COUNT1, &[1, 2, 3, 4, 5, 6]);
        let mut card = Jr3Pci::new(sim);
        assert_eq!(card.counters(0).unwrap(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn raw_readings_skip_time_words() {
        let mut sim = SimulatedDriver::new(1);
        for i in 0..32u32 {
            sim.set_register(0, i, i as u16);
        }
        let mut card = Jr3Pci::new(sim);
        assert_eq!(card.raw_readings(0).unwrap(), [5, 9, 13, 17, 21, 25]);
    }

    #[test]
    fn scaled_raw_readings_apply_offsets() {
        let mut sim = SimulatedDriver::new(1);
        sim.set_register(0, raw_data_offset(1), 8000);
        sim.set_register(0, OFFSETS, 192);
        sim.set_register(0, FULL_SCALE, 100);
        let mut card = Jr3Pci::new(sim);

        let plain = card.scaled_raw_readings(0, false).unwrap();
        let corrected = card.scaled_raw_readings(0, true).unwrap();
        assert!((plain[0] - 8000.0 / 16384.0 * 100.0).abs() < 1e-9);
        assert!((corrected[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn scaled_forces_divide_by_two_to_the_fourteen() {
        let mut sim = SimulatedDriver::new(1);
        sim.set_registers(0, FULL_SCALE, &[100, 100, 200, 50, 50, 50, 0, 0]);
        sim.set_registers(0, 0x98, &[16384, (-8192i16) as u16, 4096, 0, 0, 0, 0, 0]);
        let mut card = Jr3Pci::new(sim);

        let f = card.scaled_forces(0, 1).unwrap();
        assert_eq!(f.fx, 100.0);
        assert_eq!(f.fy, -50.0);
        assert_eq!(f.fz, 50.0);
    }

    #[test]
    fn scaled_forces_reject_missing_filter() {
        let mut card = Jr3Pci::new(SimulatedDriver::new(1));
        let err = card.scaled_forces(0, 7).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::InvalidFilter {
                filter: 7,
                min: 0,
                max: 6
            }
        ));
        assert!(card.device().log().is_empty());
    }
}
