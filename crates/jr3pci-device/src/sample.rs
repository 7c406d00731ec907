use jr3pci_ioctl::registers::FORCE_WORDS;
use serde::Serialize;

/// One force/torque block in raw transducer counts.
///
/// Field order matches the firmware's register layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ForceArray {
    pub fx: i16,
    pub fy: i16,
    pub fz: i16,
    pub mx: i16,
    pub my: i16,
    pub mz: i16,
    pub v1: i16,
    pub v2: i16,
}

impl ForceArray {
    /// Field names in register order.
    pub const FIELDS: [&'static str; FORCE_WORDS] =
        ["fx", "fy", "fz", "mx", "my", "mz", "v1", "v2"];

    /// Decode eight register words, reinterpreting each as a signed value.
    pub fn from_words(words: [u16; FORCE_WORDS]) -> Self {
        Self {
            fx: words[0] as i16,
            fy: words[1] as i16,
            fz: words[2] as i16,
            mx: words[3] as i16,
            my: words[4] as i16,
            mz: words[5] as i16,
            v1: words[6] as i16,
            v2: words[7] as i16,
        }
    }

    /// Values in register order.
    pub fn to_array(self) -> [i16; FORCE_WORDS] {
        [
            self.fx, self.fy, self.fz, self.mx, self.my, self.mz, self.v1, self.v2,
        ]
    }
}

/// A force/torque block tagged with the filter's sample counter.
///
/// `count` and `forces` come from two separate driver requests. The driver
/// does not promise both were captured at the same DSP cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClockedForceArray {
    pub count: u16,
    #[serde(flatten)]
    pub forces: ForceArray,
}

/// A force/torque block scaled into engineering units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScaledForces {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
    pub v1: f64,
    pub v2: f64,
}

impl ScaledForces {
    /// Raw count that corresponds to the full-scale value (2^14).
    pub const COUNTS_PER_FULL_SCALE: f64 = 16384.0;

    /// Scale each raw value by its matching full-scale value.
    pub fn from_raw(raw: ForceArray, full_scale: ForceArray) -> Self {
        let s = |value: i16, fs: i16| {
            f64::from(value) / Self::COUNTS_PER_FULL_SCALE * f64::from(fs)
        };
        Self {
            fx: s(raw.fx, full_scale.fx),
            fy: s(raw.fy, full_scale.fy),
            fz: s(raw.fz, full_scale.fz),
            mx: s(raw.mx, full_scale.mx),
            my: s(raw.my, full_scale.my),
            mz: s(raw.mz, full_scale.mz),
            v1: s(raw.v1, full_scale.v1),
            v2: s(raw.v2, full_scale.v2),
        }
    }

    /// Values in register order.
    pub fn to_array(self) -> [f64; FORCE_WORDS] {
        [
            self.fx, self.fy, self.fz, self.mx, self.my, self.mz, self.v1, self.v2,
        ]
    }
}

/// Allowed full-scale range for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FullScaleLimit {
    pub min: i16,
    pub max: i16,
}

/// Peak force/torque values held by the DSP since they were last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Peaks {
    pub min: ForceArray,
    pub max: ForceArray,
}

/// Single-word sensor configuration registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SensorSettings {
    pub load_envelope: u16,
    pub transform: u16,
    pub offset_number: u16,
    pub vector_axes: u16,
}

/// Bitmap of populated sensor channels; bit `i` set means channel `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ChannelMask(pub u32);

impl ChannelMask {
    /// The raw bitmap as reported by the driver.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether `channel` is populated.
    pub fn contains(self, channel: u8) -> bool {
        channel < 32 && self.0 & (1 << channel) != 0
    }

    /// Number of populated channels.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether no channel is populated.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Populated channel numbers, ascending.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0u8..32).filter(move |&ch| self.contains(ch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_decode_in_register_order() {
        let words = [10u16, (-5i16) as u16, 3, 0, 0, 0, 1, 2];
        let fa = ForceArray::from_words(words);
        assert_eq!(fa.fx, 10);
        assert_eq!(fa.fy, -5);
        assert_eq!(fa.fz, 3);
        assert_eq!((fa.mx, fa.my, fa.mz), (0, 0, 0));
        assert_eq!((fa.v1, fa.v2), (1, 2));
        assert_eq!(fa.to_array(), [10, -5, 3, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn extreme_words_reinterpret_as_signed() {
        let fa = ForceArray::from_words([0x8000, 0xFFFF, 0x7FFF, 0, 0, 0, 0, 0]);
        assert_eq!(fa.fx, i16::MIN);
        assert_eq!(fa.fy, -1);
        assert_eq!(fa.fz, i16::MAX);
    }

    #[test]
    fn scaling_uses_two_to_the_fourteen() {
        let raw = ForceArray {
            fx: 8192,
            fy: -16384,
            ..ForceArray::default()
        };
        let fs = ForceArray {
            fx: 100,
            fy: 50,
            ..ForceArray::default()
        };
        let scaled = ScaledForces::from_raw(raw, fs);
        assert_eq!(scaled.fx, 50.0);
        assert_eq!(scaled.fy, -50.0);
        assert_eq!(scaled.fz, 0.0);
    }

    #[test]
    fn clocked_sample_serializes_flat() {
        let sample = ClockedForceArray {
            count: 7,
            forces: ForceArray {
                fz: -3,
                ..ForceArray::default()
            },
        };
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["count"], 7);
        assert_eq!(json["fz"], -3);
    }

    #[test]
    fn channel_mask_iterates_set_bits() {
        let mask = ChannelMask(0b1000_0101);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![0, 2, 7]);
        assert_eq!(mask.len(), 3);
        assert!(mask.contains(2));
        assert!(!mask.contains(1));
        assert!(!mask.contains(40));
        assert!(ChannelMask(0).is_empty());
    }

    #[test]
    fn channel_mask_high_bit() {
        let mask = ChannelMask(0x8000_0000);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![31]);
        assert_eq!(mask.bits(), 0x8000_0000);
    }
}
