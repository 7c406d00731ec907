//! Word offsets into a channel's DSP register space.
//!
//! These values are fixed by the card's firmware and the driver's
//! published headers. They are mirrored here exactly; nothing in this
//! crate derives them from data.

/// Raw transducer channels: four words each, data word at +1.
pub const RAW_CHANNELS: u32 = 0x00;
/// Words per raw channel record.
pub const RAW_CHANNEL_STRIDE: u32 = 4;
/// Copyright string.
pub const COPYRIGHT: u32 = 0x40;
/// Words of the copyright string read back by the tooling.
pub const COPYRIGHT_WORDS: usize = 18;
/// Shunt readings (6 words).
pub const SHUNTS: u32 = 0x60;
/// Default full scale (6 words).
pub const DEFAULT_FULL_SCALE: u32 = 0x68;
/// Load envelope number.
pub const LOAD_ENVELOPE_NUM: u32 = 0x6f;
/// Minimum full scale (6 words).
pub const MIN_FULL_SCALE: u32 = 0x70;
/// Transform number.
pub const TRANSFORM_NUM: u32 = 0x77;
/// Maximum full scale (6 words).
pub const MAX_FULL_SCALE: u32 = 0x78;
/// Active full scale (8 words, same layout as a force array).
pub const FULL_SCALE: u32 = 0x80;
/// Sensor offsets (6 words).
pub const OFFSETS: u32 = 0x88;
/// Active offset number.
pub const OFFSET_NUM: u32 = 0x8e;
/// Vector axes selection.
pub const VECT_AXES: u32 = 0x8f;
/// First filtered force/torque block.
pub const FILTER_BASE: u32 = 0x90;
/// Words per filter block.
pub const FILTER_STRIDE: u32 = 8;
/// Number of filter blocks (filters 0 through 6).
pub const FILTER_COUNT: u8 = 7;
/// Rate data block.
pub const RATE_DATA: u32 = 0xc8;
/// Minimum peak data block.
pub const MINIMUM_DATA: u32 = 0xd0;
/// Maximum peak data block.
pub const MAXIMUM_DATA: u32 = 0xd8;
/// First of the six filter sample counters.
pub const COUNT1: u32 = 0xe8;
/// Number of filter sample counters.
pub const COUNTER_COUNT: usize = 6;
/// Words in one force/torque block.
pub const FORCE_WORDS: usize = 8;
/// Force and moment axes (fx..mz).
pub const AXES: usize = 6;

/// Offset of the force/torque block for `filter`.
pub const fn filter_offset(filter: u8) -> u32 {
    FILTER_BASE + FILTER_STRIDE * filter as u32
}

/// Offset of the sample counter paired with `filter`.
///
/// Counter `n` (1-based) clocks filter `n`, so filter 0 lands one word
/// before `COUNT1`.
pub const fn counter_offset(filter: u8) -> u32 {
    COUNT1 - 1 + filter as u32
}

/// Offset of the data word of raw channel `index`.
pub const fn raw_data_offset(index: u32) -> u32 {
    RAW_CHANNELS + RAW_CHANNEL_STRIDE * index + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_blocks_are_contiguous() {
        assert_eq!(filter_offset(0), 0x90);
        assert_eq!(filter_offset(1), 0x98);
        assert_eq!(filter_offset(6), 0xc0);
        assert_eq!(filter_offset(FILTER_COUNT), RATE_DATA);
    }

    #[test]
    fn counter_offsets() {
        assert_eq!(counter_offset(1), COUNT1);
        assert_eq!(counter_offset(0), 0xe7);
        assert_eq!(counter_offset(6), 0xed);
    }

    #[test]
    fn raw_data_offsets_match_tooling() {
        let offsets: Vec<u32> = (1..=6).map(raw_data_offset).collect();
        assert_eq!(offsets, vec![5, 9, 13, 17, 21, 25]);
    }

    #[test]
    fn large_filter_does_not_overflow() {
        assert_eq!(filter_offset(u8::MAX), 0x90 + 8 * 255);
        assert_eq!(counter_offset(u8::MAX), 0xe7 + 255);
    }
}
