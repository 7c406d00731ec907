use jr3pci_ioctl::registers::COUNTER_COUNT;

use crate::error::{DeviceError, Result};

/// DSP base sample rate in Hz (filter 1).
pub const BASE_SAMPLE_RATE_HZ: f64 = 8000.0;

/// Converts a filter's 16-bit sample counter into elapsed time.
///
/// Counter `n` ticks once per output sample of filter `n`, and each filter
/// runs at a quarter of the rate of the one before it. The counter wraps
/// at 2^16; every time an observation is smaller than the previous one a
/// wrap is assumed, so observations must arrive more often than once per
/// wrap period.
#[derive(Debug, Clone)]
pub struct SampleClock {
    rate_hz: f64,
    origin: Option<u16>,
    last: u16,
    wraps: u64,
}

impl SampleClock {
    /// A clock for `filter` (1-6) whose origin is the first observed count.
    pub fn new(filter: u8) -> Result<Self> {
        let rate_hz = Self::sample_rate(filter).ok_or(DeviceError::InvalidFilter {
            filter,
            min: 1,
            max: COUNTER_COUNT as u8,
        })?;
        Ok(Self {
            rate_hz,
            origin: None,
            last: 0,
            wraps: 0,
        })
    }

    /// A clock for `filter` whose origin is a previously read counter.
    pub fn with_origin(filter: u8, origin: u16) -> Result<Self> {
        let mut clock = Self::new(filter)?;
        clock.origin = Some(origin);
        clock.last = origin;
        Ok(clock)
    }

    /// Output sample rate of `filter` in Hz, if the filter has a counter.
    pub fn sample_rate(filter: u8) -> Option<f64> {
        if filter == 0 || usize::from(filter) > COUNTER_COUNT {
            return None;
        }
        Some(BASE_SAMPLE_RATE_HZ / 4f64.powi(i32::from(filter) - 1))
    }

    /// Sample rate this clock divides by.
    pub fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    /// Number of counter wraps observed so far.
    pub fn wraps(&self) -> u64 {
        self.wraps
    }

    /// Feed the next counter value and get seconds since the origin.
    pub fn observe(&mut self, count: u16) -> f64 {
        let origin = match self.origin {
            Some(origin) => origin,
            None => {
                self.origin = Some(count);
                self.last = count;
                count
            }
        };

        if count < self.last {
            self.wraps += 1;
        }
        self.last = count;

        let ticks = i64::from(count) - i64::from(origin) + (self.wraps as i64) * 65_536;
        ticks as f64 / self.rate_hz
    }
}
