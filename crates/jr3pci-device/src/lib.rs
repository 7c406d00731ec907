//! Register-level access to JR3 force/torque sensor PCI cards.
//!
//! [`Jr3Pci`] wraps any [`ControlDevice`] and exposes the card as word
//! reads and writes plus the two sample records the firmware publishes:
//! [`ForceArray`] and [`ClockedForceArray`]. Every call is one or more
//! blocking driver requests; nothing is cached.
//!
//! ```no_run
//! use jr3pci_device::Jr3Pci;
//!
//! let mut card = Jr3Pci::open(0)?;
//! let channels = card.channel_mask()?;
//! for channel in channels.iter() {
//!     let sample = card.clocked_force_array(channel, 1)?;
//!     println!("{channel}: #{} fz={}", sample.count, sample.forces.fz);
//! }
//! # Ok::<(), jr3pci_device::DeviceError>(())
//! ```

pub mod calibration;
pub mod clock;
pub mod error;
pub mod facade;
pub mod sample;
pub mod sim;

pub use clock::SampleClock;
pub use error::{DeviceError, Result};
pub use facade::{Jr3Pci, ReadWords};
pub use jr3pci_transport::{ControlDevice, Jr3PciDevice};
pub use sample::{
    ChannelMask, ClockedForceArray, ForceArray, FullScaleLimit, Peaks, ScaledForces,
    SensorSettings,
};
pub use sim::{Fault, LoggedRequest, SimulatedDriver};

/// Version of the library contract reported to C callers.
pub const LIBRARY_VERSION: u32 = 2;
