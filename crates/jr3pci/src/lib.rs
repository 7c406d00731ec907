//! Access JR3 force/torque sensor PCI cards through the JR3PCI kernel driver.
//!
//! # Crate Structure
//!
//! - [`transport`]: device node handles and the control-request seam
//! - [`ioctl`]: control codes, parameter blocks and the register map
//! - [`device`]: the card facade, sample records, calibration helpers and a simulator

/// Re-export transport types.
pub mod transport {
    pub use jr3pci_transport::*;
}

/// Re-export control-request types.
pub mod ioctl {
    pub use jr3pci_ioctl::*;
}

/// Re-export card-level types.
pub mod device {
    pub use jr3pci_device::*;
}

pub use jr3pci_device::{
    ChannelMask, ClockedForceArray, DeviceError, ForceArray, Jr3Pci, Result, SampleClock,
};
