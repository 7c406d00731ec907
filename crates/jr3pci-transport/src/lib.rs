//! Device handle and control-request transport for the JR3 PCI driver.
//!
//! This is the lowest layer of jr3pci. It knows how to open a numbered
//! `\\.\JR3PCI<N>` device node and push one fixed-size control request
//! through it. It knows nothing about what the request bytes mean; that
//! contract lives in `jr3pci-ioctl`.
//!
//! Everything above this crate talks to a [`ControlDevice`], so the real
//! driver and in-memory stand-ins are interchangeable.

pub mod device;
pub mod error;
pub mod traits;

#[cfg(windows)]
mod windows;

pub use device::{device_path, Jr3PciDevice, DEVICE_PREFIX};
pub use error::{Result, TransportError};
pub use traits::ControlDevice;
