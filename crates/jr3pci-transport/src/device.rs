use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};
use crate::traits::ControlDevice;

/// Prefix of the device nodes published by the JR3 PCI driver.
pub const DEVICE_PREFIX: &str = r"\\.\JR3PCI";

/// Build the device node name for a zero-based card index.
pub fn device_path(index: u32) -> String {
    format!("{DEVICE_PREFIX}{index}")
}

/// An open handle to one JR3 PCI card.
///
/// The node is opened for read and write, with no sharing, and must
/// already exist. The handle is closed when this value is dropped.
pub struct Jr3PciDevice {
    index: u32,
    path: String,
    #[cfg(windows)]
    handle: std::os::windows::io::OwnedHandle,
}

impl Jr3PciDevice {
    /// Open the device node for card `index`.
    pub fn open(index: u32) -> Result<Self> {
        let path = device_path(index);
        match Self::open_path(index, &path) {
            Ok(device) => {
                info!(%path, "opened device handle");
                Ok(device)
            }
            Err(err) => {
                warn!(%path, error = %err, "failed to open device handle");
                Err(err)
            }
        }
    }

    /// Open the device node for a signed index, as handed over by C callers.
    pub fn open_signed(index: i64) -> Result<Self> {
        let index = u32::try_from(index).map_err(|_| TransportError::InvalidDeviceIndex(index))?;
        Self::open(index)
    }

    #[cfg(windows)]
    fn open_path(index: u32, path: &str) -> Result<Self> {
        let handle = crate::windows::open_existing(path).map_err(|source| TransportError::Open {
            path: path.to_string(),
            source,
        })?;
        Ok(Self {
            index,
            path: path.to_string(),
            handle,
        })
    }

    #[cfg(not(windows))]
    fn open_path(_index: u32, path: &str) -> Result<Self> {
        Err(TransportError::Open {
            path: path.to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "the JR3 PCI driver is only available on Windows",
            ),
        })
    }

    /// Zero-based card index this handle was opened for.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Device node name this handle was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl ControlDevice for Jr3PciDevice {
    #[cfg(windows)]
    fn control(&mut self, code: u32, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let returned = crate::windows::device_io_control(&self.handle, code, input, output)?;
        debug!(code, returned, "control request completed");
        Ok(returned)
    }

    #[cfg(not(windows))]
    fn control(&mut self, code: u32, _input: &[u8], _output: &mut [u8]) -> Result<usize> {
        debug!(code, "control request on unsupported platform");
        Err(TransportError::Control {
            code,
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "the JR3 PCI driver is only available on Windows",
            ),
        })
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

impl std::fmt::Debug for Jr3PciDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jr3PciDevice")
            .field("index", &self.index)
            .field("path", &self.path)
            .finish()
    }
}

impl Drop for Jr3PciDevice {
    fn drop(&mut self) {
        debug!(path = %self.path, "closing device handle");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_path_uses_driver_prefix() {
        assert_eq!(device_path(0), r"\\.\JR3PCI0");
        assert_eq!(device_path(12), r"\\.\JR3PCI12");
    }

    #[test]
    fn negative_index_is_rejected() {
        let result = Jr3PciDevice::open_signed(-1);
        assert!(matches!(result, Err(TransportError::InvalidDeviceIndex(-1))));
    }

    #[cfg(not(windows))]
    #[test]
    fn open_is_unsupported_off_windows() {
        match Jr3PciDevice::open(0) {
            Err(TransportError::Open { path, source }) => {
                assert_eq!(path, r"\\.\JR3PCI0");
                assert_eq!(source.kind(), std::io::ErrorKind::Unsupported);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(windows)]
    #[test]
    fn open_missing_device_fails() {
        // Index high enough that no card will ever be installed there.
        let result = Jr3PciDevice::open(9999);
        assert!(matches!(result, Err(TransportError::Open { .. })));
    }
}
