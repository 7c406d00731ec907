use jr3pci_ioctl::IoctlError;
use jr3pci_transport::TransportError;

/// Errors that can occur in card operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// A driver exchange failed.
    #[error(transparent)]
    Ioctl(#[from] IoctlError),

    /// The filter number has no register block.
    #[error("filter {filter} out of range ({min}-{max})")]
    InvalidFilter { filter: u8, min: u8, max: u8 },
}

impl From<TransportError> for DeviceError {
    fn from(err: TransportError) -> Self {
        DeviceError::Ioctl(IoctlError::Transport(err))
    }
}

impl DeviceError {
    /// Whether the device itself rejected a request.
    pub fn is_device_status(&self) -> bool {
        matches!(self, DeviceError::Ioctl(err) if err.is_device_status())
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;
