use std::fmt;
use std::io;

use jr3pci_device::DeviceError;
use jr3pci_ioctl::IoctlError;
use jr3pci_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DEVICE_STATUS: i32 = 4;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const UNAVAILABLE: i32 = 69;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::NotConnected | io::ErrorKind::Unsupported => {
            UNAVAILABLE
        }
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { path, source } => io_error(&format!("{context} ({path})"), source),
        TransportError::Control { code, source } => {
            io_error(&format!("{context} (request 0x{code:08x})"), source)
        }
        TransportError::InvalidDeviceIndex(_) => CliError::usage(format!("{context}: {err}")),
        TransportError::BufferTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn csv_error(context: &str, err: csv::Error) -> CliError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => io_error(context, source),
        other => CliError::new(INTERNAL, format!("{context}: {other:?}")),
    }
}

pub fn device_error(context: &str, err: DeviceError) -> CliError {
    match err {
        DeviceError::Ioctl(IoctlError::Transport(err)) => transport_error(context, err),
        DeviceError::Ioctl(IoctlError::ShortResponse { .. }) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        DeviceError::Ioctl(IoctlError::Status { .. }) => {
            CliError::new(DEVICE_STATUS, format!("{context}: {err}"))
        }
        DeviceError::InvalidFilter { .. } => CliError::usage(format!("{context}: {err}")),
    }
}
