use crate::status::Status;

/// Errors from one control exchange with the driver.
#[derive(Debug, thiserror::Error)]
pub enum IoctlError {
    /// The handle-level request failed.
    #[error("transport error: {0}")]
    Transport(#[from] jr3pci_transport::TransportError),

    /// The driver completed the request but returned the wrong number of bytes.
    #[error("{request} response size mismatch (expected {expected} bytes, got {actual})")]
    ShortResponse {
        request: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The driver answered with a non-OK status.
    #[error("{request} rejected by device: {status}")]
    Status {
        request: &'static str,
        status: Status,
    },
}

impl IoctlError {
    /// Whether this error was reported by the device rather than the transport.
    pub fn is_device_status(&self) -> bool {
        matches!(self, IoctlError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, IoctlError>;
