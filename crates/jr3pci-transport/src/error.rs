/// Errors that can occur while talking to the driver at the handle level.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The device node could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    /// The device index cannot name a device node.
    #[error("invalid device index {0} (must be non-negative)")]
    InvalidDeviceIndex(i64),

    /// The control request itself failed at the OS level.
    #[error("control request 0x{code:08x} failed: {source}")]
    Control {
        code: u32,
        source: std::io::Error,
    },

    /// The control request does not fit in a single driver call.
    #[error("control buffer too large ({len} bytes)")]
    BufferTooLarge { len: usize },
}

pub type Result<T> = std::result::Result<T, TransportError>;
