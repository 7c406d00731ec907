//! Wire contract of the JR3 PCI driver.
//!
//! The driver answers three fixed-size control requests:
//! - read one 16-bit register word
//! - write one 16-bit register word
//! - report the bitmap of populated sensor channels
//!
//! This crate mirrors the driver's control codes, the byte layout of each
//! request/response parameter block, the status contract, and the card's
//! register map. [`transact`] performs one checked exchange over any
//! [`ControlDevice`](jr3pci_transport::ControlDevice).

pub mod codes;
pub mod error;
pub mod exchange;
pub mod params;
pub mod registers;
pub mod status;

pub use codes::{
    ctl_code, request_name, FILE_DEVICE_JR3PCI, IOCTL_JR3PCI_READ_WORD,
    IOCTL_JR3PCI_SUPPORTED_CHANNELS, IOCTL_JR3PCI_WRITE_WORD, JR3PCI_IOCTL_INDEX,
};
pub use error::{IoctlError, Result};
pub use exchange::transact;
pub use params::{
    ReadWordRequest, ReadWordResponse, Request, Response, SupportedChannelsRequest,
    SupportedChannelsResponse, WriteWordRequest, WriteWordResponse,
};
pub use status::Status;
