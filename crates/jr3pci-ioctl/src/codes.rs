//! Control codes published by the JR3 PCI driver header.
//!
//! Codes follow the Windows `CTL_CODE` packing:
//! `(device_type << 16) | (access << 14) | (function << 2) | method`.

/// Device type the driver registers its control codes under.
pub const FILE_DEVICE_JR3PCI: u32 = 0x8000;

/// First function number of the driver's private control codes.
pub const JR3PCI_IOCTL_INDEX: u32 = 0x800;

/// `METHOD_BUFFERED` transfer type.
pub const METHOD_BUFFERED: u32 = 0;

/// `FILE_ANY_ACCESS` required access.
pub const FILE_ANY_ACCESS: u32 = 0;

/// Pack a control code the way the Windows `CTL_CODE` macro does.
pub const fn ctl_code(device_type: u32, function: u32, method: u32, access: u32) -> u32 {
    (device_type << 16) | (access << 14) | (function << 2) | method
}

/// Write one register word.
pub const IOCTL_JR3PCI_WRITE_WORD: u32 = ctl_code(
    FILE_DEVICE_JR3PCI,
    JR3PCI_IOCTL_INDEX + 1,
    METHOD_BUFFERED,
    FILE_ANY_ACCESS,
);

/// Read one register word.
pub const IOCTL_JR3PCI_READ_WORD: u32 = ctl_code(
    FILE_DEVICE_JR3PCI,
    JR3PCI_IOCTL_INDEX + 2,
    METHOD_BUFFERED,
    FILE_ANY_ACCESS,
);

/// Query the bitmap of populated channels.
pub const IOCTL_JR3PCI_SUPPORTED_CHANNELS: u32 = ctl_code(
    FILE_DEVICE_JR3PCI,
    JR3PCI_IOCTL_INDEX + 3,
    METHOD_BUFFERED,
    FILE_ANY_ACCESS,
);

/// Human-readable name for a control code, for logs and error messages.
pub fn request_name(code: u32) -> &'static str {
    match code {
        IOCTL_JR3PCI_WRITE_WORD => "write-word",
        IOCTL_JR3PCI_READ_WORD => "read-word",
        IOCTL_JR3PCI_SUPPORTED_CHANNELS => "supported-channels",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_ctl_code_packing() {
        assert_eq!(IOCTL_JR3PCI_WRITE_WORD, 0x8000_2004);
        assert_eq!(IOCTL_JR3PCI_READ_WORD, 0x8000_2008);
        assert_eq!(IOCTL_JR3PCI_SUPPORTED_CHANNELS, 0x8000_200c);
    }

    #[test]
    fn names_known_codes() {
        assert_eq!(request_name(IOCTL_JR3PCI_READ_WORD), "read-word");
        assert_eq!(request_name(0), "unknown");
    }
}
