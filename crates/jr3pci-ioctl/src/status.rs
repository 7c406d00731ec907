use std::fmt;

/// Status code carried in read-word and write-word responses.
///
/// The driver defines a single success value; every other value is a
/// failure reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

impl Status {
    /// `JR3PCI_STATUS_OK`.
    pub const OK: Status = Status(0);

    /// Whether the driver reported success.
    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    /// Raw status value.
    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            write!(f, "OK")
        } else {
            write!(f, "status {}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_zero_is_ok() {
        assert!(Status(0).is_ok());
        assert!(!Status(1).is_ok());
        assert!(!Status(-1).is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(Status::OK.to_string(), "OK");
        assert_eq!(Status(3).to_string(), "status 3");
    }
}
