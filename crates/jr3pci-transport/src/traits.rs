use crate::error::Result;

/// Something that accepts one blocking control request at a time.
///
/// `control` sends `input` under the control code `code`, lets the driver
/// fill `output`, and returns how many bytes the driver reported as
/// written. Callers are expected to compare that count against the size
/// they asked for; a short count is not an error at this layer.
///
/// Implementations take `&mut self`: requests on a single handle are
/// never interleaved from safe Rust.
pub trait ControlDevice {
    /// Issue one control request and wait for it to complete.
    fn control(&mut self, code: u32, input: &[u8], output: &mut [u8]) -> Result<usize>;

    /// Short description for diagnostics.
    fn describe(&self) -> String {
        "control-device".to_string()
    }
}

impl<T: ControlDevice + ?Sized> ControlDevice for &mut T {
    fn control(&mut self, code: u32, input: &[u8], output: &mut [u8]) -> Result<usize> {
        (**self).control(code, input, output)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: ControlDevice + ?Sized> ControlDevice for Box<T> {
    fn control(&mut self, code: u32, input: &[u8], output: &mut [u8]) -> Result<usize> {
        (**self).control(code, input, output)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
