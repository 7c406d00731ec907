use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use jr3pci_device::DeviceError;
use jr3pci_ioctl::IoctlError;

use crate::types::Jr3Result;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let message = message.into();
    let sanitized = message.replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

pub(crate) fn set_invalid_argument(message: impl Into<String>) -> Jr3Result {
    set_error_message(message);
    Jr3Result::InvalidArgument
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn map_device_error(err: &DeviceError) -> Jr3Result {
    set_error_message(err.to_string());
    match err {
        DeviceError::Ioctl(IoctlError::Transport(_)) => Jr3Result::TransportError,
        DeviceError::Ioctl(IoctlError::ShortResponse { .. }) => Jr3Result::ResponseSize,
        DeviceError::Ioctl(IoctlError::Status { .. }) => Jr3Result::DeviceStatus,
        DeviceError::InvalidFilter { .. } => Jr3Result::InvalidArgument,
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}
