//! jr3pci-ffi: C-ABI exports for the JR3 PCI force/torque card.

mod args;
mod device;
mod error;
mod types;

use std::panic::AssertUnwindSafe;

pub use device::{
    jr3_close_handle, jr3_get_clocked_force_array, jr3_get_force_array, jr3_get_handle,
    jr3_get_supported_channels, jr3_read_word, jr3_read_words, jr3_write_word,
};
pub use types::{
    Jr3ClockedForceArray, Jr3ForceArray, Jr3Handle, Jr3Result, JR3_ERR_DEVICE_STATUS,
    JR3_ERR_INTERNAL, JR3_ERR_INVALID_ARGUMENT, JR3_ERR_RESPONSE_SIZE, JR3_ERR_TRANSPORT, JR3_OK,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Version of this library's C interface.
#[no_mangle]
pub extern "C" fn jr3_get_dll_version() -> u32 {
    ffi_boundary(0, || jr3pci_device::LIBRARY_VERSION)
}

/// Message describing the last failure on the calling thread, or an empty string.
#[no_mangle]
pub extern "C" fn jr3_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[test]
    fn dll_version_is_two() {
        assert_eq!(jr3_get_dll_version(), 2);
    }

    #[test]
    fn last_error_returns_non_null_pointer() {
        error::clear_error_state();
        let ptr = jr3_last_error();
        assert!(!ptr.is_null());

        // SAFETY: jr3_last_error returns a pointer to a thread-local CString.
        let text = unsafe { CStr::from_ptr(ptr).to_str().unwrap() };
        assert!(text.is_empty());
    }

    #[test]
    fn panics_are_contained() {
        let result = ffi_boundary(Jr3Result::Internal, || -> Jr3Result {
            panic!("boom");
        });
        assert_eq!(result, Jr3Result::Internal);

        // SAFETY: jr3_last_error returns a pointer to a thread-local CString.
        let text = unsafe { CStr::from_ptr(jr3_last_error()).to_str().unwrap() };
        assert_eq!(text, "panic across FFI boundary");
    }
}
