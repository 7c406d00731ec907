use crate::error;
use crate::types::{DeviceHandle, Jr3Handle, Jr3Result};

/// Borrow the device behind a handle, reporting a null handle as an argument error.
pub(crate) fn with_device(
    handle: Jr3Handle,
    f: impl FnOnce(&mut DeviceHandle) -> Jr3Result,
) -> Jr3Result {
    if handle.is_null() {
        return error::set_invalid_argument("handle cannot be null");
    }

    let device = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &mut *(handle as *mut DeviceHandle) }
    };

    f(device)
}

/// Reject a null out-pointer before any driver request is made.
pub(crate) fn require_out<T>(out: *mut T, name: &str) -> Result<(), Jr3Result> {
    if out.is_null() {
        return Err(error::set_invalid_argument(format!("{name} cannot be null")));
    }
    Ok(())
}

/// Store `value` through an out-pointer already checked by [`require_out`].
///
/// # Safety
/// `out` must be non-null and valid for a write of `T`.
pub(crate) unsafe fn write_out<T>(out: *mut T, value: T) -> Jr3Result {
    // SAFETY: Non-null checked by require_out; validity is guaranteed by the caller.
    unsafe {
        out.write(value);
    }
    Jr3Result::Ok
}

/// Convert an output pointer + length into a mutable slice.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and writable for `len` elements.
pub(crate) unsafe fn words_out<'a>(data: *mut u16, len: usize) -> Option<&'a mut [u16]> {
    if len == 0 {
        return Some(&mut []);
    }
    if data.is_null() {
        let _ = error::set_invalid_argument("words cannot be null when count > 0");
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    Some(unsafe { std::slice::from_raw_parts_mut(data, len) })
}
