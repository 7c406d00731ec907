use jr3pci_device::Jr3PciDevice;

use crate::args::{require_out, with_device, words_out, write_out};
use crate::error;
use crate::types::{DeviceHandle, Jr3ClockedForceArray, Jr3ForceArray, Jr3Handle, Jr3Result};

/// Open card `device_index` (`\\.\JR3PCI<index>`).
///
/// Returns null on failure; `jr3_last_error` describes why. The returned
/// handle must be released with `jr3_close_handle`.
#[no_mangle]
pub extern "C" fn jr3_get_handle(device_index: i32) -> Jr3Handle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();

        match Jr3PciDevice::open_signed(i64::from(device_index)) {
            Ok(device) => DeviceHandle::into_raw(Box::new(device)),
            Err(err) => {
                error::set_error_message(err.to_string());
                std::ptr::null_mut()
            }
        }
    })
}

/// Close a handle returned by `jr3_get_handle`.
///
/// # Safety
/// `handle` must be null or a handle previously returned by `jr3_get_handle`
/// that has not been closed yet.
#[no_mangle]
pub unsafe extern "C" fn jr3_close_handle(handle: Jr3Handle) {
    crate::ffi_boundary((), || {
        if handle.is_null() {
            return;
        }

        // SAFETY: Caller guarantees this handle was allocated by jr3_get_handle.
        unsafe {
            drop(Box::from_raw(handle as *mut DeviceHandle));
        }
    });
}

/// Query the bitmap of populated channels.
///
/// # Safety
/// `handle` must be a valid open handle; `out_bitmap` must be valid for a `uint32_t` write.
#[no_mangle]
pub unsafe extern "C" fn jr3_get_supported_channels(
    handle: Jr3Handle,
    out_bitmap: *mut u32,
) -> Jr3Result {
    crate::ffi_boundary(Jr3Result::Internal, || {
        error::clear_error_state();
        if let Err(rc) = require_out(out_bitmap, "out_bitmap") {
            return rc;
        }

        with_device(handle, |device| match device.card.supported_channels() {
            // SAFETY: Out-pointer validity is guaranteed by the caller.
            Ok(bitmap) => unsafe { write_out(out_bitmap, bitmap) },
            Err(err) => error::map_device_error(&err),
        })
    })
}

/// Read one register word.
///
/// # Safety
/// `handle` must be a valid open handle; `out_word` must be valid for a `uint16_t` write.
#[no_mangle]
pub unsafe extern "C" fn jr3_read_word(
    handle: Jr3Handle,
    channel: u8,
    offset: u32,
    out_word: *mut u16,
) -> Jr3Result {
    crate::ffi_boundary(Jr3Result::Internal, || {
        error::clear_error_state();
        if let Err(rc) = require_out(out_word, "out_word") {
            return rc;
        }

        with_device(handle, |device| match device.card.read_word(channel, offset) {
            // SAFETY: Out-pointer validity is guaranteed by the caller.
            Ok(word) => unsafe { write_out(out_word, word) },
            Err(err) => error::map_device_error(&err),
        })
    })
}

/// Write one register word.
///
/// # Safety
/// `handle` must be a valid open handle.
#[no_mangle]
pub unsafe extern "C" fn jr3_write_word(
    handle: Jr3Handle,
    channel: u8,
    offset: u32,
    value: u16,
) -> Jr3Result {
    crate::ffi_boundary(Jr3Result::Internal, || {
        error::clear_error_state();

        with_device(handle, |device| {
            match device.card.write_word(channel, offset, value) {
                Ok(()) => Jr3Result::Ok,
                Err(err) => error::map_device_error(&err),
            }
        })
    })
}

/// Read `count` consecutive words starting at `offset` into `words`.
///
/// `words` is only written if every read succeeds.
///
/// # Safety
/// `handle` must be a valid open handle. If `count > 0`, `words` must be non-null and writable
/// for `count` `uint16_t` values.
#[no_mangle]
pub unsafe extern "C" fn jr3_read_words(
    handle: Jr3Handle,
    channel: u8,
    offset: u32,
    count: u32,
    words: *mut u16,
) -> Jr3Result {
    crate::ffi_boundary(Jr3Result::Internal, || {
        error::clear_error_state();

        let out = {
            // SAFETY: We validate pointer/length pairing in helper.
            match unsafe { words_out(words, count as usize) } {
                Some(v) => v,
                None => return Jr3Result::InvalidArgument,
            }
        };

        with_device(handle, |device| {
            let mut staged = vec![0u16; out.len()];
            match device.card.read_words_into(channel, offset, &mut staged) {
                Ok(()) => {
                    out.copy_from_slice(&staged);
                    Jr3Result::Ok
                }
                Err(err) => error::map_device_error(&err),
            }
        })
    })
}

/// Read the force/torque block of `filter`.
///
/// # Safety
/// `handle` must be a valid open handle; `out` must be valid for a `Jr3ForceArray` write.
#[no_mangle]
pub unsafe extern "C" fn jr3_get_force_array(
    handle: Jr3Handle,
    channel: u8,
    filter: u8,
    out: *mut Jr3ForceArray,
) -> Jr3Result {
    crate::ffi_boundary(Jr3Result::Internal, || {
        error::clear_error_state();
        if let Err(rc) = require_out(out, "out") {
            return rc;
        }

        with_device(handle, |device| match device.card.force_array(channel, filter) {
            // SAFETY: Out-pointer validity is guaranteed by the caller.
            Ok(fa) => unsafe { write_out(out, Jr3ForceArray::from(fa)) },
            Err(err) => error::map_device_error(&err),
        })
    })
}

/// Read the sample counter and force/torque block of `filter`.
///
/// The counter and the block are two separate driver requests and are not
/// guaranteed to come from the same DSP cycle.
///
/// # Safety
/// `handle` must be a valid open handle; `out` must be valid for a `Jr3ClockedForceArray` write.
#[no_mangle]
pub unsafe extern "C" fn jr3_get_clocked_force_array(
    handle: Jr3Handle,
    channel: u8,
    filter: u8,
    out: *mut Jr3ClockedForceArray,
) -> Jr3Result {
    crate::ffi_boundary(Jr3Result::Internal, || {
        error::clear_error_state();
        if let Err(rc) = require_out(out, "out") {
            return rc;
        }

        with_device(handle, |device| {
            match device.card.clocked_force_array(channel, filter) {
                // SAFETY: Out-pointer validity is guaranteed by the caller.
                Ok(cfa) => unsafe { write_out(out, Jr3ClockedForceArray::from(cfa)) },
                Err(err) => error::map_device_error(&err),
            }
        })
    })
}
