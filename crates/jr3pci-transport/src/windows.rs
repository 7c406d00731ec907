use std::ffi::{c_void, OsStr};
use std::os::windows::ffi::OsStrExt;
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle};

use windows_sys::Win32::Foundation::{GENERIC_READ, GENERIC_WRITE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::Storage::FileSystem::{CreateFileW, OPEN_EXISTING};
use windows_sys::Win32::System::IO::DeviceIoControl;

use crate::error::{Result, TransportError};

/// Open an existing device node for exclusive read/write access.
pub(crate) fn open_existing(path: &str) -> std::io::Result<OwnedHandle> {
    let wide: Vec<u16> = OsStr::new(path)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: `wide` is a NUL-terminated UTF-16 string that outlives the call.
    // Security attributes and the template handle are optional and passed as null.
    let raw = unsafe {
        CreateFileW(
            wide.as_ptr(),
            GENERIC_READ | GENERIC_WRITE,
            0,
            std::ptr::null(),
            OPEN_EXISTING,
            0,
            std::ptr::null_mut(),
        )
    };

    if raw == INVALID_HANDLE_VALUE {
        return Err(std::io::Error::last_os_error());
    }

    // SAFETY: `raw` is a valid handle just returned by CreateFileW and is owned
    // by nothing else.
    Ok(unsafe { OwnedHandle::from_raw_handle(raw as _) })
}

/// Issue one synchronous `DeviceIoControl` and return the byte count written.
pub(crate) fn device_io_control(
    handle: &OwnedHandle,
    code: u32,
    input: &[u8],
    output: &mut [u8],
) -> Result<usize> {
    let in_len = u32::try_from(input.len())
        .map_err(|_| TransportError::BufferTooLarge { len: input.len() })?;
    let out_len = u32::try_from(output.len())
        .map_err(|_| TransportError::BufferTooLarge { len: output.len() })?;

    let in_ptr = if input.is_empty() {
        std::ptr::null()
    } else {
        input.as_ptr().cast::<c_void>()
    };
    let out_ptr = if output.is_empty() {
        std::ptr::null_mut()
    } else {
        output.as_mut_ptr().cast::<c_void>()
    };

    let mut returned: u32 = 0;

    // SAFETY: the handle is open for the lifetime of `handle`; the buffers are
    // valid for the lengths passed; no OVERLAPPED structure is used, so the
    // call completes before returning.
    let ok = unsafe {
        DeviceIoControl(
            handle.as_raw_handle() as _,
            code,
            in_ptr,
            in_len,
            out_ptr,
            out_len,
            &mut returned,
            std::ptr::null_mut(),
        )
    };

    if ok == 0 {
        return Err(TransportError::Control {
            code,
            source: std::io::Error::last_os_error(),
        });
    }

    Ok(returned as usize)
}
