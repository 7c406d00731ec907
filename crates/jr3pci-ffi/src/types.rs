use std::ffi::c_void;

use jr3pci_device::{ClockedForceArray, ControlDevice, ForceArray, Jr3Pci};

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jr3Result {
    Ok = 0,
    InvalidArgument = 1,
    TransportError = 2,
    ResponseSize = 3,
    DeviceStatus = 4,
    Internal = 99,
}

pub const JR3_OK: Jr3Result = Jr3Result::Ok;
pub const JR3_ERR_INVALID_ARGUMENT: Jr3Result = Jr3Result::InvalidArgument;
pub const JR3_ERR_TRANSPORT: Jr3Result = Jr3Result::TransportError;
pub const JR3_ERR_RESPONSE_SIZE: Jr3Result = Jr3Result::ResponseSize;
pub const JR3_ERR_DEVICE_STATUS: Jr3Result = Jr3Result::DeviceStatus;
pub const JR3_ERR_INTERNAL: Jr3Result = Jr3Result::Internal;

/// C mirror of [`ForceArray`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Jr3ForceArray {
    pub fx: i16,
    pub fy: i16,
    pub fz: i16,
    pub mx: i16,
    pub my: i16,
    pub mz: i16,
    pub v1: i16,
    pub v2: i16,
}

/// C mirror of [`ClockedForceArray`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Jr3ClockedForceArray {
    pub count: u16,
    pub fx: i16,
    pub fy: i16,
    pub fz: i16,
    pub mx: i16,
    pub my: i16,
    pub mz: i16,
    pub v1: i16,
    pub v2: i16,
}

impl From<ForceArray> for Jr3ForceArray {
    fn from(fa: ForceArray) -> Self {
        Self {
            fx: fa.fx,
            fy: fa.fy,
            fz: fa.fz,
            mx: fa.mx,
            my: fa.my,
            mz: fa.mz,
            v1: fa.v1,
            v2: fa.v2,
        }
    }
}

impl From<ClockedForceArray> for Jr3ClockedForceArray {
    fn from(cfa: ClockedForceArray) -> Self {
        let fa = cfa.forces;
        Self {
            count: cfa.count,
            fx: fa.fx,
            fy: fa.fy,
            fz: fa.fz,
            mx: fa.mx,
            my: fa.my,
            mz: fa.mz,
            v1: fa.v1,
            v2: fa.v2,
        }
    }
}

pub type Jr3Handle = *mut c_void;

pub(crate) type BoxedDevice = Box<dyn ControlDevice + Send>;

pub(crate) struct DeviceHandle {
    pub(crate) card: Jr3Pci<BoxedDevice>,
}

impl DeviceHandle {
    pub(crate) fn into_raw(device: BoxedDevice) -> Jr3Handle {
        let handle = DeviceHandle {
            card: Jr3Pci::new(device),
        };
        Box::into_raw(Box::new(handle)) as Jr3Handle
    }
}
