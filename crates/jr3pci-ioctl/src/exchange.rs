use bytes::BytesMut;
use jr3pci_transport::ControlDevice;
use tracing::trace;

use crate::error::{IoctlError, Result};
use crate::params::{Request, Response};

/// Send one request and decode the driver's answer.
///
/// The exchange succeeds only if the driver returns exactly
/// `R::Response::SIZE` bytes and, for responses that carry a status,
/// that status is OK. Nothing is returned from a failed exchange.
pub fn transact<D, R>(device: &mut D, request: &R) -> Result<R::Response>
where
    D: ControlDevice + ?Sized,
    R: Request,
{
    let mut input = BytesMut::with_capacity(R::SIZE);
    request.encode(&mut input);

    let expected = <R::Response as Response>::SIZE;
    let mut output = vec![0u8; expected];
    let returned = device.control(R::CODE, &input, &mut output)?;

    if returned != expected {
        return Err(IoctlError::ShortResponse {
            request: R::NAME,
            expected,
            actual: returned,
        });
    }

    let response =
        <R::Response as Response>::decode(&output).ok_or(IoctlError::ShortResponse {
            request: R::NAME,
            expected,
            actual: output.len(),
        })?;

    if let Some(status) = response.status() {
        if !status.is_ok() {
            return Err(IoctlError::Status {
                request: R::NAME,
                status,
            });
        }
    }

    trace!(request = R::NAME, "exchange complete");
    Ok(response)
}
