//! Request and response parameter blocks.
//!
//! The driver header declares these as plain C structs with natural
//! alignment, so a `UCHAR` followed by a `ULONG` carries three bytes of
//! padding. All multi-byte fields are little-endian.
//!
//! ```text
//! read-word request    ┌─────────┬─────────┬──────────────┐
//! (8 bytes)            │ channel │ pad (3) │ offset (4 LE)│
//!                      └─────────┴─────────┴──────────────┘
//! read-word response   ┌──────────────┬────────────┬─────────┐
//! (8 bytes)            │ status (4 LE)│ data (2 LE)│ pad (2) │
//!                      └──────────────┴────────────┴─────────┘
//! write-word request   ┌─────────┬─────────┬──────────────┬────────────┬─────────┐
//! (12 bytes)           │ channel │ pad (3) │ offset (4 LE)│ data (2 LE)│ pad (2) │
//!                      └─────────┴─────────┴──────────────┴────────────┴─────────┘
//! write-word response  status (4 LE)
//! supported channels   bitmap (4 LE), no request block
//! ```

use bytes::{Buf, BufMut, BytesMut};

use crate::codes::{IOCTL_JR3PCI_READ_WORD, IOCTL_JR3PCI_SUPPORTED_CHANNELS, IOCTL_JR3PCI_WRITE_WORD};
use crate::status::Status;

/// A request parameter block sent to the driver.
pub trait Request: Sized {
    /// Control code this request is sent under.
    const CODE: u32;
    /// Name used in logs and errors.
    const NAME: &'static str;
    /// Exact size of the encoded block.
    const SIZE: usize;

    /// The response block the driver answers with.
    type Response: Response;

    /// Append the encoded block to `dst`.
    fn encode(&self, dst: &mut BytesMut);

    /// Decode a block; `None` if `src` is not exactly [`Self::SIZE`] bytes.
    fn decode(src: &[u8]) -> Option<Self>;
}

/// A response parameter block returned by the driver.
pub trait Response: Sized {
    /// Exact size of the encoded block.
    const SIZE: usize;

    /// Append the encoded block to `dst`.
    fn encode(&self, dst: &mut BytesMut);

    /// Decode a block; `None` if `src` is not exactly [`Self::SIZE`] bytes.
    fn decode(src: &[u8]) -> Option<Self>;

    /// Device status, for responses that carry one.
    fn status(&self) -> Option<Status> {
        None
    }
}

/// `JR3PCI_READ_WORD_REQUEST_PARAMS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWordRequest {
    pub channel: u8,
    pub offset: u32,
}

/// `JR3PCI_READ_WORD_RESPONSE_PARAMS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWordResponse {
    pub status: Status,
    pub data: u16,
}

/// `JR3PCI_WRITE_WORD_REQUEST_PARAMS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteWordRequest {
    pub channel: u8,
    pub offset: u32,
    pub data: u16,
}

/// `JR3PCI_WRITE_WORD_RESPONSE_PARAMS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteWordResponse {
    pub status: Status,
}

/// The supported-channels query takes no input block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupportedChannelsRequest;

/// `JR3PCI_SUPPORTED_CHANNELS_RESPONSE_PARAMS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedChannelsResponse {
    pub bitmap: u32,
}

impl Request for ReadWordRequest {
    const CODE: u32 = IOCTL_JR3PCI_READ_WORD;
    const NAME: &'static str = "read-word";
    const SIZE: usize = 8;
    type Response = ReadWordResponse;

    fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(Self::SIZE);
        dst.put_u8(self.channel);
        dst.put_bytes(0, 3);
        dst.put_u32_le(self.offset);
    }

    fn decode(src: &[u8]) -> Option<Self> {
        if src.len() != Self::SIZE {
            return None;
        }
        let mut src = src;
        let channel = src.get_u8();
        src.advance(3);
        let offset = src.get_u32_le();
        Some(Self { channel, offset })
    }
}

impl Response for ReadWordResponse {
    const SIZE: usize = 8;

    fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(Self::SIZE);
        dst.put_i32_le(self.status.0);
        dst.put_u16_le(self.data);
        dst.put_bytes(0, 2);
    }

    fn decode(src: &[u8]) -> Option<Self> {
        if src.len() != Self::SIZE {
            return None;
        }
        let mut src = src;
        let status = Status(src.get_i32_le());
        let data = src.get_u16_le();
        Some(Self { status, data })
    }

    fn status(&self) -> Option<Status> {
        Some(self.status)
    }
}

impl Request for WriteWordRequest {
    const CODE: u32 = IOCTL_JR3PCI_WRITE_WORD;
    const NAME: &'static str = "write-word";
    const SIZE: usize = 12;
    type Response = WriteWordResponse;

    fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(Self::SIZE);
        dst.put_u8(self.channel);
        dst.put_bytes(0, 3);
        dst.put_u32_le(self.offset);
        dst.put_u16_le(self.data);
        dst.put_bytes(0, 2);
    }

    fn decode(src: &[u8]) -> Option<Self> {
        if src.len() != Self::SIZE {
            return None;
        }
        let mut src = src;
        let channel = src.get_u8();
        src.advance(3);
        let offset = src.get_u32_le();
        let data = src.get_u16_le();
        Some(Self {
            channel,
            offset,
            data,
        })
    }
}

impl Response for WriteWordResponse {
    const SIZE: usize = 4;

    fn encode(&self, dst: &mut BytesMut) {
        dst.put_i32_le(self.status.0);
    }

    fn decode(src: &[u8]) -> Option<Self> {
        if src.len() != Self::SIZE {
            return None;
        }
        let mut src = src;
        Some(Self {
            status: Status(src.get_i32_le()),
        })
    }

    fn status(&self) -> Option<Status> {
        Some(self.status)
    }
}

impl Request for SupportedChannelsRequest {
    const CODE: u32 = IOCTL_JR3PCI_SUPPORTED_CHANNELS;
    const NAME: &'static str = "supported-channels";
    const SIZE: usize = 0;
    type Response = SupportedChannelsResponse;

    fn encode(&self, _dst: &mut BytesMut) {}

    fn decode(src: &[u8]) -> Option<Self> {
        src.is_empty().then_some(Self)
    }
}

impl Response for SupportedChannelsResponse {
    const SIZE: usize = 4;

    fn encode(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.bitmap);
    }

    fn decode(src: &[u8]) -> Option<Self> {
        if src.len() != Self::SIZE {
            return None;
        }
        let mut src = src;
        Some(Self {
            bitmap: src.get_u32_le(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded<R: Request>(req: &R) -> BytesMut {
        let mut buf = BytesMut::new();
        req.encode(&mut buf);
        buf
    }

    #[test]
    fn read_request_layout_has_padding_after_channel() {
        let buf = encoded(&ReadWordRequest {
            channel: 2,
            offset: 0x0000_0190,
        });
        assert_eq!(buf.len(), ReadWordRequest::SIZE);
        assert_eq!(&buf[..], &[2, 0, 0, 0, 0x90, 0x01, 0, 0]);
    }

    #[test]
    fn write_request_layout() {
        let buf = encoded(&WriteWordRequest {
            channel: 1,
            offset: 0xe7,
            data: 0xBEEF,
        });
        assert_eq!(buf.len(), WriteWordRequest::SIZE);
        assert_eq!(&buf[..], &[1, 0, 0, 0, 0xe7, 0, 0, 0, 0xEF, 0xBE, 0, 0]);
    }

    #[test]
    fn read_response_decodes_status_then_data() {
        let raw = [0, 0, 0, 0, 0x34, 0x12, 0xAA, 0xAA];
        let resp = ReadWordResponse::decode(&raw).unwrap();
        assert_eq!(resp.status, Status::OK);
        assert_eq!(resp.data, 0x1234);
    }

    #[test]
    fn negative_status_survives_decode() {
        let mut buf = BytesMut::new();
        WriteWordResponse {
            status: Status(-7),
        }
        .encode(&mut buf);
        let resp = WriteWordResponse::decode(&buf).unwrap();
        assert_eq!(resp.status(), Some(Status(-7)));
    }

    #[test]
    fn decode_rejects_wrong_sizes() {
        assert!(ReadWordRequest::decode(&[0; 7]).is_none());
        assert!(ReadWordResponse::decode(&[0; 9]).is_none());
        assert!(WriteWordRequest::decode(&[0; 8]).is_none());
        assert!(SupportedChannelsRequest::decode(&[0]).is_none());
        assert!(SupportedChannelsResponse::decode(&[0; 2]).is_none());
    }

    #[test]
    fn supported_channels_has_no_status() {
        let resp = SupportedChannelsResponse::decode(&[0x0b, 0, 0, 0]).unwrap();
        assert_eq!(resp.bitmap, 0b1011);
        assert_eq!(resp.status(), None);
        assert_eq!(encoded(&SupportedChannelsRequest).len(), 0);
    }
}
