//! Connection-oriented DCE/RPC PDUs.
//!
//! Only what a call needs once its presentation context is bound: REQUEST in,
//! RESPONSE or FAULT out. Requests must arrive as a single unauthenticated
//! fragment in little-endian data representation.
//!
//! ```text
//! [rpc_vers][minor][ptype][pfc_flags][drep x4][frag_length][auth_length][call_id]
//! ```

use crate::config::DcerpcConfig;
use crate::error::{Result, RpcError};
use crate::ndr::NdrReader;
use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

/// PDU type octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    Request = 0,
    Response = 2,
    Fault = 3,
    Bind = 11,
    BindAck = 12,
    BindNak = 13,
    AlterContext = 14,
    AlterContextResp = 15,
    Shutdown = 17,
    CoCancel = 18,
    Orphaned = 19,
}

impl TryFrom<u8> for PacketType {
    type Error = RpcError;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => PacketType::Request,
            2 => PacketType::Response,
            3 => PacketType::Fault,
            11 => PacketType::Bind,
            12 => PacketType::BindAck,
            13 => PacketType::BindNak,
            14 => PacketType::AlterContext,
            15 => PacketType::AlterContextResp,
            17 => PacketType::Shutdown,
            18 => PacketType::CoCancel,
            19 => PacketType::Orphaned,
            other => return Err(RpcError::protocol(format!("unknown packet type {other}"))),
        })
    }
}

/// `pfc_flags` bits.
pub mod flags {
    pub const PFC_FIRST_FRAG: u8 = 0x01;
    pub const PFC_LAST_FRAG: u8 = 0x02;
    pub const PFC_PENDING_CANCEL: u8 = 0x04;
    pub const PFC_CONC_MPX: u8 = 0x10;
    pub const PFC_DID_NOT_EXECUTE: u8 = 0x20;
    pub const PFC_MAYBE: u8 = 0x40;
    pub const PFC_OBJECT_UUID: u8 = 0x80;
}

const REQUEST_HEADER_SIZE: usize = DcerpcConfig::HEADER_SIZE + 8;
const RESPONSE_HEADER_SIZE: usize = DcerpcConfig::HEADER_SIZE + 8;
const FAULT_SIZE: usize = DcerpcConfig::HEADER_SIZE + 16;

/// Header shared by every connection-oriented PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeader {
    pub packet_type: PacketType,
    pub flags: u8,
    pub data_rep: [u8; 4],
    pub frag_length: u16,
    pub auth_length: u16,
    pub call_id: u32,
}

impl CommonHeader {
    fn new(packet_type: PacketType, flags: u8, frag_length: u16, call_id: u32) -> Self {
        Self {
            packet_type,
            flags,
            data_rep: DcerpcConfig::DATA_REPRESENTATION,
            frag_length,
            auth_length: 0,
            call_id,
        }
    }

    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < DcerpcConfig::HEADER_SIZE {
            return Err(RpcError::protocol(format!(
                "PDU of {} bytes is shorter than the common header",
                buf.len()
            )));
        }
        if buf[0] != DcerpcConfig::RPC_VERSION || buf[1] != DcerpcConfig::RPC_VERSION_MINOR {
            return Err(RpcError::protocol(format!(
                "unsupported RPC version {}.{}",
                buf[0], buf[1]
            )));
        }
        let data_rep = [buf[4], buf[5], buf[6], buf[7]];
        if data_rep[0] & 0xF0 != DcerpcConfig::DATA_REPRESENTATION[0] & 0xF0 {
            return Err(RpcError::protocol("big-endian data representation is not supported"));
        }
        if data_rep[0] & 0x0F != DcerpcConfig::DATA_REPRESENTATION[0] & 0x0F {
            return Err(RpcError::protocol("EBCDIC character representation is not supported"));
        }
        if data_rep[1] != DcerpcConfig::DATA_REPRESENTATION[1] {
            return Err(RpcError::protocol(format!(
                "floating-point representation {} is not supported",
                data_rep[1]
            )));
        }
        Ok(Self {
            packet_type: PacketType::try_from(buf[2])?,
            flags: buf[3],
            data_rep,
            frag_length: u16::from_le_bytes([buf[8], buf[9]]),
            auth_length: u16::from_le_bytes([buf[10], buf[11]]),
            call_id: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(DcerpcConfig::RPC_VERSION);
        buf.put_u8(DcerpcConfig::RPC_VERSION_MINOR);
        buf.put_u8(self.packet_type as u8);
        buf.put_u8(self.flags);
        buf.put_slice(&self.data_rep);
        buf.put_u16_le(self.frag_length);
        buf.put_u16_le(self.auth_length);
        buf.put_u32_le(self.call_id);
    }
}

/// A decoded REQUEST PDU borrowing its stub from the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPdu<'a> {
    pub header: CommonHeader,
    pub alloc_hint: u32,
    pub context_id: u16,
    pub op_num: u16,
    pub object: Option<Uuid>,
    pub stub: &'a [u8],
}

impl<'a> RequestPdu<'a> {
    pub fn decode(frame: &'a [u8]) -> Result<Self> {
        let header = CommonHeader::parse(frame)?;
        if header.packet_type != PacketType::Request {
            return Err(RpcError::protocol(format!(
                "expected a request PDU, got {:?}",
                header.packet_type
            )));
        }
        if header.frag_length as usize != frame.len() {
            return Err(RpcError::protocol(format!(
                "fragment length {} does not match {} bytes received",
                header.frag_length,
                frame.len()
            )));
        }
        let whole = flags::PFC_FIRST_FRAG | flags::PFC_LAST_FRAG;
        if header.flags & whole != whole {
            return Err(RpcError::protocol("fragmented requests are not supported"));
        }
        if header.auth_length != 0 {
            return Err(RpcError::protocol("authenticated requests are not supported"));
        }

        let has_object = header.flags & flags::PFC_OBJECT_UUID != 0;
        let needed = REQUEST_HEADER_SIZE + if has_object { 16 } else { 0 };
        if frame.len() < needed {
            return Err(RpcError::protocol(format!(
                "request PDU of {} bytes is shorter than its {} byte header",
                frame.len(),
                needed
            )));
        }

        let mut r = NdrReader::new(&frame[DcerpcConfig::HEADER_SIZE..]);
        let alloc_hint = r.read_u32()?;
        let context_id = r.read_u16()?;
        let op_num = r.read_u16()?;
        let object = if has_object {
            Some(r.read_uuid()?)
        } else {
            None
        };

        Ok(Self {
            header,
            alloc_hint,
            context_id,
            op_num,
            object,
            stub: r.read_remaining(),
        })
    }
}

/// RESPONSE PDU carrying the whole stub in one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePdu<'a> {
    pub call_id: u32,
    pub context_id: u16,
    pub stub: &'a [u8],
}

impl ResponsePdu<'_> {
    pub fn encode(&self) -> Result<Bytes> {
        let frag_length = RESPONSE_HEADER_SIZE + self.stub.len();
        if frag_length > DcerpcConfig::MAX_FRAGMENT_SIZE {
            return Err(RpcError::Other(format!(
                "response of {} bytes does not fit in a single fragment",
                frag_length
            )));
        }

        let mut buf = BytesMut::with_capacity(frag_length);
        CommonHeader::new(
            PacketType::Response,
            flags::PFC_FIRST_FRAG | flags::PFC_LAST_FRAG,
            frag_length as u16,
            self.call_id,
        )
        .encode(&mut buf);
        buf.put_u32_le(self.stub.len() as u32);
        buf.put_u16_le(self.context_id);
        buf.put_u8(0);
        buf.put_u8(0);
        buf.put_slice(self.stub);
        Ok(buf.freeze())
    }
}

/// FAULT PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultPdu {
    pub call_id: u32,
    pub context_id: u16,
    pub status: u32,
    pub did_not_execute: bool,
}

impl FaultPdu {
    pub fn from_error(call_id: u32, context_id: u16, err: &RpcError) -> Self {
        Self {
            call_id,
            context_id,
            status: err.to_fault_status(),
            did_not_execute: err.did_not_execute(),
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut pfc = flags::PFC_FIRST_FRAG | flags::PFC_LAST_FRAG;
        if self.did_not_execute {
            pfc |= flags::PFC_DID_NOT_EXECUTE;
        }

        let mut buf = BytesMut::with_capacity(FAULT_SIZE);
        CommonHeader::new(PacketType::Fault, pfc, FAULT_SIZE as u16, self.call_id).encode(&mut buf);
        buf.put_u32_le(0);
        buf.put_u16_le(self.context_id);
        buf.put_u8(0);
        buf.put_u8(0);
        buf.put_u32_le(self.status);
        buf.put_u32_le(0);
        buf.freeze()
    }
}

/// Read one PDU fragment, header included.
///
/// Returns `None` on clean EOF (peer closed connection). A stream that ends
/// partway through the header is an error.
pub async fn read_fragment<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut header = [0u8; DcerpcConfig::HEADER_SIZE];
    let mut filled = 0;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(RpcError::protocol(format!(
                "connection closed after {} of {} header bytes",
                filled,
                DcerpcConfig::HEADER_SIZE
            )));
        }
        filled += n;
    }

    let parsed = CommonHeader::parse(&header)?;
    let len = parsed.frag_length as usize;
    if len < DcerpcConfig::HEADER_SIZE {
        return Err(RpcError::protocol(format!(
            "fragment length {} is shorter than the common header",
            len
        )));
    }

    let mut fragment = vec![0u8; len];
    fragment[..DcerpcConfig::HEADER_SIZE].copy_from_slice(&header);
    reader
        .read_exact(&mut fragment[DcerpcConfig::HEADER_SIZE..])
        .await?;

    Ok(Some(fragment))
}

/// Write one encoded PDU fragment.
pub async fn write_fragment<W: AsyncWriteExt + Unpin>(writer: &mut W, fragment: &[u8]) -> Result<()> {
    writer.write_all(fragment).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::status;

    fn request_frame(op_num: u16, object: Option<Uuid>, stub: &[u8]) -> Vec<u8> {
        let mut pfc = flags::PFC_FIRST_FRAG | flags::PFC_LAST_FRAG;
        let mut body = Vec::new();
        body.extend_from_slice(&(stub.len() as u32).to_le_bytes());
        body.extend_from_slice(&1u16.to_le_bytes());
        body.extend_from_slice(&op_num.to_le_bytes());
        if let Some(id) = object {
            pfc |= flags::PFC_OBJECT_UUID;
            body.extend_from_slice(&id.to_bytes_le());
        }
        body.extend_from_slice(stub);

        let mut frame = vec![5, 0, 0, pfc, 0x10, 0, 0, 0];
        frame.extend_from_slice(&((16 + body.len()) as u16).to_le_bytes());
        frame.extend_from_slice(&0u16.to_le_bytes());
        frame.extend_from_slice(&9u32.to_le_bytes());
        frame.extend_from_slice(&body);
        frame
    }

    #[test]
    fn test_decode_request_with_object() {
        let ipid = Uuid::parse_str("03837520-098b-11d8-9414-505054503030").unwrap();
        let frame = request_frame(66, Some(ipid), &[0xAA, 0xBB]);
        let pdu = RequestPdu::decode(&frame).unwrap();
        assert_eq!(pdu.header.call_id, 9);
        assert_eq!(pdu.context_id, 1);
        assert_eq!(pdu.op_num, 66);
        assert_eq!(pdu.object, Some(ipid));
        assert_eq!(pdu.stub, &[0xAA, 0xBB]);
    }

    #[test]
    fn test_decode_rejects_fragmented_request() {
        let mut frame = request_frame(7, None, &[]);
        frame[3] = flags::PFC_FIRST_FRAG;
        let err = RequestPdu::decode(&frame).unwrap_err();
        assert!(matches!(err, RpcError::Protocol { .. }));
        assert_eq!(err.to_fault_status(), status::NCA_S_PROTO_ERROR);
    }

    #[test]
    fn test_decode_rejects_length_mismatch() {
        let mut frame = request_frame(7, None, &[1, 2, 3, 4]);
        frame.pop();
        assert!(RequestPdu::decode(&frame).is_err());
    }

    #[test]
    fn test_decode_rejects_big_endian() {
        let mut frame = request_frame(7, None, &[]);
        frame[4] = 0x00;
        assert!(RequestPdu::decode(&frame).is_err());
    }

    #[test]
    fn test_decode_rejects_ebcdic() {
        let mut frame = request_frame(7, None, &[]);
        frame[4] = 0x11;
        let err = RequestPdu::decode(&frame).unwrap_err();
        assert!(matches!(err, RpcError::Protocol { .. }));
    }

    #[test]
    fn test_decode_rejects_non_ieee_float() {
        for float_rep in 1..=3 {
            let mut frame = request_frame(7, None, &[]);
            frame[5] = float_rep;
            let err = RequestPdu::decode(&frame).unwrap_err();
            assert!(matches!(err, RpcError::Protocol { .. }));
        }
    }

    #[test]
    fn test_decode_rejects_authenticated_request() {
        let mut frame = request_frame(7, None, &[]);
        frame[10] = 8;
        let err = RequestPdu::decode(&frame).unwrap_err();
        assert!(matches!(err, RpcError::Protocol { .. }));
        assert!(err.did_not_execute());
    }

    #[test]
    fn test_oversized_response_is_rejected() {
        let stub = vec![0u8; DcerpcConfig::MAX_FRAGMENT_SIZE - RESPONSE_HEADER_SIZE + 1];
        let pdu = ResponsePdu {
            call_id: 9,
            context_id: 1,
            stub: &stub,
        };
        let err = pdu.encode().unwrap_err();
        assert!(matches!(err, RpcError::Other(_)));
        assert_eq!(err.to_fault_status(), status::NCA_S_FAULT_UNSPEC);
    }

    #[test]
    fn test_response_layout() {
        let pdu = ResponsePdu {
            call_id: 9,
            context_id: 1,
            stub: &[0x01, 0x02, 0x03, 0x04],
        };
        assert_eq!(
            hex::encode(pdu.encode().unwrap()),
            concat!(
                "05000203100000001c00000009000000",
                "04000000", // alloc hint
                "0100",     // context id
                "0000",     // cancel count, reserved
                "01020304",
            )
        );
    }

    #[test]
    fn test_fault_layout() {
        let err = RpcError::OpnumOutOfRange {
            interface: "IDataCollectorSet",
            op_num: 67,
        };
        let bytes = FaultPdu::from_error(9, 1, &err).encode();
        assert_eq!(bytes.len(), FAULT_SIZE);
        assert_eq!(bytes[2], PacketType::Fault as u8);
        assert_eq!(bytes[3], 0x23);
        assert_eq!(&bytes[24..28], &status::NCA_S_OP_RNG_ERROR.to_le_bytes());
    }

    #[tokio::test]
    async fn test_fragment_read_write() {
        let frame = request_frame(8, None, &[0u8; 12]);
        let mut buf = Vec::new();
        write_fragment(&mut buf, &frame).await.unwrap();
        write_fragment(&mut buf, &frame).await.unwrap();

        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(read_fragment(&mut cursor).await.unwrap(), Some(frame.clone()));
        assert_eq!(read_fragment(&mut cursor).await.unwrap(), Some(frame));
        assert_eq!(read_fragment(&mut cursor).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_truncated_header_is_an_error() {
        let mut cursor = std::io::Cursor::new(vec![5u8, 0, 0, 3, 0x10, 0, 0]);
        let err = read_fragment(&mut cursor).await.unwrap_err();
        assert!(matches!(err, RpcError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_fragment_shorter_than_header_is_rejected() {
        let mut frame = request_frame(8, None, &[]);
        frame[8] = 4;
        frame[9] = 0;
        let mut cursor = std::io::Cursor::new(frame);
        assert!(read_fragment(&mut cursor).await.is_err());
    }
}
