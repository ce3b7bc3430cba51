//! Little-endian NDR20 stub encoder.

use crate::config::NdrConfig;
use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

/// Builds stub data. Alignment is relative to the start of the stub.
#[derive(Debug)]
pub struct NdrWriter {
    buf: BytesMut,
    next_referent: u32,
}

impl Default for NdrWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl NdrWriter {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
            next_referent: NdrConfig::REFERENT_ID_BASE,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Pad with zeros up to the next multiple of `n`.
    pub fn align(&mut self, n: usize) {
        let pad = (n - self.buf.len() % n) % n;
        self.buf.put_bytes(0, pad);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.align(2);
        self.buf.put_u16_le(v);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.write_u16(v as u16);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.align(4);
        self.buf.put_u32_le(v);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write_u32(v as u32);
    }

    pub fn write_uuid(&mut self, id: &Uuid) {
        let (d1, d2, d3, d4) = id.as_fields();
        self.write_u32(d1);
        self.write_u16(d2);
        self.write_u16(d3);
        self.buf.put_slice(d4);
    }

    /// Write a referent id for a non-NULL pointer, or zero for NULL.
    pub fn write_referent(&mut self, present: bool) {
        if present {
            let id = self.next_referent;
            self.next_referent = self.next_referent.wrapping_add(NdrConfig::REFERENT_ID_STEP);
            self.write_u32(id);
        } else {
            self.write_u32(0);
        }
    }

    pub fn write_count(&mut self, count: usize) {
        self.write_u32(count as u32);
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    pub fn write_utf16_units(&mut self, units: &[u16]) {
        self.align(2);
        for unit in units {
            self.buf.put_u16_le(*unit);
        }
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_pads_with_zeros() {
        let mut w = NdrWriter::new();
        w.write_u8(0x01);
        w.write_u32(0x1234_5678);
        assert_eq!(
            w.into_bytes().as_ref(),
            &[0x01, 0, 0, 0, 0x78, 0x56, 0x34, 0x12]
        );
    }

    #[test]
    fn test_referents_are_unique_and_non_zero() {
        let mut w = NdrWriter::new();
        w.write_referent(true);
        w.write_referent(false);
        w.write_referent(true);
        let bytes = w.into_bytes();
        assert_eq!(&bytes[0..4], &0x0002_0000u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &0x0002_0004u32.to_le_bytes());
    }

    #[test]
    fn test_uuid_layout() {
        let id = Uuid::parse_str("00020400-0000-0000-c000-000000000046").unwrap();
        let mut w = NdrWriter::new();
        w.write_uuid(&id);
        assert_eq!(
            hex::encode(w.into_bytes()),
            "0004020000000000c000000000000046"
        );
    }
}
