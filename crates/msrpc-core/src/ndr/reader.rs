//! Cursor over little-endian NDR20 stub data.

use crate::config::NdrConfig;
use crate::error::NdrError;
use uuid::Uuid;

/// Reads NDR primitives from a stub buffer.
///
/// Alignment is computed relative to the start of the buffer, which must be
/// the start of the stub data.
#[derive(Debug)]
pub struct NdrReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> NdrReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], NdrError> {
        if n > self.remaining() {
            return Err(NdrError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Skip padding up to the next multiple of `n`.
    pub fn align(&mut self, n: usize) -> Result<(), NdrError> {
        let pad = (n - self.pos % n) % n;
        self.take(pad).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, NdrError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, NdrError> {
        self.align(2)?;
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_i16(&mut self) -> Result<i16, NdrError> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32, NdrError> {
        self.align(4)?;
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32, NdrError> {
        Ok(self.read_u32()? as i32)
    }

    /// GUID as `u32, u16, u16, [u8; 8]`.
    pub fn read_uuid(&mut self) -> Result<Uuid, NdrError> {
        let d1 = self.read_u32()?;
        let d2 = self.read_u16()?;
        let d3 = self.read_u16()?;
        let mut d4 = [0u8; 8];
        d4.copy_from_slice(self.take(8)?);
        Ok(Uuid::from_fields(d1, d2, d3, &d4))
    }

    /// Read a pointer referent id. `None` is the NULL pointer.
    pub fn read_referent(&mut self) -> Result<Option<u32>, NdrError> {
        let id = self.read_u32()?;
        Ok((id != 0).then_some(id))
    }

    /// Read a conformance (or variance) count and check it against both the
    /// configured limit and the bytes left, assuming each element occupies
    /// at least `element_size` bytes.
    pub fn read_count(&mut self, what: &'static str, element_size: usize) -> Result<usize, NdrError> {
        let count = self.read_u32()? as usize;
        if count > NdrConfig::MAX_CONFORMANT_COUNT {
            return Err(NdrError::LimitExceeded {
                what,
                size: count as u64,
                limit: NdrConfig::MAX_CONFORMANT_COUNT as u64,
            });
        }
        let needed = count.saturating_mul(element_size);
        if needed > self.remaining() {
            return Err(NdrError::UnexpectedEof {
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(count)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], NdrError> {
        self.take(n)
    }

    /// Consume everything left in the buffer.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let rest = &self.buf[self.pos..];
        self.pos = self.buf.len();
        rest
    }

    /// Read `count` UTF-16 code units.
    pub fn read_utf16_units(&mut self, count: usize) -> Result<Vec<u16>, NdrError> {
        self.align(2)?;
        let bytes = self.take(count * 2)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect())
    }
}
