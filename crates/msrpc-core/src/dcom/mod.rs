//! DCOM (MS-DCOM) wire structures shared by every object interface.
//!
//! Each object RPC request starts with an [`OrpcThis`] and each response with
//! an [`OrpcThat`]. Interface pointers travel as opaque [`InterfacePointer`]
//! blobs.

use crate::config::DcomConfig;
use crate::error::NdrError;
use crate::ndr::{Marshal, NdrReader, NdrWriter, Unmarshal};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// COM protocol version carried in `ORPCTHIS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComVersion {
    pub major: u16,
    pub minor: u16,
}

impl Default for ComVersion {
    fn default() -> Self {
        Self {
            major: DcomConfig::COM_VERSION_MAJOR,
            minor: DcomConfig::COM_VERSION_MINOR,
        }
    }
}

impl Marshal for ComVersion {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        w.write_u16(self.major);
        w.write_u16(self.minor);
        Ok(())
    }
}

impl Unmarshal for ComVersion {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        Ok(Self {
            major: r.read_u16()?,
            minor: r.read_u16()?,
        })
    }
}

/// A single `ORPC_EXTENT`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrpcExtent {
    pub id: Uuid,
    pub data: Vec<u8>,
}

fn padded_extent_size(size: usize) -> usize {
    (size + 7) & !7
}

impl Marshal for OrpcExtent {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        let padded = padded_extent_size(self.data.len());
        w.write_count(padded);
        w.write_uuid(&self.id);
        w.write_count(self.data.len());
        w.write_bytes(&self.data);
        w.write_bytes(&vec![0u8; padded - self.data.len()]);
        Ok(())
    }
}

impl Unmarshal for OrpcExtent {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        let max_count = r.read_count("ORPC extent", 1)?;
        let id = r.read_uuid()?;
        let size = r.read_u32()? as usize;
        if size > max_count {
            return Err(NdrError::SizeMismatch {
                what: "ORPC extent",
                expected: max_count as u64,
                actual: size as u64,
            });
        }
        let data = r.read_bytes(max_count)?[..size].to_vec();
        Ok(Self { id, data })
    }
}

/// `ORPC_EXTENT_ARRAY`. The pointer array is sized up to an even count; the
/// padding slot is a NULL pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrpcExtentArray {
    pub extents: Vec<OrpcExtent>,
}

impl Marshal for OrpcExtentArray {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        let size = self.extents.len();
        w.write_count(size);
        w.write_u32(0);
        w.write_referent(true);

        let slots = (size + 1) & !1;
        w.write_count(slots);
        for i in 0..slots {
            w.write_referent(i < size);
        }
        for extent in &self.extents {
            extent.marshal_ndr(w)?;
        }
        Ok(())
    }
}

impl Unmarshal for OrpcExtentArray {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        let size = r.read_u32()? as usize;
        let _reserved = r.read_u32()?;
        if r.read_referent()?.is_none() {
            return Ok(Self::default());
        }

        let slots = r.read_count("ORPC extent array", 4)?;
        if slots != (size + 1) & !1 {
            return Err(NdrError::SizeMismatch {
                what: "ORPC extent array",
                expected: ((size + 1) & !1) as u64,
                actual: slots as u64,
            });
        }
        let mut present = Vec::with_capacity(slots);
        for _ in 0..slots {
            present.push(r.read_referent()?.is_some());
        }
        let mut extents = Vec::new();
        for _ in present.into_iter().filter(|p| *p) {
            extents.push(OrpcExtent::unmarshal_ndr(r)?);
        }
        Ok(Self { extents })
    }
}

/// `ORPCTHIS`, the implicit first parameter of every object RPC request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrpcThis {
    pub version: ComVersion,
    pub flags: u32,
    /// Causality id.
    pub cid: Uuid,
    pub extensions: Option<OrpcExtentArray>,
}

impl Marshal for OrpcThis {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        self.version.marshal_ndr(w)?;
        w.write_u32(self.flags);
        w.write_u32(0);
        w.write_uuid(&self.cid);
        self.extensions.marshal_ndr(w)
    }
}

impl Unmarshal for OrpcThis {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        let version = ComVersion::unmarshal_ndr(r)?;
        let flags = r.read_u32()?;
        let _reserved = r.read_u32()?;
        Ok(Self {
            version,
            flags,
            cid: r.read_uuid()?,
            extensions: Option::unmarshal_ndr(r)?,
        })
    }
}

/// `ORPCTHAT`, the implicit first out parameter of every object RPC response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrpcThat {
    pub flags: u32,
    pub extensions: Option<OrpcExtentArray>,
}

impl Marshal for OrpcThat {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        w.write_u32(self.flags);
        self.extensions.marshal_ndr(w)
    }
}

impl Unmarshal for OrpcThat {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        Ok(Self {
            flags: r.read_u32()?,
            extensions: Option::unmarshal_ndr(r)?,
        })
    }
}

/// `MInterfacePointer`: a marshaled OBJREF kept as raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfacePointer {
    pub data: Vec<u8>,
}

impl InterfacePointer {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl Marshal for InterfacePointer {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        w.write_count(self.data.len());
        w.write_count(self.data.len());
        w.write_bytes(&self.data);
        Ok(())
    }
}

impl Unmarshal for InterfacePointer {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        let max_count = r.read_count("interface pointer", 1)?;
        let size = r.read_u32()? as usize;
        if size != max_count {
            return Err(NdrError::SizeMismatch {
                what: "interface pointer",
                expected: max_count as u64,
                actual: size as u64,
            });
        }
        Ok(Self {
            data: r.read_bytes(size)?.to_vec(),
        })
    }
}
