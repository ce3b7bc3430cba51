//! OLE Automation (MS-OAUT) wire types: `BSTR`, `VARIANT_BOOL` and
//! one-dimensional `SAFEARRAY(BSTR)`, plus the `IDispatch` base interface.

pub mod idispatch;

use crate::error::NdrError;
use crate::ndr::{Marshal, NdrReader, NdrWriter, Unmarshal};
use serde::{Deserialize, Serialize};

/// `cBytes` value marking a NULL string inside a `FLAGGED_WORD_BLOB`.
const NULL_BSTR_BYTES: u32 = 0xFFFF_FFFF;

const VT_BSTR: u16 = 8;
const SF_BSTR: u32 = VT_BSTR as u32;
const FADF_HAVEVARTYPE: u16 = 0x0080;
const FADF_BSTR: u16 = 0x0100;
/// Pointer size on the wire.
const BSTR_ELEMENT_SIZE: u32 = 4;

/// Length-prefixed UTF-16 string. `Bstr(None)` is the NULL `BSTR`, which is
/// distinct from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bstr(pub Option<String>);

impl Bstr {
    pub fn new(s: impl Into<String>) -> Self {
        Bstr(Some(s.into()))
    }

    pub fn null() -> Self {
        Bstr(None)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn write_blob(w: &mut NdrWriter, s: &str) {
        let units: Vec<u16> = s.encode_utf16().collect();
        w.write_count(units.len());
        w.write_u32((units.len() * 2) as u32);
        w.write_count(units.len());
        w.write_utf16_units(&units);
    }

    fn read_blob(r: &mut NdrReader<'_>) -> Result<Option<String>, NdrError> {
        let max_count = r.read_count("BSTR", 2)?;
        let byte_len = r.read_u32()?;
        let unit_count = r.read_u32()? as usize;
        if unit_count != max_count {
            return Err(NdrError::SizeMismatch {
                what: "BSTR",
                expected: max_count as u64,
                actual: unit_count as u64,
            });
        }
        let mut units = r.read_utf16_units(unit_count)?;
        if byte_len == NULL_BSTR_BYTES {
            return Ok(None);
        }
        let byte_len = byte_len as usize;
        if byte_len > unit_count * 2 {
            return Err(NdrError::SizeMismatch {
                what: "BSTR byte length",
                expected: (unit_count * 2) as u64,
                actual: byte_len as u64,
            });
        }
        units.truncate(byte_len.div_ceil(2));
        String::from_utf16(&units)
            .map(Some)
            .map_err(|_| NdrError::InvalidString { what: "BSTR" })
    }
}

impl From<&str> for Bstr {
    fn from(s: &str) -> Self {
        Bstr::new(s)
    }
}

impl From<String> for Bstr {
    fn from(s: String) -> Self {
        Bstr(Some(s))
    }
}

impl From<Option<String>> for Bstr {
    fn from(s: Option<String>) -> Self {
        Bstr(s)
    }
}

impl Marshal for Bstr {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        w.write_referent(self.0.is_some());
        if let Some(s) = &self.0 {
            Self::write_blob(w, s);
        }
        Ok(())
    }
}

impl Unmarshal for Bstr {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        // Any non-zero referent is accepted; Windows sends a fixed marker.
        match r.read_referent()? {
            Some(_) => Ok(Bstr(Self::read_blob(r)?)),
            None => Ok(Bstr(None)),
        }
    }
}

/// 16-bit automation boolean: `-1` is true, `0` is false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantBool(pub bool);

impl VariantBool {
    pub const TRUE: i16 = -1;
    pub const FALSE: i16 = 0;
}

impl From<bool> for VariantBool {
    fn from(value: bool) -> Self {
        VariantBool(value)
    }
}

impl From<VariantBool> for bool {
    fn from(value: VariantBool) -> Self {
        value.0
    }
}

impl Marshal for VariantBool {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        w.write_i16(if self.0 { Self::TRUE } else { Self::FALSE });
        Ok(())
    }
}

impl Unmarshal for VariantBool {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        Ok(VariantBool(r.read_i16()? != Self::FALSE))
    }
}

/// Contents of a one-dimensional `SAFEARRAY(BSTR)`.
///
/// Message fields carry `Option<BstrArray>`; `None` is the NULL array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BstrArray {
    pub lower_bound: i32,
    pub elements: Vec<Bstr>,
}

impl BstrArray {
    pub fn new(elements: impl IntoIterator<Item = Bstr>) -> Self {
        Self {
            lower_bound: 0,
            elements: elements.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Marshal for BstrArray {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        let count = self.elements.len();
        w.write_count(1);
        w.write_u16(1);
        w.write_u16(FADF_BSTR | FADF_HAVEVARTYPE);
        w.write_u32(BSTR_ELEMENT_SIZE);
        w.write_u32((VT_BSTR as u32) << 16);
        w.write_u32(SF_BSTR);
        w.write_count(count);
        w.write_referent(true);
        w.write_count(count);
        w.write_i32(self.lower_bound);

        w.write_count(count);
        for element in &self.elements {
            w.write_referent(!element.is_null());
        }
        for s in self.elements.iter().filter_map(Bstr::as_str) {
            Bstr::write_blob(w, s);
        }
        Ok(())
    }
}

impl Unmarshal for BstrArray {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        let bound_count = r.read_count("SAFEARRAY bounds", 8)?;
        let dims = r.read_u16()?;
        if dims != 1 || bound_count != 1 {
            return Err(NdrError::InvalidValue {
                what: "SAFEARRAY dimensions",
                value: dims as u64,
            });
        }
        let _features = r.read_u16()?;
        let _element_size = r.read_u32()?;
        let _locks = r.read_u32()?;
        let kind = r.read_u32()?;
        if kind != SF_BSTR {
            return Err(NdrError::InvalidValue {
                what: "SAFEARRAY type",
                value: kind as u64,
            });
        }
        let size = r.read_u32()? as usize;
        if r.read_referent()?.is_none() {
            return Err(NdrError::NullReference { what: "SAFEARRAY data" });
        }
        let element_count = r.read_u32()? as usize;
        let lower_bound = r.read_i32()?;
        if element_count != size {
            return Err(NdrError::SizeMismatch {
                what: "SAFEARRAY",
                expected: size as u64,
                actual: element_count as u64,
            });
        }

        let data_count = r.read_count("SAFEARRAY data", 4)?;
        if data_count != size {
            return Err(NdrError::SizeMismatch {
                what: "SAFEARRAY data",
                expected: size as u64,
                actual: data_count as u64,
            });
        }
        let mut present = Vec::with_capacity(size);
        for _ in 0..size {
            present.push(r.read_referent()?.is_some());
        }
        let mut elements = Vec::with_capacity(size);
        for p in present {
            elements.push(if p {
                Bstr(Bstr::read_blob(r)?)
            } else {
                Bstr::null()
            });
        }
        Ok(Self {
            lower_bound,
            elements,
        })
    }
}
