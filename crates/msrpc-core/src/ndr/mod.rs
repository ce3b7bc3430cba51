//! NDR20 (little-endian) encoding for the constructs MSRPC stubs here use.
//!
//! `Marshal` and `Unmarshal` are the seam between typed request/response
//! records and the stub bytes. Primitive integers, `Option<T>` as a unique
//! pointer, and `[string]` wide strings are implemented here; DCOM and OLE
//! Automation types implement the traits in their own modules.

mod reader;
mod writer;

pub use reader::NdrReader;
pub use writer::NdrWriter;

use crate::error::NdrError;
use uuid::Uuid;

/// Encode a value into stub data.
pub trait Marshal {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError>;
}

/// Decode a value from stub data.
pub trait Unmarshal: Sized {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError>;
}

macro_rules! primitive {
    ($ty:ty, $write:ident, $read:ident) => {
        impl Marshal for $ty {
            fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
                w.$write(*self);
                Ok(())
            }
        }

        impl Unmarshal for $ty {
            fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
                r.$read()
            }
        }
    };
}

primitive!(u8, write_u8, read_u8);
primitive!(u16, write_u16, read_u16);
primitive!(i16, write_i16, read_i16);
primitive!(u32, write_u32, read_u32);
primitive!(i32, write_i32, read_i32);

impl Marshal for Uuid {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        w.write_uuid(self);
        Ok(())
    }
}

impl Unmarshal for Uuid {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        r.read_uuid()
    }
}

/// `[unique] T*` whose referent follows the pointer immediately.
///
/// That placement is correct for top-level parameters and for a pointer that
/// is the last member of a top-level structure. Arrays of pointers defer
/// their referents and are encoded by their own types.
impl<T: Marshal> Marshal for Option<T> {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        w.write_referent(self.is_some());
        match self {
            Some(value) => value.marshal_ndr(w),
            None => Ok(()),
        }
    }
}

impl<T: Unmarshal> Unmarshal for Option<T> {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        match r.read_referent()? {
            Some(_) => Ok(Some(T::unmarshal_ndr(r)?)),
            None => Ok(None),
        }
    }
}

/// Write a `[string] wchar_t*` referent: conformant varying array of UTF-16
/// units including the terminating NUL.
pub fn write_wide_string(w: &mut NdrWriter, s: &str) {
    let mut units: Vec<u16> = s.encode_utf16().collect();
    units.push(0);
    w.write_count(units.len());
    w.write_u32(0);
    w.write_count(units.len());
    w.write_utf16_units(&units);
}

/// Read a `[string] wchar_t*` referent written by [`write_wide_string`].
pub fn read_wide_string(r: &mut NdrReader<'_>, what: &'static str) -> Result<String, NdrError> {
    let max_count = r.read_count(what, 0)?;
    let offset = r.read_u32()?;
    if offset != 0 {
        return Err(NdrError::InvalidValue {
            what,
            value: offset as u64,
        });
    }
    let actual_count = r.read_count(what, 2)?;
    if actual_count > max_count {
        return Err(NdrError::SizeMismatch {
            what,
            expected: max_count as u64,
            actual: actual_count as u64,
        });
    }
    let mut units = r.read_utf16_units(actual_count)?;
    if units.last() == Some(&0) {
        units.pop();
    }
    String::from_utf16(&units).map_err(|_| NdrError::InvalidString { what })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_writes_null_referent() {
        let mut w = NdrWriter::new();
        Option::<u32>::None.marshal_ndr(&mut w).unwrap();
        Some(7u32).marshal_ndr(&mut w).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(hex::encode(&bytes), "000000000000020007000000");

        let mut r = NdrReader::new(&bytes);
        assert_eq!(Option::<u32>::unmarshal_ndr(&mut r).unwrap(), None);
        assert_eq!(Option::<u32>::unmarshal_ndr(&mut r).unwrap(), Some(7));
    }

    #[test]
    fn test_wide_string_includes_terminator() {
        let mut w = NdrWriter::new();
        write_wide_string(&mut w, "Ok");
        let bytes = w.into_bytes();
        assert_eq!(
            hex::encode(&bytes),
            "0300000000000000030000004f006b000000"
        );

        let mut r = NdrReader::new(&bytes);
        assert_eq!(read_wide_string(&mut r, "name").unwrap(), "Ok");
    }

    #[test]
    fn test_wide_string_rejects_non_zero_offset() {
        let bytes = hex::decode("010000000100000000000000").unwrap();
        let mut r = NdrReader::new(&bytes);
        assert!(matches!(
            read_wide_string(&mut r, "name"),
            Err(NdrError::InvalidValue { what: "name", value: 1 })
        ));
    }
}
