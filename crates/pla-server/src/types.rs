//! Performance Logs and Alerts enumerations used by `IDataCollectorSet`.

use msrpc_core::ndr::{Marshal, NdrReader, NdrWriter, Unmarshal};
use msrpc_core::{InterfacePointer, NdrError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `IDataCollectorCollection` reference.
pub type DataCollectorCollection = InterfacePointer;
/// `IScheduleCollection` reference.
pub type ScheduleCollection = InterfacePointer;
/// `IDataManager` reference.
pub type DataManager = InterfacePointer;
/// `IValueMap` reference.
pub type ValueMap = InterfacePointer;

/// Running status of a data collector set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum DataCollectorSetStatus {
    #[default]
    Stopped = 0,
    Running = 1,
    /// Running with the data manager enabled, performing data management.
    Compiling = 2,
    /// Not used.
    Pending = 3,
    /// Status unknown but no error occurred; typical for boot trace sessions.
    Undefined = 4,
}

impl TryFrom<u16> for DataCollectorSetStatus {
    type Error = NdrError;

    fn try_from(value: u16) -> Result<Self, NdrError> {
        match value {
            0 => Ok(Self::Stopped),
            1 => Ok(Self::Running),
            2 => Ok(Self::Compiling),
            3 => Ok(Self::Pending),
            4 => Ok(Self::Undefined),
            other => Err(NdrError::InvalidValue {
                what: "DataCollectorSetStatus",
                value: other as u64,
            }),
        }
    }
}

impl fmt::Display for DataCollectorSetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Compiling => "compiling",
            Self::Pending => "pending",
            Self::Undefined => "undefined",
        };
        f.write_str(name)
    }
}

impl Marshal for DataCollectorSetStatus {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
        w.write_u16(*self as u16);
        Ok(())
    }
}

impl Unmarshal for DataCollectorSetStatus {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
        Self::try_from(r.read_u16()?)
    }
}

macro_rules! flags16 {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$flag_meta:meta])* const $flag:ident = $value:expr; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u16);

        impl $name {
            $( $(#[$flag_meta])* pub const $flag: Self = Self($value); )*

            pub const fn bits(self) -> u16 {
                self.0
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl Marshal for $name {
            fn marshal_ndr(&self, w: &mut NdrWriter) -> Result<(), NdrError> {
                w.write_u16(self.0);
                Ok(())
            }
        }

        impl Unmarshal for $name {
            fn unmarshal_ndr(r: &mut NdrReader<'_>) -> Result<Self, NdrError> {
                Ok(Self(r.read_u16()?))
            }
        }
    };
}

flags16! {
    /// Decoration appended to a subdirectory or file name.
    pub struct AutoPathFormat {
        const NONE = 0x0000;
        /// Use the subdirectory format pattern.
        const PATTERN = 0x0001;
        const COMPUTER = 0x0002;
        const MONTH_DAY_HOUR = 0x0100;
        const SERIAL_NUMBER = 0x0200;
        const YEAR_DAY_OF_YEAR = 0x0400;
        const YEAR_MONTH = 0x0800;
        const YEAR_MONTH_DAY = 0x1000;
        const YEAR_MONTH_DAY_HOUR = 0x2000;
        const MONTH_DAY_HOUR_MINUTE = 0x4000;
    }
}

flags16! {
    /// How `Commit` saves or applies a data collector set.
    pub struct CommitMode {
        const CREATE_NEW = 0x0001;
        const MODIFY = 0x0002;
        const CREATE_OR_MODIFY = 0x0003;
        const UPDATE_RUNNING_INSTANCE = 0x0010;
        const FLUSH_TRACE = 0x0020;
        const VALIDATE_ONLY = 0x1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rejects_unknown_value() {
        let bytes = 9u16.to_le_bytes();
        let mut r = NdrReader::new(&bytes);
        assert!(matches!(
            DataCollectorSetStatus::unmarshal_ndr(&mut r),
            Err(NdrError::InvalidValue { value: 9, .. })
        ));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(DataCollectorSetStatus::Compiling.to_string(), "compiling");
    }

    #[test]
    fn test_flags_combine() {
        let mode = CommitMode::CREATE_NEW | CommitMode::MODIFY;
        assert_eq!(mode, CommitMode::CREATE_OR_MODIFY);
        assert!(mode.contains(CommitMode::MODIFY));
        assert!(!mode.contains(CommitMode::VALIDATE_ONLY));

        let format = AutoPathFormat::COMPUTER | AutoPathFormat::SERIAL_NUMBER;
        assert_eq!(format.bits(), 0x0202);
    }

    #[test]
    fn test_unknown_flag_bits_are_kept() {
        let bytes = 0x8001u16.to_le_bytes();
        let mut r = NdrReader::new(&bytes);
        let format = AutoPathFormat::unmarshal_ndr(&mut r).unwrap();
        let mut w = NdrWriter::new();
        format.marshal_ndr(&mut w).unwrap();
        assert_eq!(w.into_bytes().as_ref(), &bytes);
    }
}
