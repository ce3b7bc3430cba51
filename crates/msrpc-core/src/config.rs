//! Centralized configuration for the MSRPC call plumbing.
//!
//! Wire constants and decoder limits live here so the codec, the PDU layer
//! and the DCOM headers agree on them.

/// NDR codec limits.
pub struct NdrConfig;

impl NdrConfig {
    /// Upper bound on any conformant count read from the wire.
    pub const MAX_CONFORMANT_COUNT: usize = 1_048_576;
    /// First referent id handed out by the writer.
    pub const REFERENT_ID_BASE: u32 = 0x0002_0000;
    /// Increment between consecutive referent ids.
    pub const REFERENT_ID_STEP: u32 = 4;
}

/// Connection-oriented DCE/RPC framing.
pub struct DcerpcConfig;

impl DcerpcConfig {
    pub const RPC_VERSION: u8 = 5;
    pub const RPC_VERSION_MINOR: u8 = 0;
    pub const HEADER_SIZE: usize = 16;
    pub const MAX_FRAGMENT_SIZE: usize = u16::MAX as usize;
    /// Little-endian integers, ASCII characters, IEEE floats.
    pub const DATA_REPRESENTATION: [u8; 4] = [0x10, 0x00, 0x00, 0x00];
}

/// DCOM protocol version advertised in ORPC headers.
pub struct DcomConfig;

impl DcomConfig {
    pub const COM_VERSION_MAJOR: u16 = 5;
    pub const COM_VERSION_MINOR: u16 = 7;
}
