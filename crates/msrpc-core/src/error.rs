//! Error types for MSRPC call handling.
//!
//! `NdrError` covers stub data that cannot be decoded or encoded. `RpcError`
//! is what handlers and dispatchers return; it maps onto the status codes a
//! FAULT PDU carries back to the client.

use thiserror::Error;

/// Failure while reading or writing NDR stub data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NdrError {
    #[error("unexpected end of stub data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("{what} size {size} exceeds limit {limit}")]
    LimitExceeded {
        what: &'static str,
        size: u64,
        limit: u64,
    },

    #[error("invalid {what} value {value:#x}")]
    InvalidValue { what: &'static str, value: u64 },

    #[error("{what} size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error("{what} is not valid UTF-16")]
    InvalidString { what: &'static str },

    #[error("{what} is a reference pointer and cannot be NULL")]
    NullReference { what: &'static str },
}

/// Status codes returned in FAULT PDUs.
pub mod status {
    /// `RPC_X_BAD_STUB_DATA`
    pub const RPC_X_BAD_STUB_DATA: u32 = 0x0000_06F7;
    /// `E_NOTIMPL`
    pub const E_NOTIMPL: u32 = 0x8000_4001;
    /// `nca_s_fault_unspec`
    pub const NCA_S_FAULT_UNSPEC: u32 = 0x1C00_0012;
    /// `nca_s_op_rng_error`
    pub const NCA_S_OP_RNG_ERROR: u32 = 0x1C01_0002;
    /// `nca_s_unk_if`
    pub const NCA_S_UNK_IF: u32 = 0x1C01_0003;
    /// `nca_s_proto_error`
    pub const NCA_S_PROTO_ERROR: u32 = 0x1C01_000B;
}

/// Main error type for dispatch and call handling.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("NDR error: {0}")]
    Ndr(#[from] NdrError),

    #[error("operation not implemented")]
    NotImplemented,

    #[error("operation number {op_num} is out of range for {interface}")]
    OpnumOutOfRange {
        interface: &'static str,
        op_num: u16,
    },

    #[error("no server registered for interface {0}")]
    UnknownInterface(String),

    #[error("presentation context {0} is not bound")]
    UnknownContext(u16),

    #[error("protocol error: {message}")]
    Protocol { message: String },

    #[error("call failed with status {status:#010x}")]
    Fault { status: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias using RpcError.
pub type Result<T> = std::result::Result<T, RpcError>;

impl RpcError {
    pub fn protocol(message: impl Into<String>) -> Self {
        RpcError::Protocol {
            message: message.into(),
        }
    }

    /// Status code sent to the client in a FAULT PDU.
    pub fn to_fault_status(&self) -> u32 {
        match self {
            RpcError::Ndr(_) => status::RPC_X_BAD_STUB_DATA,
            RpcError::NotImplemented => status::E_NOTIMPL,
            RpcError::OpnumOutOfRange { .. } => status::NCA_S_OP_RNG_ERROR,
            RpcError::UnknownInterface(_) | RpcError::UnknownContext(_) => status::NCA_S_UNK_IF,
            RpcError::Protocol { .. } => status::NCA_S_PROTO_ERROR,
            RpcError::Fault { status } => *status,
            RpcError::Io(_) | RpcError::Other(_) => status::NCA_S_FAULT_UNSPEC,
        }
    }

    /// Whether the failure happened before the server routine ran.
    pub fn did_not_execute(&self) -> bool {
        matches!(
            self,
            RpcError::Ndr(_)
                | RpcError::OpnumOutOfRange { .. }
                | RpcError::UnknownInterface(_)
                | RpcError::UnknownContext(_)
                | RpcError::Protocol { .. }
        )
    }
}
