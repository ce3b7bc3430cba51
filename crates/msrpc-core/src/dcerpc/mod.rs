//! DCE/RPC server-side call plumbing.
//!
//! # Architecture
//!
//! - **ServerHandle**: per-interface dispatcher, maps an opnum plus stub data to
//!   a typed call and returns the result as an [`Operation`]
//! - **Conn**: where server handles are registered under an abstract syntax
//! - **ServerRegistry**: in-process `Conn` that routes REQUEST PDUs to handles
//! - **pdu**: connection-oriented REQUEST / RESPONSE / FAULT framing

pub mod pdu;
pub mod registry;

pub use registry::ServerRegistry;

use crate::error::{NdrError, Result};
use crate::ndr::{NdrReader, NdrWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Interface identifier plus version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyntaxId {
    pub if_uuid: Uuid,
    pub if_version_major: u16,
    pub if_version_minor: u16,
}

impl SyntaxId {
    pub const fn new(if_uuid: Uuid, if_version_major: u16, if_version_minor: u16) -> Self {
        Self {
            if_uuid,
            if_version_major,
            if_version_minor,
        }
    }
}

impl fmt::Display for SyntaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{}.{}",
            self.if_uuid, self.if_version_major, self.if_version_minor
        )
    }
}

/// Per-call metadata handed to server routines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    pub call_id: u32,
    pub context_id: u16,
    pub op_num: u16,
    /// Object UUID from the REQUEST PDU; the IPID for DCOM calls.
    pub object: Option<Uuid>,
}

impl CallContext {
    pub fn new(op_num: u16) -> Self {
        Self {
            op_num,
            ..Default::default()
        }
    }
}

/// A completed call whose response can be written back as stub data.
pub trait Operation: Send + fmt::Debug {
    fn op_num(&self) -> u16;

    /// Fully qualified name, e.g. `/IDispatch/v0/GetTypeInfoCount`.
    fn op_name(&self) -> &'static str;

    fn marshal_response(&self, w: &mut NdrWriter) -> std::result::Result<(), NdrError>;
}

/// Dispatcher for one interface.
#[async_trait::async_trait]
pub trait ServerHandle: Send + Sync {
    async fn handle(
        &self,
        ctx: &CallContext,
        op_num: u16,
        r: &mut NdrReader<'_>,
    ) -> Result<Box<dyn Operation>>;
}

/// Options applied when registering a server handle.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    abstract_syntax: Option<SyntaxId>,
}

impl ServerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interface the handle serves. A later call wins.
    pub fn with_abstract_syntax(mut self, syntax: SyntaxId) -> Self {
        self.abstract_syntax = Some(syntax);
        self
    }

    pub fn abstract_syntax(&self) -> Option<&SyntaxId> {
        self.abstract_syntax.as_ref()
    }
}

/// Something that server handles can be registered with.
pub trait Conn: Send + Sync {
    fn register_server(&self, handle: Arc<dyn ServerHandle>, options: ServerOptions) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_display() {
        let syntax = SyntaxId::new(
            Uuid::parse_str("00020400-0000-0000-c000-000000000046").unwrap(),
            0,
            0,
        );
        assert_eq!(
            syntax.to_string(),
            "00020400-0000-0000-c000-000000000046 v0.0"
        );
    }

    #[test]
    fn test_options_last_syntax_wins() {
        let a = SyntaxId::new(Uuid::nil(), 1, 0);
        let b = SyntaxId::new(Uuid::nil(), 2, 0);
        let options = ServerOptions::new()
            .with_abstract_syntax(a)
            .with_abstract_syntax(b);
        assert_eq!(options.abstract_syntax(), Some(&b));
    }
}
