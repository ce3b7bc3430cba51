//! In-process server registry.
//!
//! Maps abstract syntaxes to server handles and presentation context ids to
//! abstract syntaxes. Context negotiation (BIND / ALTER_CONTEXT) happens
//! outside; the transport calls [`ServerRegistry::bind_context`] once a
//! context is accepted and then feeds REQUEST fragments to
//! [`ServerRegistry::handle_request`].

use super::pdu::{CommonHeader, FaultPdu, RequestPdu, ResponsePdu};
use super::{CallContext, Conn, ServerHandle, ServerOptions, SyntaxId};
use crate::error::{Result, RpcError};
use crate::ndr::{NdrReader, NdrWriter};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

#[derive(Default)]
pub struct ServerRegistry {
    handles: RwLock<HashMap<SyntaxId, Arc<dyn ServerHandle>>>,
    contexts: RwLock<HashMap<u16, SyntaxId>>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, syntax: &SyntaxId) -> Result<bool> {
        let handles = self
            .handles
            .read()
            .map_err(|_| RpcError::Other("Failed to acquire read lock for server handles".into()))?;
        Ok(handles.contains_key(syntax))
    }

    /// Associate a presentation context id with a registered interface.
    pub fn bind_context(&self, context_id: u16, syntax: SyntaxId) -> Result<()> {
        if !self.is_registered(&syntax)? {
            return Err(RpcError::UnknownInterface(syntax.to_string()));
        }
        let mut contexts = self
            .contexts
            .write()
            .map_err(|_| RpcError::Other("Failed to acquire write lock for contexts".into()))?;
        contexts.insert(context_id, syntax);
        debug!("Bound context {} to {}", context_id, syntax);
        Ok(())
    }

    fn syntax_for_context(&self, context_id: u16) -> Result<SyntaxId> {
        let contexts = self
            .contexts
            .read()
            .map_err(|_| RpcError::Other("Failed to acquire read lock for contexts".into()))?;
        contexts
            .get(&context_id)
            .copied()
            .ok_or(RpcError::UnknownContext(context_id))
    }

    fn handle_for(&self, syntax: &SyntaxId) -> Result<Arc<dyn ServerHandle>> {
        let handles = self
            .handles
            .read()
            .map_err(|_| RpcError::Other("Failed to acquire read lock for server handles".into()))?;
        handles
            .get(syntax)
            .cloned()
            .ok_or_else(|| RpcError::UnknownInterface(syntax.to_string()))
    }

    /// Run one call against the handle registered for `syntax` and return the
    /// response stub.
    pub async fn invoke(&self, ctx: &CallContext, syntax: &SyntaxId, stub: &[u8]) -> Result<Bytes> {
        let handle = self.handle_for(syntax)?;
        let mut r = NdrReader::new(stub);
        let op = handle.handle(ctx, ctx.op_num, &mut r).await?;
        debug!(
            call_id = ctx.call_id,
            op = op.op_name(),
            "Dispatched call"
        );

        let mut w = NdrWriter::new();
        op.marshal_response(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Handle one REQUEST fragment and produce the RESPONSE or FAULT fragment
    /// to send back.
    ///
    /// Errors only when the fragment is too malformed to address a reply.
    pub async fn handle_request(&self, frame: &[u8]) -> Result<Bytes> {
        let pdu = match RequestPdu::decode(frame) {
            Ok(pdu) => pdu,
            Err(e) => {
                let header = CommonHeader::parse(frame)?;
                warn!(call_id = header.call_id, "Rejected request: {}", e);
                return Ok(FaultPdu::from_error(header.call_id, 0, &e).encode());
            }
        };

        let ctx = CallContext {
            call_id: pdu.header.call_id,
            context_id: pdu.context_id,
            op_num: pdu.op_num,
            object: pdu.object,
        };

        let result = match self.syntax_for_context(pdu.context_id) {
            Ok(syntax) => self.invoke(&ctx, &syntax, pdu.stub).await,
            Err(e) => Err(e),
        };
        let reply = result.and_then(|stub| {
            ResponsePdu {
                call_id: ctx.call_id,
                context_id: ctx.context_id,
                stub: &stub,
            }
            .encode()
        });

        match reply {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                warn!(
                    call_id = ctx.call_id,
                    op_num = ctx.op_num,
                    "Call failed: {}",
                    e
                );
                Ok(FaultPdu::from_error(ctx.call_id, ctx.context_id, &e).encode())
            }
        }
    }
}

impl Conn for ServerRegistry {
    fn register_server(&self, handle: Arc<dyn ServerHandle>, options: ServerOptions) -> Result<()> {
        let syntax = *options
            .abstract_syntax()
            .ok_or_else(|| RpcError::Other("server options carry no abstract syntax".into()))?;
        let mut handles = self
            .handles
            .write()
            .map_err(|_| RpcError::Other("Failed to acquire write lock for server handles".into()))?;
        if handles.insert(syntax, handle).is_some() {
            warn!("Replaced server registered for {}", syntax);
        } else {
            info!("Registered server for {}", syntax);
        }
        Ok(())
    }
}
