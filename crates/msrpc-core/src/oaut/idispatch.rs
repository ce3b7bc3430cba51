//! `IDispatch` server side.
//!
//! Every automation interface inherits opnums 3..=6 from `IDispatch` (0..=2
//! belong to `IUnknown`, which is not callable through object RPC). Derived
//! dispatchers forward any opnum below their own range to
//! [`dispatch_server_handle`].

use crate::dcerpc::{CallContext, Conn, Operation, ServerHandle, ServerOptions, SyntaxId};
use crate::dcom::InterfacePointer;
use crate::error::{NdrError, Result, RpcError};
use crate::ndr::{read_wide_string, write_wide_string, Marshal, NdrReader, NdrWriter, Unmarshal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::{uuid, Uuid};

/// `IDispatch` interface identifier.
pub const DISPATCH_IID: Uuid = uuid!("00020400-0000-0000-c000-000000000046");

/// `IDispatch` v0.0.
pub const DISPATCH_SYNTAX_V0_0: SyntaxId = SyntaxId::new(DISPATCH_IID, 0, 0);

/// Stub bytes passed through without interpretation. Reading consumes the
/// rest of the stub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueStub(pub Vec<u8>);

impl Marshal for OpaqueStub {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> std::result::Result<(), NdrError> {
        w.write_bytes(&self.0);
        Ok(())
    }
}

impl Unmarshal for OpaqueStub {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> std::result::Result<Self, NdrError> {
        Ok(OpaqueStub(r.read_remaining().to_vec()))
    }
}

/// `[in, size_is(cNames)] LPOLESTR* rgszNames`. NULL entries read as empty
/// names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameArray(pub Vec<String>);

impl Marshal for NameArray {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> std::result::Result<(), NdrError> {
        w.write_count(self.0.len());
        for _ in &self.0 {
            w.write_referent(true);
        }
        for name in &self.0 {
            write_wide_string(w, name);
        }
        Ok(())
    }
}

impl Unmarshal for NameArray {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> std::result::Result<Self, NdrError> {
        let count = r.read_count("names", 4)?;
        let mut present = Vec::with_capacity(count);
        for _ in 0..count {
            present.push(r.read_referent()?.is_some());
        }
        let mut names = Vec::with_capacity(count);
        for p in present {
            names.push(if p {
                read_wide_string(r, "name")?
            } else {
                String::new()
            });
        }
        Ok(NameArray(names))
    }
}

/// `[out, size_is(cNames)] DISPID* rgDispId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispIdArray(pub Vec<i32>);

impl Marshal for DispIdArray {
    fn marshal_ndr(&self, w: &mut NdrWriter) -> std::result::Result<(), NdrError> {
        w.write_count(self.0.len());
        for id in &self.0 {
            w.write_i32(*id);
        }
        Ok(())
    }
}

impl Unmarshal for DispIdArray {
    fn unmarshal_ndr(r: &mut NdrReader<'_>) -> std::result::Result<Self, NdrError> {
        let count = r.read_count("dispatch ids", 4)?;
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(r.read_i32()?);
        }
        Ok(DispIdArray(ids))
    }
}

crate::dcom_operation! {
    interface: "IDispatch",
    name: "GetTypeInfoCount",
    op_num: 3,
    request GetTypeInfoCountRequest {}
    response GetTypeInfoCountResponse {
        /// 1 if type information is available, 0 otherwise.
        type_info_count: u32,
    }
}

crate::dcom_operation! {
    interface: "IDispatch",
    name: "GetTypeInfo",
    op_num: 4,
    request GetTypeInfoRequest {
        type_info_index: u32,
        locale_id: u32,
    }
    response GetTypeInfoResponse {
        type_info: Option<InterfacePointer>,
    }
}

/// Upper bound on `cNames` in `GetIDsOfNames`.
pub const MAX_NAMES: u32 = 16384;

fn check_names_count(req: &GetIDsOfNamesRequest) -> std::result::Result<(), NdrError> {
    if req.names_count > MAX_NAMES {
        return Err(NdrError::LimitExceeded {
            what: "cNames",
            size: req.names_count as u64,
            limit: MAX_NAMES as u64,
        });
    }
    if req.names.0.len() as u64 != req.names_count as u64 {
        return Err(NdrError::SizeMismatch {
            what: "rgszNames",
            expected: req.names_count as u64,
            actual: req.names.0.len() as u64,
        });
    }
    Ok(())
}

crate::dcom_operation! {
    interface: "IDispatch",
    name: "GetIDsOfNames",
    op_num: 5,
    request GetIDsOfNamesRequest {
        iid: Uuid,
        names: NameArray,
        names_count: u32,
        locale_id: u32,
    }
    check check_names_count;
    response GetIDsOfNamesResponse {
        dispatch_ids: DispIdArray,
    }
}

crate::dcom_operation! {
    interface: "IDispatch",
    name: "Invoke",
    op_num: 6,
    /// `DISPPARAMS` and the by-ref argument arrays are kept as raw stub bytes.
    request InvokeRequest {
        dispatch_id_member: i32,
        iid: Uuid,
        locale_id: u32,
        flags: u32,
        args: OpaqueStub,
    }
    /// `body` holds the result `VARIANT`, `EXCEPINFO`, argument error index
    /// and by-ref arguments, already encoded.
    response InvokeResponse {
        body: OpaqueStub,
    }
}

/// Server routines for `IDispatch`. Unimplemented methods return
/// [`RpcError::NotImplemented`].
#[async_trait::async_trait]
pub trait DispatchServer: Send + Sync {
    async fn get_type_info_count(
        &self,
        _ctx: &CallContext,
        _req: GetTypeInfoCountRequest,
    ) -> Result<GetTypeInfoCountResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_type_info(
        &self,
        _ctx: &CallContext,
        _req: GetTypeInfoRequest,
    ) -> Result<GetTypeInfoResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_ids_of_names(
        &self,
        _ctx: &CallContext,
        _req: GetIDsOfNamesRequest,
    ) -> Result<GetIDsOfNamesResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn invoke(&self, _ctx: &CallContext, _req: InvokeRequest) -> Result<InvokeResponse> {
        Err(RpcError::NotImplemented)
    }
}

/// Decode, call and box one `IDispatch` method.
pub async fn dispatch_server_handle<S>(
    server: &S,
    ctx: &CallContext,
    op_num: u16,
    r: &mut NdrReader<'_>,
) -> Result<Box<dyn Operation>>
where
    S: DispatchServer + ?Sized,
{
    match op_num {
        3 => {
            let req = GetTypeInfoCountRequest::unmarshal_ndr(r)?;
            Ok(Box::new(server.get_type_info_count(ctx, req).await?))
        }
        4 => {
            let req = GetTypeInfoRequest::unmarshal_ndr(r)?;
            Ok(Box::new(server.get_type_info(ctx, req).await?))
        }
        5 => {
            let req = GetIDsOfNamesRequest::unmarshal_ndr(r)?;
            Ok(Box::new(server.get_ids_of_names(ctx, req).await?))
        }
        6 => {
            let req = InvokeRequest::unmarshal_ndr(r)?;
            Ok(Box::new(server.invoke(ctx, req).await?))
        }
        _ => {
            warn!(op_num, "IDispatch method not found");
            Err(RpcError::OpnumOutOfRange {
                interface: "IDispatch",
                op_num,
            })
        }
    }
}

/// [`ServerHandle`] serving a bare `IDispatch` object.
pub struct DispatchServerHandle<S: ?Sized>(Arc<S>);

impl<S: DispatchServer + ?Sized> DispatchServerHandle<S> {
    pub fn new(server: Arc<S>) -> Self {
        Self(server)
    }
}

#[async_trait::async_trait]
impl<S: DispatchServer + ?Sized + 'static> ServerHandle for DispatchServerHandle<S> {
    async fn handle(
        &self,
        ctx: &CallContext,
        op_num: u16,
        r: &mut NdrReader<'_>,
    ) -> Result<Box<dyn Operation>> {
        dispatch_server_handle(self.0.as_ref(), ctx, op_num, r).await
    }
}

/// Register `server` as `IDispatch` v0.0 on `conn`.
pub fn register_dispatch_server<S>(
    conn: &dyn Conn,
    server: Arc<S>,
    options: ServerOptions,
) -> Result<()>
where
    S: DispatchServer + 'static,
{
    conn.register_server(
        Arc::new(DispatchServerHandle::new(server)),
        options.with_abstract_syntax(DISPATCH_SYNTAX_V0_0),
    )
}
