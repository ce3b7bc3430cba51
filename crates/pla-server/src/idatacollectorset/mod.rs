//! `IDataCollectorSet` server: a data collector set groups data collectors
//! and manages where and when they write their output.
//!
//! The interface derives from `IDispatch`; opnums below 7 are handled by the
//! `IDispatch` dispatcher, 7..=66 are the methods declared in [`messages`].

pub mod messages;

pub use messages::*;

use msrpc_core::dcerpc::{CallContext, Conn, Operation, ServerHandle, ServerOptions, SyntaxId};
use msrpc_core::ndr::{NdrReader, Unmarshal};
use msrpc_core::oaut::idispatch::{dispatch_server_handle, DispatchServer};
use msrpc_core::{Result, RpcError};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::{uuid, Uuid};

/// `IDataCollectorSet` interface identifier.
pub const DATA_COLLECTOR_SET_IID: Uuid = uuid!("03837520-098b-11d8-9414-505054503030");

/// `IDataCollectorSet` v0.0.
pub const DATA_COLLECTOR_SET_SYNTAX_V0_0: SyntaxId =
    SyntaxId::new(DATA_COLLECTOR_SET_IID, 0, 0);

/// First opnum owned by `IDataCollectorSet` rather than `IDispatch`.
pub const FIRST_OP_NUM: u16 = 7;
/// Last opnum of `IDataCollectorSet` v0.0.
pub const LAST_OP_NUM: u16 = 66;

/// Server routines for `IDataCollectorSet`.
///
/// Every method defaults to [`RpcError::NotImplemented`], so implementations
/// override only what they serve. Errors are returned to the caller as a
/// fault.
#[async_trait::async_trait]
pub trait DataCollectorSetServer: DispatchServer {
    async fn get_data_collectors(
        &self,
        _ctx: &CallContext,
        _req: GetDataCollectorsRequest,
    ) -> Result<GetDataCollectorsResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_duration(
        &self,
        _ctx: &CallContext,
        _req: GetDurationRequest,
    ) -> Result<GetDurationResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_duration(
        &self,
        _ctx: &CallContext,
        _req: SetDurationRequest,
    ) -> Result<SetDurationResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_description(
        &self,
        _ctx: &CallContext,
        _req: GetDescriptionRequest,
    ) -> Result<GetDescriptionResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_description(
        &self,
        _ctx: &CallContext,
        _req: SetDescriptionRequest,
    ) -> Result<SetDescriptionResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_description_unresolved(
        &self,
        _ctx: &CallContext,
        _req: GetDescriptionUnresolvedRequest,
    ) -> Result<GetDescriptionUnresolvedResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_display_name(
        &self,
        _ctx: &CallContext,
        _req: GetDisplayNameRequest,
    ) -> Result<GetDisplayNameResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_display_name(
        &self,
        _ctx: &CallContext,
        _req: SetDisplayNameRequest,
    ) -> Result<SetDisplayNameResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_display_name_unresolved(
        &self,
        _ctx: &CallContext,
        _req: GetDisplayNameUnresolvedRequest,
    ) -> Result<GetDisplayNameUnresolvedResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_keywords(
        &self,
        _ctx: &CallContext,
        _req: GetKeywordsRequest,
    ) -> Result<GetKeywordsResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_keywords(
        &self,
        _ctx: &CallContext,
        _req: SetKeywordsRequest,
    ) -> Result<SetKeywordsResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_latest_output_location(
        &self,
        _ctx: &CallContext,
        _req: GetLatestOutputLocationRequest,
    ) -> Result<GetLatestOutputLocationResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_latest_output_location(
        &self,
        _ctx: &CallContext,
        _req: SetLatestOutputLocationRequest,
    ) -> Result<SetLatestOutputLocationResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_name(&self, _ctx: &CallContext, _req: GetNameRequest) -> Result<GetNameResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_output_location(
        &self,
        _ctx: &CallContext,
        _req: GetOutputLocationRequest,
    ) -> Result<GetOutputLocationResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_root_path(
        &self,
        _ctx: &CallContext,
        _req: GetRootPathRequest,
    ) -> Result<GetRootPathResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_root_path(
        &self,
        _ctx: &CallContext,
        _req: SetRootPathRequest,
    ) -> Result<SetRootPathResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_segment(
        &self,
        _ctx: &CallContext,
        _req: GetSegmentRequest,
    ) -> Result<GetSegmentResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_segment(
        &self,
        _ctx: &CallContext,
        _req: SetSegmentRequest,
    ) -> Result<SetSegmentResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_segment_max_duration(
        &self,
        _ctx: &CallContext,
        _req: GetSegmentMaxDurationRequest,
    ) -> Result<GetSegmentMaxDurationResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_segment_max_duration(
        &self,
        _ctx: &CallContext,
        _req: SetSegmentMaxDurationRequest,
    ) -> Result<SetSegmentMaxDurationResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_segment_max_size(
        &self,
        _ctx: &CallContext,
        _req: GetSegmentMaxSizeRequest,
    ) -> Result<GetSegmentMaxSizeResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_segment_max_size(
        &self,
        _ctx: &CallContext,
        _req: SetSegmentMaxSizeRequest,
    ) -> Result<SetSegmentMaxSizeResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_serial_number(
        &self,
        _ctx: &CallContext,
        _req: GetSerialNumberRequest,
    ) -> Result<GetSerialNumberResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_serial_number(
        &self,
        _ctx: &CallContext,
        _req: SetSerialNumberRequest,
    ) -> Result<SetSerialNumberResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_server(
        &self,
        _ctx: &CallContext,
        _req: GetServerRequest,
    ) -> Result<GetServerResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_status(
        &self,
        _ctx: &CallContext,
        _req: GetStatusRequest,
    ) -> Result<GetStatusResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_subdirectory(
        &self,
        _ctx: &CallContext,
        _req: GetSubdirectoryRequest,
    ) -> Result<GetSubdirectoryResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_subdirectory(
        &self,
        _ctx: &CallContext,
        _req: SetSubdirectoryRequest,
    ) -> Result<SetSubdirectoryResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_subdirectory_format(
        &self,
        _ctx: &CallContext,
        _req: GetSubdirectoryFormatRequest,
    ) -> Result<GetSubdirectoryFormatResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_subdirectory_format(
        &self,
        _ctx: &CallContext,
        _req: SetSubdirectoryFormatRequest,
    ) -> Result<SetSubdirectoryFormatResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_subdirectory_format_pattern(
        &self,
        _ctx: &CallContext,
        _req: GetSubdirectoryFormatPatternRequest,
    ) -> Result<GetSubdirectoryFormatPatternResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_subdirectory_format_pattern(
        &self,
        _ctx: &CallContext,
        _req: SetSubdirectoryFormatPatternRequest,
    ) -> Result<SetSubdirectoryFormatPatternResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_task(&self, _ctx: &CallContext, _req: GetTaskRequest) -> Result<GetTaskResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_task(&self, _ctx: &CallContext, _req: SetTaskRequest) -> Result<SetTaskResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_task_run_as_self(
        &self,
        _ctx: &CallContext,
        _req: GetTaskRunAsSelfRequest,
    ) -> Result<GetTaskRunAsSelfResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_task_run_as_self(
        &self,
        _ctx: &CallContext,
        _req: SetTaskRunAsSelfRequest,
    ) -> Result<SetTaskRunAsSelfResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_task_arguments(
        &self,
        _ctx: &CallContext,
        _req: GetTaskArgumentsRequest,
    ) -> Result<GetTaskArgumentsResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_task_arguments(
        &self,
        _ctx: &CallContext,
        _req: SetTaskArgumentsRequest,
    ) -> Result<SetTaskArgumentsResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_task_user_text_arguments(
        &self,
        _ctx: &CallContext,
        _req: GetTaskUserTextArgumentsRequest,
    ) -> Result<GetTaskUserTextArgumentsResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_task_user_text_arguments(
        &self,
        _ctx: &CallContext,
        _req: SetTaskUserTextArgumentsRequest,
    ) -> Result<SetTaskUserTextArgumentsResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_schedules(
        &self,
        _ctx: &CallContext,
        _req: GetSchedulesRequest,
    ) -> Result<GetSchedulesResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_schedules_enabled(
        &self,
        _ctx: &CallContext,
        _req: GetSchedulesEnabledRequest,
    ) -> Result<GetSchedulesEnabledResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_schedules_enabled(
        &self,
        _ctx: &CallContext,
        _req: SetSchedulesEnabledRequest,
    ) -> Result<SetSchedulesEnabledResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_user_account(
        &self,
        _ctx: &CallContext,
        _req: GetUserAccountRequest,
    ) -> Result<GetUserAccountResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_xml(&self, _ctx: &CallContext, _req: GetXmlRequest) -> Result<GetXmlResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_security(
        &self,
        _ctx: &CallContext,
        _req: GetSecurityRequest,
    ) -> Result<GetSecurityResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_security(
        &self,
        _ctx: &CallContext,
        _req: SetSecurityRequest,
    ) -> Result<SetSecurityResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_stop_on_completion(
        &self,
        _ctx: &CallContext,
        _req: GetStopOnCompletionRequest,
    ) -> Result<GetStopOnCompletionResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_stop_on_completion(
        &self,
        _ctx: &CallContext,
        _req: SetStopOnCompletionRequest,
    ) -> Result<SetStopOnCompletionResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_data_manager(
        &self,
        _ctx: &CallContext,
        _req: GetDataManagerRequest,
    ) -> Result<GetDataManagerResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_credentials(
        &self,
        _ctx: &CallContext,
        _req: SetCredentialsRequest,
    ) -> Result<SetCredentialsResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn query(&self, _ctx: &CallContext, _req: QueryRequest) -> Result<QueryResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn commit(&self, _ctx: &CallContext, _req: CommitRequest) -> Result<CommitResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn delete(&self, _ctx: &CallContext, _req: DeleteRequest) -> Result<DeleteResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn start(&self, _ctx: &CallContext, _req: StartRequest) -> Result<StartResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn stop(&self, _ctx: &CallContext, _req: StopRequest) -> Result<StopResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_xml(&self, _ctx: &CallContext, _req: SetXmlRequest) -> Result<SetXmlResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn set_value(
        &self,
        _ctx: &CallContext,
        _req: SetValueRequest,
    ) -> Result<SetValueResponse> {
        Err(RpcError::NotImplemented)
    }

    async fn get_value(
        &self,
        _ctx: &CallContext,
        _req: GetValueRequest,
    ) -> Result<GetValueResponse> {
        Err(RpcError::NotImplemented)
    }
}

/// Decode the request for `op_num`, run the matching server routine and box
/// the response.
pub async fn data_collector_set_server_handle<S>(
    server: &S,
    ctx: &CallContext,
    op_num: u16,
    r: &mut NdrReader<'_>,
) -> Result<Box<dyn Operation>>
where
    S: DataCollectorSetServer + ?Sized,
{
    if op_num < FIRST_OP_NUM {
        return dispatch_server_handle(server, ctx, op_num, r).await;
    }

    macro_rules! call {
        ($req:ident, $method:ident) => {{
            let req = $req::unmarshal_ndr(r)?;
            debug!(op_num, "IDataCollectorSet call");
            Ok(Box::new(server.$method(ctx, req).await?))
        }};
    }

    match op_num {
        7 => call!(GetDataCollectorsRequest, get_data_collectors),
        8 => call!(GetDurationRequest, get_duration),
        9 => call!(SetDurationRequest, set_duration),
        10 => call!(GetDescriptionRequest, get_description),
        11 => call!(SetDescriptionRequest, set_description),
        12 => call!(GetDescriptionUnresolvedRequest, get_description_unresolved),
        13 => call!(GetDisplayNameRequest, get_display_name),
        14 => call!(SetDisplayNameRequest, set_display_name),
        15 => call!(GetDisplayNameUnresolvedRequest, get_display_name_unresolved),
        16 => call!(GetKeywordsRequest, get_keywords),
        17 => call!(SetKeywordsRequest, set_keywords),
        18 => call!(GetLatestOutputLocationRequest, get_latest_output_location),
        19 => call!(SetLatestOutputLocationRequest, set_latest_output_location),
        20 => call!(GetNameRequest, get_name),
        21 => call!(GetOutputLocationRequest, get_output_location),
        22 => call!(GetRootPathRequest, get_root_path),
        23 => call!(SetRootPathRequest, set_root_path),
        24 => call!(GetSegmentRequest, get_segment),
        25 => call!(SetSegmentRequest, set_segment),
        26 => call!(GetSegmentMaxDurationRequest, get_segment_max_duration),
        27 => call!(SetSegmentMaxDurationRequest, set_segment_max_duration),
        28 => call!(GetSegmentMaxSizeRequest, get_segment_max_size),
        29 => call!(SetSegmentMaxSizeRequest, set_segment_max_size),
        30 => call!(GetSerialNumberRequest, get_serial_number),
        31 => call!(SetSerialNumberRequest, set_serial_number),
        32 => call!(GetServerRequest, get_server),
        33 => call!(GetStatusRequest, get_status),
        34 => call!(GetSubdirectoryRequest, get_subdirectory),
        35 => call!(SetSubdirectoryRequest, set_subdirectory),
        36 => call!(GetSubdirectoryFormatRequest, get_subdirectory_format),
        37 => call!(SetSubdirectoryFormatRequest, set_subdirectory_format),
        38 => call!(GetSubdirectoryFormatPatternRequest, get_subdirectory_format_pattern),
        39 => call!(SetSubdirectoryFormatPatternRequest, set_subdirectory_format_pattern),
        40 => call!(GetTaskRequest, get_task),
        41 => call!(SetTaskRequest, set_task),
        42 => call!(GetTaskRunAsSelfRequest, get_task_run_as_self),
        43 => call!(SetTaskRunAsSelfRequest, set_task_run_as_self),
        44 => call!(GetTaskArgumentsRequest, get_task_arguments),
        45 => call!(SetTaskArgumentsRequest, set_task_arguments),
        46 => call!(GetTaskUserTextArgumentsRequest, get_task_user_text_arguments),
        47 => call!(SetTaskUserTextArgumentsRequest, set_task_user_text_arguments),
        48 => call!(GetSchedulesRequest, get_schedules),
        49 => call!(GetSchedulesEnabledRequest, get_schedules_enabled),
        50 => call!(SetSchedulesEnabledRequest, set_schedules_enabled),
        51 => call!(GetUserAccountRequest, get_user_account),
        52 => call!(GetXmlRequest, get_xml),
        53 => call!(GetSecurityRequest, get_security),
        54 => call!(SetSecurityRequest, set_security),
        55 => call!(GetStopOnCompletionRequest, get_stop_on_completion),
        56 => call!(SetStopOnCompletionRequest, set_stop_on_completion),
        57 => call!(GetDataManagerRequest, get_data_manager),
        58 => call!(SetCredentialsRequest, set_credentials),
        59 => call!(QueryRequest, query),
        60 => call!(CommitRequest, commit),
        61 => call!(DeleteRequest, delete),
        62 => call!(StartRequest, start),
        63 => call!(StopRequest, stop),
        64 => call!(SetXmlRequest, set_xml),
        65 => call!(SetValueRequest, set_value),
        66 => call!(GetValueRequest, get_value),
        _ => {
            warn!(op_num, "IDataCollectorSet method not found");
            Err(RpcError::OpnumOutOfRange {
                interface: "IDataCollectorSet",
                op_num,
            })
        }
    }
}

/// [`ServerHandle`] wrapping an `IDataCollectorSet` implementation.
pub struct DataCollectorSetServerHandle<S: ?Sized>(Arc<S>);

impl<S: DataCollectorSetServer + ?Sized> DataCollectorSetServerHandle<S> {
    pub fn new(server: Arc<S>) -> Self {
        Self(server)
    }
}

#[async_trait::async_trait]
impl<S> ServerHandle for DataCollectorSetServerHandle<S>
where
    S: DataCollectorSetServer + ?Sized + 'static,
{
    async fn handle(
        &self,
        ctx: &CallContext,
        op_num: u16,
        r: &mut NdrReader<'_>,
    ) -> Result<Box<dyn Operation>> {
        data_collector_set_server_handle(self.0.as_ref(), ctx, op_num, r).await
    }
}

/// Wrap `server` as a [`ServerHandle`].
pub fn new_data_collector_set_server_handle<S>(server: Arc<S>) -> Arc<dyn ServerHandle>
where
    S: DataCollectorSetServer + 'static,
{
    Arc::new(DataCollectorSetServerHandle::new(server))
}

/// Register `server` on `conn` under `IDataCollectorSet` v0.0, on top of the
/// caller's options.
pub fn register_data_collector_set_server<S>(
    conn: &dyn Conn,
    server: Arc<S>,
    options: ServerOptions,
) -> Result<()>
where
    S: DataCollectorSetServer + 'static,
{
    conn.register_server(
        new_data_collector_set_server_handle(server),
        options.with_abstract_syntax(DATA_COLLECTOR_SET_SYNTAX_V0_0),
    )
}
