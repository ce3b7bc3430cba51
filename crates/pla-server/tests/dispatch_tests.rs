//! End-to-end dispatch tests for the IDataCollectorSet server.
//!
//! Stubs are hand-assembled NDR, the way a Windows client would send them.

use msrpc_core::dcerpc::pdu::{flags, PacketType};
use msrpc_core::dcerpc::{CallContext, ServerOptions, ServerRegistry, SyntaxId};
use msrpc_core::error::status;
use msrpc_core::ndr::NdrReader;
use msrpc_core::oaut::idispatch::{
    DispatchServer, GetTypeInfoCountRequest, GetTypeInfoCountResponse,
};
use msrpc_core::{Bstr, BstrArray, Result, RpcError, VariantBool};
use pla_server::idatacollectorset::*;
use pla_server::{CommitMode, DataCollectorSetStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const E_INVALIDARG: u32 = 0x8007_0057;

/// `ORPCTHIS` v5.7, no flags, nil causality id, no extensions.
const ORPC_THIS: &str = concat!(
    "05000700",
    "00000000",
    "00000000",
    "00000000000000000000000000000000",
    "00000000",
);

/// `ORPCTHAT` with no extensions.
const ORPC_THAT: &str = "0000000000000000";

/// Keywords `["a", "bc"]` as a `SAFEARRAY(BSTR)`.
const KEYWORDS: &str = concat!(
    "00000200", // array referent
    "01000000", // bounds count
    "0100",     // cDims
    "8001",     // fFeatures
    "04000000", // cbElements
    "00000800", // cLocks
    "08000000", // SF_BSTR
    "02000000", // Size
    "04000200", // aBstr referent
    "02000000", // cElements
    "00000000", // lLbound
    "02000000", // aBstr count
    "08000200",
    "0c000200",
    "010000000200000001000000", "6100", "0000",
    "020000000400000002000000", "62006300",
);

#[derive(Default)]
struct State {
    description: Bstr,
    keywords: Option<BstrArray>,
    values: HashMap<String, Bstr>,
    status: DataCollectorSetStatus,
    committed: Vec<(Bstr, Bstr, CommitMode)>,
}

/// Data collector set kept in memory.
#[derive(Default)]
struct MemorySet {
    state: Mutex<State>,
}

#[async_trait::async_trait]
impl DispatchServer for MemorySet {
    async fn get_type_info_count(
        &self,
        _ctx: &CallContext,
        _req: GetTypeInfoCountRequest,
    ) -> Result<GetTypeInfoCountResponse> {
        Ok(GetTypeInfoCountResponse::default())
    }
}

#[async_trait::async_trait]
impl DataCollectorSetServer for MemorySet {
    async fn get_description(
        &self,
        _ctx: &CallContext,
        _req: GetDescriptionRequest,
    ) -> Result<GetDescriptionResponse> {
        let state = self.state.lock().unwrap();
        Ok(GetDescriptionResponse {
            description: state.description.clone(),
            ..Default::default()
        })
    }

    async fn set_description(
        &self,
        _ctx: &CallContext,
        req: SetDescriptionRequest,
    ) -> Result<SetDescriptionResponse> {
        self.state.lock().unwrap().description = req.description;
        Ok(SetDescriptionResponse::default())
    }

    async fn set_duration(
        &self,
        _ctx: &CallContext,
        req: SetDurationRequest,
    ) -> Result<SetDurationResponse> {
        if req.seconds == 0 {
            return Err(RpcError::Fault {
                status: E_INVALIDARG,
            });
        }
        Ok(SetDurationResponse::default())
    }

    async fn get_keywords(
        &self,
        _ctx: &CallContext,
        _req: GetKeywordsRequest,
    ) -> Result<GetKeywordsResponse> {
        Ok(GetKeywordsResponse {
            keywords: self.state.lock().unwrap().keywords.clone(),
            ..Default::default()
        })
    }

    async fn set_keywords(
        &self,
        _ctx: &CallContext,
        req: SetKeywordsRequest,
    ) -> Result<SetKeywordsResponse> {
        self.state.lock().unwrap().keywords = req.keywords;
        Ok(SetKeywordsResponse::default())
    }

    async fn get_status(
        &self,
        _ctx: &CallContext,
        _req: GetStatusRequest,
    ) -> Result<GetStatusResponse> {
        Ok(GetStatusResponse {
            status: self.state.lock().unwrap().status,
            ..Default::default()
        })
    }

    async fn commit(&self, _ctx: &CallContext, req: CommitRequest) -> Result<CommitResponse> {
        self.state
            .lock()
            .unwrap()
            .committed
            .push((req.name, req.server, req.mode));
        Ok(CommitResponse::default())
    }

    async fn start(&self, _ctx: &CallContext, _req: StartRequest) -> Result<StartResponse> {
        self.state.lock().unwrap().status = DataCollectorSetStatus::Running;
        Ok(StartResponse::default())
    }

    async fn stop(&self, _ctx: &CallContext, _req: StopRequest) -> Result<StopResponse> {
        self.state.lock().unwrap().status = DataCollectorSetStatus::Stopped;
        Ok(StopResponse::default())
    }

    async fn set_value(
        &self,
        _ctx: &CallContext,
        req: SetValueRequest,
    ) -> Result<SetValueResponse> {
        let key = req.key.as_str().unwrap_or_default().to_string();
        self.state.lock().unwrap().values.insert(key, req.value);
        Ok(SetValueResponse::default())
    }

    async fn get_value(
        &self,
        _ctx: &CallContext,
        req: GetValueRequest,
    ) -> Result<GetValueResponse> {
        let key = req.key.as_str().unwrap_or_default();
        let value = self.state.lock().unwrap().values.get(key).cloned();
        match value {
            Some(value) => Ok(GetValueResponse {
                value,
                ..Default::default()
            }),
            None => Err(RpcError::Fault {
                status: E_INVALIDARG,
            }),
        }
    }
}

fn stub(parts: &[&str]) -> Vec<u8> {
    hex::decode(parts.concat()).unwrap()
}

async fn call(set: &MemorySet, op_num: u16, stub: &[u8]) -> Result<Vec<u8>> {
    let ctx = CallContext::new(op_num);
    let mut r = NdrReader::new(stub);
    let op = data_collector_set_server_handle(set, &ctx, op_num, &mut r).await?;
    assert_eq!(op.op_num(), op_num);
    assert_eq!(r.remaining(), 0);

    let mut w = msrpc_core::ndr::NdrWriter::new();
    op.marshal_response(&mut w)?;
    Ok(w.into_bytes().to_vec())
}

fn fault_status(reply: &[u8]) -> u32 {
    u32::from_le_bytes([reply[24], reply[25], reply[26], reply[27]])
}

fn registry(set: Arc<MemorySet>) -> ServerRegistry {
    let registry = ServerRegistry::new();
    register_data_collector_set_server(&registry, set, ServerOptions::new()).unwrap();
    registry
        .bind_context(0, DATA_COLLECTOR_SET_SYNTAX_V0_0)
        .unwrap();
    registry
}

fn request_pdu(call_id: u32, op_num: u16, object: Uuid, stub: &[u8]) -> Vec<u8> {
    let mut frame = vec![
        5,
        0,
        PacketType::Request as u8,
        flags::PFC_FIRST_FRAG | flags::PFC_LAST_FRAG | flags::PFC_OBJECT_UUID,
        0x10,
        0,
        0,
        0,
    ];
    frame.extend_from_slice(&((40 + stub.len()) as u16).to_le_bytes());
    frame.extend_from_slice(&0u16.to_le_bytes());
    frame.extend_from_slice(&call_id.to_le_bytes());
    frame.extend_from_slice(&(stub.len() as u32).to_le_bytes());
    frame.extend_from_slice(&0u16.to_le_bytes());
    frame.extend_from_slice(&op_num.to_le_bytes());
    frame.extend_from_slice(&object.to_bytes_le());
    frame.extend_from_slice(stub);
    frame
}

#[tokio::test]
async fn test_set_value_then_get_value() {
    let set = MemorySet::default();

    // key "k1" behind the "User" marker referent, value "v"
    let set_value = stub(&[
        ORPC_THIS,
        "55736572", "020000000400000002000000", "6b003100",
        "55736572", "010000000200000001000000", "7600",
    ]);
    let reply = call(&set, 65, &set_value).await.unwrap();
    assert_eq!(hex::encode(reply), [ORPC_THAT, "00000000"].concat());

    let get_value = stub(&[
        ORPC_THIS,
        "55736572", "020000000400000002000000", "6b003100",
    ]);
    let reply = call(&set, 66, &get_value).await.unwrap();
    assert_eq!(
        hex::encode(reply),
        [
            ORPC_THAT,
            "00000200", "010000000200000001000000", "7600", "0000",
            "00000000",
        ]
        .concat()
    );
}

#[tokio::test]
async fn test_commit_decodes_name_server_and_mode() {
    let set = MemorySet::default();

    // name "s", NULL server, plaCreateOrModify
    let commit = stub(&[
        ORPC_THIS,
        "00000200", "010000000200000001000000", "7300", "0000",
        "00000000",
        "0300",
    ]);
    let reply = call(&set, 60, &commit).await.unwrap();
    assert_eq!(hex::encode(reply), [ORPC_THAT, "00000000", "00000000"].concat());

    let state = set.state.lock().unwrap();
    assert_eq!(
        state.committed,
        vec![(Bstr::from("s"), Bstr::null(), CommitMode::CREATE_OR_MODIFY)]
    );
}

#[tokio::test]
async fn test_keywords_survive_set_and_get() {
    let set = MemorySet::default();

    let reply = call(&set, 17, &stub(&[ORPC_THIS, KEYWORDS])).await.unwrap();
    assert_eq!(hex::encode(reply), [ORPC_THAT, "00000000"].concat());
    assert_eq!(
        set.state.lock().unwrap().keywords,
        Some(BstrArray::new([Bstr::from("a"), Bstr::from("bc")]))
    );

    let reply = call(&set, 16, &stub(&[ORPC_THIS])).await.unwrap();
    assert_eq!(hex::encode(reply), [ORPC_THAT, KEYWORDS, "00000000"].concat());
}

#[tokio::test]
async fn test_start_stop_and_status() {
    let set = MemorySet::default();

    let start = stub(&[ORPC_THIS, "ffff"]);
    call(&set, 62, &start).await.unwrap();
    let reply = call(&set, 33, &stub(&[ORPC_THIS])).await.unwrap();
    assert_eq!(hex::encode(reply), [ORPC_THAT, "0100", "0000", "00000000"].concat());

    let stop = stub(&[ORPC_THIS, "0000"]);
    call(&set, 63, &stop).await.unwrap();
    assert_eq!(
        set.state.lock().unwrap().status,
        DataCollectorSetStatus::Stopped
    );
}

#[tokio::test]
async fn test_handler_error_is_returned_verbatim() {
    let set = MemorySet::default();
    let err = call(&set, 9, &stub(&[ORPC_THIS, "00000000"]))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Fault { status: E_INVALIDARG }));

    call(&set, 9, &stub(&[ORPC_THIS, "3c000000"])).await.unwrap();
}

#[tokio::test]
async fn test_unimplemented_method_reports_not_implemented() {
    let set = MemorySet::default();
    let err = call(&set, 52, &stub(&[ORPC_THIS])).await.unwrap_err();
    assert!(matches!(err, RpcError::NotImplemented));
}

#[tokio::test]
async fn test_truncated_stub_is_a_decode_error() {
    let set = MemorySet::default();
    // SetValue with the value argument missing
    let truncated = stub(&[
        ORPC_THIS,
        "00000200", "020000000400000002000000", "6b003100",
    ]);
    let err = call(&set, 65, &truncated).await.unwrap_err();
    assert!(matches!(err, RpcError::Ndr(_)));
    assert_eq!(err.to_fault_status(), status::RPC_X_BAD_STUB_DATA);
}

#[tokio::test]
async fn test_low_opnums_reach_idispatch() {
    let set = MemorySet::default();
    let reply = call(&set, 3, &stub(&[ORPC_THIS])).await.unwrap();
    assert_eq!(hex::encode(reply), [ORPC_THAT, "00000000", "00000000"].concat());

    let err = call(&set, 4, &stub(&[ORPC_THIS, "00000000", "09040000"]))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::NotImplemented));

    let err = call(&set, 1, &[]).await.unwrap_err();
    assert!(matches!(
        err,
        RpcError::OpnumOutOfRange {
            interface: "IDispatch",
            op_num: 1
        }
    ));
}

#[tokio::test]
async fn test_opnum_past_interface_is_out_of_range() {
    let set = MemorySet::default();
    let err = call(&set, 67, &stub(&[ORPC_THIS])).await.unwrap_err();
    assert!(matches!(
        err,
        RpcError::OpnumOutOfRange {
            interface: "IDataCollectorSet",
            op_num: 67
        }
    ));
}

#[tokio::test]
async fn test_request_pdu_round_trip() {
    let set = Arc::new(MemorySet::default());
    let registry = registry(set.clone());
    let ipid = Uuid::parse_str("0000e404-1c62-0000-5c7a-2e1f8b3a4d01").unwrap();

    let set_description = stub(&[
        ORPC_THIS,
        "00000200", "020000000400000002000000", "4f004b00",
    ]);
    let reply = registry
        .handle_request(&request_pdu(1, 11, ipid, &set_description))
        .await
        .unwrap();
    assert_eq!(reply[2], PacketType::Response as u8);
    assert_eq!(set.state.lock().unwrap().description, Bstr::from("OK"));

    let reply = registry
        .handle_request(&request_pdu(2, 10, ipid, &stub(&[ORPC_THIS])))
        .await
        .unwrap();
    assert_eq!(reply[2], PacketType::Response as u8);
    assert_eq!(&reply[12..16], &2u32.to_le_bytes());
    assert_eq!(
        hex::encode(&reply[24..]),
        [
            ORPC_THAT,
            "00000200", "020000000400000002000000", "4f004b00",
            "00000000",
        ]
        .concat()
    );
}

#[tokio::test]
async fn test_faults_over_pdu() {
    let registry = registry(Arc::new(MemorySet::default()));

    let reply = registry
        .handle_request(&request_pdu(3, 67, Uuid::nil(), &stub(&[ORPC_THIS])))
        .await
        .unwrap();
    assert_eq!(reply[2], PacketType::Fault as u8);
    assert_eq!(fault_status(&reply), status::NCA_S_OP_RNG_ERROR);
    assert_ne!(reply[3] & flags::PFC_DID_NOT_EXECUTE, 0);

    let reply = registry
        .handle_request(&request_pdu(4, 9, Uuid::nil(), &stub(&[ORPC_THIS, "00000000"])))
        .await
        .unwrap();
    assert_eq!(fault_status(&reply), E_INVALIDARG);
    assert_eq!(reply[3] & flags::PFC_DID_NOT_EXECUTE, 0);
}

#[test]
fn test_registration_uses_interface_syntax() {
    let registry = ServerRegistry::new();
    let other = SyntaxId::new(Uuid::nil(), 1, 0);
    register_data_collector_set_server(
        &registry,
        Arc::new(MemorySet::default()),
        ServerOptions::new().with_abstract_syntax(other),
    )
    .unwrap();

    assert!(registry.is_registered(&DATA_COLLECTOR_SET_SYNTAX_V0_0).unwrap());
    assert!(!registry.is_registered(&other).unwrap());
    assert_eq!(
        DATA_COLLECTOR_SET_SYNTAX_V0_0.to_string(),
        "03837520-098b-11d8-9414-505054503030 v0.0"
    );
}

#[test]
fn test_messages_serialize_with_field_names() {
    let req = SetValueRequest {
        key: Bstr::from("owner"),
        value: Bstr::null(),
        ..Default::default()
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["key"], "owner");
    assert!(json["value"].is_null());

    let resp = StartResponse {
        return_value: -2147024809,
        ..Default::default()
    };
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["return_value"], -2147024809);

    let req = StartRequest {
        synchronous: VariantBool(true),
        ..Default::default()
    };
    assert_eq!(serde_json::to_value(&req).unwrap()["synchronous"], true);
}
