//! Request and response records for `IDataCollectorSet` opnums 7..=66.
//!
//! Property getters and setters map onto `Get*` / `Set*` pairs; the
//! remaining methods manage the set as a whole.

use crate::types::{
    AutoPathFormat, CommitMode, DataCollectorCollection, DataCollectorSetStatus, DataManager,
    ScheduleCollection, ValueMap,
};
use msrpc_core::dcom_operation;
use msrpc_core::{Bstr, BstrArray, VariantBool};

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetDataCollectors",
    op_num: 7,
    /// Data collectors that belong to the set.
    request GetDataCollectorsRequest {}
    response GetDataCollectorsResponse {
        data_collectors: Option<DataCollectorCollection>,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetDuration",
    op_num: 8,
    request GetDurationRequest {}
    response GetDurationResponse {
        seconds: u32,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetDuration",
    op_num: 9,
    /// How long the set runs, in seconds. Zero means no limit.
    request SetDurationRequest {
        seconds: u32,
    }
    response SetDurationResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetDescription",
    op_num: 10,
    request GetDescriptionRequest {}
    response GetDescriptionResponse {
        description: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetDescription",
    op_num: 11,
    request SetDescriptionRequest {
        description: Bstr,
    }
    response SetDescriptionResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetDescriptionUnresolved",
    op_num: 12,
    /// Description with indirect strings left unresolved.
    request GetDescriptionUnresolvedRequest {}
    response GetDescriptionUnresolvedResponse {
        descr: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetDisplayName",
    op_num: 13,
    request GetDisplayNameRequest {}
    response GetDisplayNameResponse {
        display_name: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetDisplayName",
    op_num: 14,
    request SetDisplayNameRequest {
        display_name: Bstr,
    }
    response SetDisplayNameResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetDisplayNameUnresolved",
    op_num: 15,
    /// Display name with indirect strings left unresolved.
    request GetDisplayNameUnresolvedRequest {}
    response GetDisplayNameUnresolvedResponse {
        name: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetKeywords",
    op_num: 16,
    request GetKeywordsRequest {}
    response GetKeywordsResponse {
        keywords: Option<BstrArray>,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetKeywords",
    op_num: 17,
    /// Keywords describing the set; metadata only.
    request SetKeywordsRequest {
        keywords: Option<BstrArray>,
    }
    response SetKeywordsResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetLatestOutputLocation",
    op_num: 18,
    /// Folder the set most recently wrote to.
    request GetLatestOutputLocationRequest {}
    response GetLatestOutputLocationResponse {
        path: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetLatestOutputLocation",
    op_num: 19,
    request SetLatestOutputLocationRequest {
        path: Bstr,
    }
    response SetLatestOutputLocationResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetName",
    op_num: 20,
    request GetNameRequest {}
    response GetNameResponse {
        name: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetOutputLocation",
    op_num: 21,
    /// Folder the next run will write to.
    request GetOutputLocationRequest {}
    response GetOutputLocationResponse {
        path: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetRootPath",
    op_num: 22,
    request GetRootPathRequest {}
    response GetRootPathResponse {
        folder: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetRootPath",
    op_num: 23,
    /// Base folder for the set's output.
    request SetRootPathRequest {
        folder: Bstr,
    }
    response SetRootPathResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSegment",
    op_num: 24,
    request GetSegmentRequest {}
    response GetSegmentResponse {
        segment: VariantBool,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetSegment",
    op_num: 25,
    /// Whether collection restarts in a new file when a segment limit is reached.
    request SetSegmentRequest {
        segment: VariantBool,
    }
    response SetSegmentResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSegmentMaxDuration",
    op_num: 26,
    request GetSegmentMaxDurationRequest {}
    response GetSegmentMaxDurationResponse {
        seconds: u32,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetSegmentMaxDuration",
    op_num: 27,
    request SetSegmentMaxDurationRequest {
        seconds: u32,
    }
    response SetSegmentMaxDurationResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSegmentMaxSize",
    op_num: 28,
    request GetSegmentMaxSizeRequest {}
    response GetSegmentMaxSizeResponse {
        size: u32,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetSegmentMaxSize",
    op_num: 29,
    request SetSegmentMaxSizeRequest {
        size: u32,
    }
    response SetSegmentMaxSizeResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSerialNumber",
    op_num: 30,
    request GetSerialNumberRequest {}
    response GetSerialNumberResponse {
        index: u32,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetSerialNumber",
    op_num: 31,
    /// Number substituted for the serial-number decoration in output paths.
    request SetSerialNumberRequest {
        index: u32,
    }
    response SetSerialNumberResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetServer",
    op_num: 32,
    /// Computer the set is committed on.
    request GetServerRequest {}
    response GetServerResponse {
        server: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetStatus",
    op_num: 33,
    request GetStatusRequest {}
    response GetStatusResponse {
        status: DataCollectorSetStatus,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSubdirectory",
    op_num: 34,
    request GetSubdirectoryRequest {}
    response GetSubdirectoryResponse {
        folder: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetSubdirectory",
    op_num: 35,
    request SetSubdirectoryRequest {
        folder: Bstr,
    }
    response SetSubdirectoryResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSubdirectoryFormat",
    op_num: 36,
    request GetSubdirectoryFormatRequest {}
    response GetSubdirectoryFormatResponse {
        format: AutoPathFormat,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetSubdirectoryFormat",
    op_num: 37,
    request SetSubdirectoryFormatRequest {
        format: AutoPathFormat,
    }
    response SetSubdirectoryFormatResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSubdirectoryFormatPattern",
    op_num: 38,
    request GetSubdirectoryFormatPatternRequest {}
    response GetSubdirectoryFormatPatternResponse {
        pattern: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetSubdirectoryFormatPattern",
    op_num: 39,
    request SetSubdirectoryFormatPatternRequest {
        pattern: Bstr,
    }
    response SetSubdirectoryFormatPatternResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetTask",
    op_num: 40,
    request GetTaskRequest {}
    response GetTaskResponse {
        task: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetTask",
    op_num: 41,
    /// Task Scheduler job started each time the set stops.
    request SetTaskRequest {
        task: Bstr,
    }
    response SetTaskResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetTaskRunAsSelf",
    op_num: 42,
    request GetTaskRunAsSelfRequest {}
    response GetTaskRunAsSelfResponse {
        run_as_self: VariantBool,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetTaskRunAsSelf",
    op_num: 43,
    request SetTaskRunAsSelfRequest {
        run_as_self: VariantBool,
    }
    response SetTaskRunAsSelfResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetTaskArguments",
    op_num: 44,
    request GetTaskArgumentsRequest {}
    response GetTaskArgumentsResponse {
        task: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetTaskArguments",
    op_num: 45,
    request SetTaskArgumentsRequest {
        task: Bstr,
    }
    response SetTaskArgumentsResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetTaskUserTextArguments",
    op_num: 46,
    request GetTaskUserTextArgumentsRequest {}
    response GetTaskUserTextArgumentsResponse {
        user_text: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetTaskUserTextArguments",
    op_num: 47,
    request SetTaskUserTextArgumentsRequest {
        user_text: Bstr,
    }
    response SetTaskUserTextArgumentsResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSchedules",
    op_num: 48,
    request GetSchedulesRequest {}
    response GetSchedulesResponse {
        schedules: Option<ScheduleCollection>,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSchedulesEnabled",
    op_num: 49,
    request GetSchedulesEnabledRequest {}
    response GetSchedulesEnabledResponse {
        enabled: VariantBool,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetSchedulesEnabled",
    op_num: 50,
    request SetSchedulesEnabledRequest {
        enabled: VariantBool,
    }
    response SetSchedulesEnabledResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetUserAccount",
    op_num: 51,
    request GetUserAccountRequest {}
    response GetUserAccountResponse {
        user: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetXml",
    op_num: 52,
    request GetXmlRequest {}
    response GetXmlResponse {
        xml: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetSecurity",
    op_num: 53,
    request GetSecurityRequest {}
    response GetSecurityResponse {
        sddl: Bstr,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetSecurity",
    op_num: 54,
    /// Security descriptor in SDDL form.
    request SetSecurityRequest {
        sddl: Bstr,
    }
    response SetSecurityResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetStopOnCompletion",
    op_num: 55,
    request GetStopOnCompletionRequest {}
    response GetStopOnCompletionResponse {
        stop: VariantBool,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetStopOnCompletion",
    op_num: 56,
    request SetStopOnCompletionRequest {
        stop: VariantBool,
    }
    response SetStopOnCompletionResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetDataManager",
    op_num: 57,
    request GetDataManagerRequest {}
    response GetDataManagerResponse {
        data_manager: Option<DataManager>,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetCredentials",
    op_num: 58,
    /// Account the set runs under.
    request SetCredentialsRequest {
        user: Bstr,
        password: Bstr,
    }
    response SetCredentialsResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "Query",
    op_num: 59,
    /// Load the set committed under `name` on `server`. A NULL server means the local computer.
    request QueryRequest {
        name: Bstr,
        server: Bstr,
    }
    response QueryResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "Commit",
    op_num: 60,
    /// Save the set under `name` on `server`.
    request CommitRequest {
        name: Bstr,
        server: Bstr,
        mode: CommitMode,
    }
    /// `validation` names the properties that could not be applied, if any.
    response CommitResponse {
        validation: Option<ValueMap>,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "Delete",
    op_num: 61,
    /// Remove the committed set.
    request DeleteRequest {}
    response DeleteResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "Start",
    op_num: 62,
    /// Start collecting. With `synchronous` set the call returns once the set is running.
    request StartRequest {
        synchronous: VariantBool,
    }
    response StartResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "Stop",
    op_num: 63,
    /// Stop collecting. With `synchronous` set the call returns once the set has stopped.
    request StopRequest {
        synchronous: VariantBool,
    }
    response StopResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetXml",
    op_num: 64,
    /// Replace the set's properties from an XML document.
    request SetXmlRequest {
        xml: Bstr,
    }
    /// `validation` names the properties that could not be applied, if any.
    response SetXmlResponse {
        validation: Option<ValueMap>,
    }
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "SetValue",
    op_num: 65,
    /// Store a user-defined key/value pair with the set.
    request SetValueRequest {
        key: Bstr,
        value: Bstr,
    }
    response SetValueResponse {}
}

dcom_operation! {
    interface: "IDataCollectorSet",
    name: "GetValue",
    op_num: 66,
    request GetValueRequest {
        key: Bstr,
    }
    response GetValueResponse {
        value: Bstr,
    }
}
