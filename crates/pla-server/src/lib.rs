//! Performance Logs and Alerts (MS-PLA) `IDataCollectorSet` DCOM server.
//!
//! Implement [`DataCollectorSetServer`] (and the inherited `DispatchServer`)
//! for an application type, then register it on an MSRPC connection:
//!
//! ```rust,ignore
//! use msrpc_core::dcerpc::{ServerOptions, ServerRegistry};
//! use pla_server::register_data_collector_set_server;
//!
//! let registry = ServerRegistry::new();
//! register_data_collector_set_server(&registry, Arc::new(MySet::default()), ServerOptions::new())?;
//! ```

pub mod idatacollectorset;
pub mod types;

pub use idatacollectorset::{
    data_collector_set_server_handle, new_data_collector_set_server_handle,
    register_data_collector_set_server, DataCollectorSetServer, DataCollectorSetServerHandle,
    DATA_COLLECTOR_SET_IID, DATA_COLLECTOR_SET_SYNTAX_V0_0,
};
pub use types::{
    AutoPathFormat, CommitMode, DataCollectorCollection, DataCollectorSetStatus, DataManager,
    ScheduleCollection, ValueMap,
};
