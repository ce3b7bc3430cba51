//! MSRPC server plumbing for DCOM interfaces.
//!
//! This crate provides the pieces an interface server crate builds on:
//! - An NDR20 codec for the constructs DCOM stubs use ([`ndr`])
//! - `ORPCTHIS` / `ORPCTHAT` and interface pointers ([`dcom`])
//! - `BSTR`, `VARIANT_BOOL`, `SAFEARRAY(BSTR)` and `IDispatch` ([`oaut`])
//! - Server handles, registration and REQUEST/RESPONSE/FAULT PDUs ([`dcerpc`])
//!
//! # Example
//!
//! ```rust,ignore
//! use msrpc_core::dcerpc::{ServerOptions, ServerRegistry};
//! use msrpc_core::oaut::idispatch::{register_dispatch_server, DISPATCH_SYNTAX_V0_0};
//!
//! let registry = ServerRegistry::new();
//! register_dispatch_server(&registry, Arc::new(MyObject), ServerOptions::new())?;
//! registry.bind_context(0, DISPATCH_SYNTAX_V0_0)?;
//! let reply = registry.handle_request(&fragment).await?;
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod dcerpc;
pub mod dcom;
pub mod error;
pub mod ndr;
pub mod oaut;

pub use dcerpc::{CallContext, Conn, Operation, ServerHandle, ServerOptions, SyntaxId};
pub use dcom::{InterfacePointer, OrpcThat, OrpcThis};
pub use error::{NdrError, Result, RpcError};
pub use oaut::{Bstr, BstrArray, VariantBool};
