//! RPC core.
//!
//! A single endpoint accepts `{method, params, id}` envelopes where the
//! shape of `params` (and of the reply's `result`) depends on `method`.
//!
//! ## Architecture
//!
//! - `protocol`: request/response envelopes and the error object
//! - `methods`: method tags and per-method request/response types
//! - `registry`: name table and structural parameter codec
//! - `handlers`: one pure function per method
//! - `dispatcher`: resolves, decodes, invokes and wraps a single call
//! - `client`: HTTP client for the endpoint
//!
//! ## Extensibility
//!
//! Adding a method means adding a [`Method`] variant, its request and
//! response types, a handler, and a registry entry.

pub mod client;
pub mod dispatcher;
pub mod handlers;
pub mod methods;
mod protocol;
pub mod registry;

pub use client::{ClientError, RpcClient};
pub use dispatcher::{DispatchError, Dispatcher};
pub use methods::{Method, MethodCall, MethodResult};
pub use protocol::{DISPATCH_FAILURE, ErrorKind, Request, Response, RpcError};
pub use registry::{MethodEntry, MethodRegistry};
