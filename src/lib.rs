//! JSON-RPC style system administration service.
//!
//! One `/rpc` endpoint dispatches `reboot`, `status`, `shutdown`, `restart`
//! and `version` calls whose `params` and `result` shapes depend on the
//! `method` field. A separate `/api/users` surface offers in-memory CRUD.

pub mod config;
pub mod context;
pub mod logging;
pub mod rpc;
pub mod users;
pub mod web;
