//! Request dispatcher.
//!
//! Sequences one call: normalize the method name, resolve it in the
//! registry, decode `params`, invoke the handler, wrap the outcome. Every
//! failure along the way becomes an error envelope; nothing escapes to the
//! transport.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::methods::MethodResult;
use super::protocol::{ErrorKind, Request, Response};
use super::registry::MethodRegistry;

/// Why a call could not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Missing method")]
    MissingMethod,
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    #[error("{0}")]
    InvalidParams(String),
    #[error("{0}")]
    HandlerFailure(String),
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::MissingMethod => ErrorKind::MissingMethod,
            DispatchError::UnknownMethod(_) => ErrorKind::UnknownMethod,
            DispatchError::InvalidParams(_) => ErrorKind::InvalidParams,
            DispatchError::HandlerFailure(_) => ErrorKind::HandlerFailure,
        }
    }
}

/// Routes decoded envelopes to handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<MethodRegistry>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(MethodRegistry::builtin())
    }
}

impl Dispatcher {
    pub fn new(registry: MethodRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Handle a request envelope. Always returns an envelope carrying the
    /// request's `id`.
    pub fn dispatch(&self, request: Request) -> Response {
        let Request { method, params, id } = request;

        match self.execute(method.as_deref(), params) {
            Ok(result) => {
                debug!(method = %result.method(), id = ?id, "RPC call succeeded");
                Response::success(id, result)
            }
            Err(e) => {
                warn!(
                    method = method.as_deref().unwrap_or_default(),
                    id = ?id,
                    kind = ?e.kind(),
                    error = %e,
                    "RPC call failed"
                );
                Response::error(id, method, e.kind(), e.to_string())
            }
        }
    }

    fn execute(
        &self,
        method: Option<&str>,
        params: Option<serde_json::Value>,
    ) -> Result<MethodResult, DispatchError> {
        let name = match method.map(str::to_lowercase) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(DispatchError::MissingMethod),
        };

        let entry = self
            .registry
            .resolve(&name)
            .ok_or(DispatchError::UnknownMethod(name))?;

        let call = entry
            .decode(params)
            .map_err(|e| DispatchError::InvalidParams(e.to_string()))?;

        panic::catch_unwind(AssertUnwindSafe(|| entry.invoke(call)))
            .map_err(|payload| DispatchError::HandlerFailure(panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Handler panicked".to_string()
    }
}
