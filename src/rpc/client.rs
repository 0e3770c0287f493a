//! RPC client for the `/rpc` endpoint.
//!
//! Posts request envelopes over HTTP and decodes the response envelope,
//! typing `result` from the echoed `method`.

use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use super::methods::{
    MethodResult, RebootRequest, RebootResponse, RestartRequest, RestartResponse,
    ShutdownRequest, ShutdownResponse, StatusRequest, StatusResponse, VersionRequest,
    VersionResponse,
};
use super::protocol::{Request, Response, RpcError};

/// Error returned by RPC client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to reach the server or read its reply
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Server replied with a non-200 status
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    /// Failed to serialize params or parse the response
    #[error("Failed to decode: {0}")]
    Decode(#[from] serde_json::Error),
    /// Server returned an error envelope
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(RpcError),
    /// Server answered with a result for a different method
    #[error("Unexpected result for method {0:?}")]
    UnexpectedResult(Option<String>),
}

/// HTTP client for the RPC endpoint.
pub struct RpcClient {
    endpoint: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for the given base URL (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/rpc", base_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a raw envelope and return the decoded response envelope.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let resp = self.client.post(&self.endpoint).json(request).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Call a method by name with an auto-assigned id.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Response, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        self.send(&Request::new(method, params, id)).await
    }

    async fn call_typed(
        &self,
        method: &str,
        params: impl Serialize,
    ) -> Result<MethodResult, ClientError> {
        let params = serde_json::to_value(params)?;
        let response = self.call(method, Some(params)).await?;

        if let Some(error) = response.error {
            return Err(ClientError::Rpc(error));
        }
        response
            .result
            .ok_or(ClientError::UnexpectedResult(response.method))
    }

    pub async fn reboot(&self, req: RebootRequest) -> Result<RebootResponse, ClientError> {
        match self.call_typed("reboot", req).await? {
            MethodResult::Reboot(resp) => Ok(resp),
            other => Err(ClientError::UnexpectedResult(Some(other.method().to_string()))),
        }
    }

    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        match self.call_typed("status", StatusRequest {}).await? {
            MethodResult::Status(resp) => Ok(resp),
            other => Err(ClientError::UnexpectedResult(Some(other.method().to_string()))),
        }
    }

    pub async fn shutdown(&self, req: ShutdownRequest) -> Result<ShutdownResponse, ClientError> {
        match self.call_typed("shutdown", req).await? {
            MethodResult::Shutdown(resp) => Ok(resp),
            other => Err(ClientError::UnexpectedResult(Some(other.method().to_string()))),
        }
    }

    pub async fn restart(&self, req: RestartRequest) -> Result<RestartResponse, ClientError> {
        match self.call_typed("restart", req).await? {
            MethodResult::Restart(resp) => Ok(resp),
            other => Err(ClientError::UnexpectedResult(Some(other.method().to_string()))),
        }
    }

    pub async fn version(&self) -> Result<VersionResponse, ClientError> {
        match self.call_typed("version", VersionRequest {}).await? {
            MethodResult::Version(resp) => Ok(resp),
            other => Err(ClientError::UnexpectedResult(Some(other.method().to_string()))),
        }
    }
}
