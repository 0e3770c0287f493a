//! RPC method catalogue.
//!
//! Each method has a request payload (decoded from the envelope's `params`)
//! and a response payload (encoded into the envelope's `result`). The two
//! sum types [`MethodCall`] and [`MethodResult`] carry one variant per
//! method, so a decoded call can never hold another method's parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The closed set of methods understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Reboot,
    Status,
    Shutdown,
    Restart,
    Version,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Reboot,
        Method::Status,
        Method::Shutdown,
        Method::Restart,
        Method::Version,
    ];

    /// Canonical wire name, echoed as `method` on successful responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Reboot => "reboot",
            Method::Status => "status",
            Method::Shutdown => "shutdown",
            Method::Restart => "restart",
            Method::Version => "version",
        }
    }

    /// Additional names accepted for this method.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Method::Status => &["getstatus"],
            Method::Version => &["getversion"],
            _ => &[],
        }
    }

    /// Look up a method by its canonical name or an alias, ignoring case.
    pub fn from_name(name: &str) -> Option<Method> {
        Method::ALL.into_iter().find(|method| {
            method.as_str().eq_ignore_ascii_case(name)
                || method
                    .aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(name))
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// reboot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebootRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebootResponse {
    pub status: String,
    pub reason: String,
    pub force: bool,
    pub timestamp: String,
    pub estimated_downtime: String,
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusRequest {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub uptime: String,
    pub memory_usage: String,
    pub cpu_usage: String,
    pub disk_usage: String,
    pub active_connections: u32,
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// shutdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Delay before shutdown, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownResponse {
    pub status: String,
    pub reason: String,
    pub delay_seconds: i32,
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// restart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
    pub estimated_duration: String,
}

// ---------------------------------------------------------------------------
// version
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionRequest {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub application: String,
    pub version: String,
    pub build: String,
    pub runtime_version: String,
    pub framework_version: String,
}

// ---------------------------------------------------------------------------
// Sum types
// ---------------------------------------------------------------------------

/// A fully decoded call: the method tag together with its typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodCall {
    Reboot(RebootRequest),
    Status(StatusRequest),
    Shutdown(ShutdownRequest),
    Restart(RestartRequest),
    Version(VersionRequest),
}

impl MethodCall {
    pub fn method(&self) -> Method {
        match self {
            MethodCall::Reboot(_) => Method::Reboot,
            MethodCall::Status(_) => Method::Status,
            MethodCall::Shutdown(_) => Method::Shutdown,
            MethodCall::Restart(_) => Method::Restart,
            MethodCall::Version(_) => Method::Version,
        }
    }
}

macro_rules! call_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(impl From<$ty> for MethodCall {
            fn from(req: $ty) -> Self {
                MethodCall::$variant(req)
            }
        })*
    };
}

call_from! {
    Reboot => RebootRequest,
    Status => StatusRequest,
    Shutdown => ShutdownRequest,
    Restart => RestartRequest,
    Version => VersionRequest,
}

/// A handler's output. Serialized without a tag: the envelope's `method`
/// field is what tells a reader which variant `result` holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MethodResult {
    Reboot(RebootResponse),
    Status(StatusResponse),
    Shutdown(ShutdownResponse),
    Restart(RestartResponse),
    Version(VersionResponse),
}

impl MethodResult {
    pub fn method(&self) -> Method {
        match self {
            MethodResult::Reboot(_) => Method::Reboot,
            MethodResult::Status(_) => Method::Status,
            MethodResult::Shutdown(_) => Method::Shutdown,
            MethodResult::Restart(_) => Method::Restart,
            MethodResult::Version(_) => Method::Version,
        }
    }

    /// Decode an untagged `result` value using the method it belongs to.
    pub fn from_value(method: Method, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match method {
            Method::Reboot => MethodResult::Reboot(serde_json::from_value(value)?),
            Method::Status => MethodResult::Status(serde_json::from_value(value)?),
            Method::Shutdown => MethodResult::Shutdown(serde_json::from_value(value)?),
            Method::Restart => MethodResult::Restart(serde_json::from_value(value)?),
            Method::Version => MethodResult::Version(serde_json::from_value(value)?),
        })
    }
}

macro_rules! result_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(impl From<$ty> for MethodResult {
            fn from(resp: $ty) -> Self {
                MethodResult::$variant(resp)
            }
        })*
    };
}

result_from! {
    Reboot => RebootResponse,
    Status => StatusResponse,
    Shutdown => ShutdownResponse,
    Restart => RestartResponse,
    Version => VersionResponse,
}
