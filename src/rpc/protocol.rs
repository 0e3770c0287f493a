//! Envelope types for the `/rpc` endpoint.
//!
//! A request carries `method`, an untyped `params` object and a caller
//! supplied `id`. A response echoes `method` and `id` and carries exactly
//! one of `result` or `error`. No type tag is transmitted: `method` alone
//! determines the shape of both `params` and `result`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::methods::{Method, MethodResult};

/// Error code carried by every failed response.
pub const DISPATCH_FAILURE: i32 = -1;

/// Inbound envelope. `params` stays untyped until the dispatcher has
/// resolved `method`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Method name, matched case-insensitively.
    #[serde(default, deserialize_with = "scalar_string")]
    pub method: Option<String>,
    /// Method-specific parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Correlation token, echoed verbatim. Numeric and boolean ids are
    /// kept in their text form, so `"id": 1` is echoed as `"1"`.
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: Option<String>,
}

/// Reads a string, number or boolean as its text. `null` reads as `None`;
/// objects and arrays are rejected.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

impl Request {
    pub fn new(method: impl Into<String>, params: Option<Value>, id: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            params,
            id: Some(id.into()),
        }
    }
}

/// Outbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<MethodResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<String>,
}

/// Failure classification, reported alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingMethod,
    UnknownMethod,
    InvalidParams,
    HandlerFailure,
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Always [`DISPATCH_FAILURE`].
    pub code: i32,
    pub message: String,
    pub kind: ErrorKind,
}

impl Response {
    /// Create a success response. `method` is the canonical name of the
    /// method that produced `result`.
    pub fn success(id: Option<String>, result: MethodResult) -> Self {
        Self {
            method: Some(result.method().as_str().to_string()),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response echoing the request's method name.
    pub fn error(
        id: Option<String>,
        method: Option<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            method,
            result: None,
            error: Some(RpcError {
                code: DISPATCH_FAILURE,
                message: message.into(),
                kind,
            }),
            id,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl<'de> Deserialize<'de> for Response {
    /// Reads `method` first, then decodes `result` into that method's
    /// response type. Shapes come from the built-in method names and their
    /// aliases; a result under any other name is rejected, even if a custom
    /// registry serves that name.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default, deserialize_with = "scalar_string")]
            method: Option<String>,
            #[serde(default)]
            result: Option<Value>,
            #[serde(default)]
            error: Option<RpcError>,
            #[serde(default, deserialize_with = "scalar_string")]
            id: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;

        let result = match raw.result {
            None | Some(Value::Null) => None,
            Some(value) => {
                let name = raw.method.as_deref().unwrap_or_default();
                let method = Method::from_name(name).ok_or_else(|| {
                    D::Error::custom(format!("result present for unknown method: {name}"))
                })?;
                Some(MethodResult::from_value(method, value).map_err(D::Error::custom)?)
            }
        };

        Ok(Self {
            method: raw.method,
            result,
            error: raw.error,
            id: raw.id,
        })
    }
}
