//! Method registry and parameter codec.
//!
//! The registry is an immutable table from lower-case method name to a
//! [`MethodEntry`]: a decoder that turns an untyped `params` value into the
//! typed [`MethodCall`] for that method, and the handler that runs it.
//! Synonyms are simply extra names pointing at the same entry.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::handlers;
use super::methods::{
    Method, MethodCall, MethodResult, RebootRequest, RestartRequest, ShutdownRequest, StatusRequest,
    VersionRequest,
};

/// Reshapes untyped parameters into a typed call.
pub type Decoder = fn(Value) -> Result<MethodCall, serde_json::Error>;

/// Computes the result for a decoded call.
pub type Handler = fn(MethodCall) -> MethodResult;

/// Structural decode of `params` into `T`.
///
/// Unknown fields are ignored and missing optional fields stay `None`.
/// A value of the wrong JSON type for a known field is an error.
pub fn decode_params<T>(params: Value) -> Result<MethodCall, serde_json::Error>
where
    T: DeserializeOwned + Into<MethodCall>,
{
    serde_json::from_value::<T>(params).map(Into::into)
}

/// A registered method: its tag, parameter decoder and handler.
#[derive(Clone, Copy)]
pub struct MethodEntry {
    pub method: Method,
    decode: Decoder,
    handler: Handler,
}

impl MethodEntry {
    pub fn new(method: Method, decode: Decoder, handler: Handler) -> Self {
        Self {
            method,
            decode,
            handler,
        }
    }

    /// Decode `params`; absent or `null` params are treated as `{}`.
    pub fn decode(&self, params: Option<Value>) -> Result<MethodCall, serde_json::Error> {
        let params = match params {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };
        (self.decode)(params)
    }

    /// Run the handler on a call produced by [`MethodEntry::decode`].
    pub fn invoke(&self, call: MethodCall) -> MethodResult {
        (self.handler)(call)
    }
}

impl std::fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodEntry")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Name table consulted by the dispatcher.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    entries: HashMap<String, MethodEntry>,
}

impl MethodRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in method and its synonyms.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for method in Method::ALL {
            let entry = MethodEntry::new(method, builtin_decoder(method), handlers::invoke);
            registry.register(method.as_str(), entry);
            for alias in method.aliases() {
                registry.register(alias, entry);
            }
        }
        registry
    }

    /// Add or replace the entry for `name` (stored lower-case).
    pub fn register(&mut self, name: &str, entry: MethodEntry) -> &mut Self {
        self.entries.insert(name.to_lowercase(), entry);
        self
    }

    /// Case-insensitive lookup.
    pub fn resolve(&self, name: &str) -> Option<&MethodEntry> {
        self.entries.get(&name.to_lowercase())
    }

    /// All registered names, synonyms included, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_decoder(method: Method) -> Decoder {
    match method {
        Method::Reboot => decode_params::<RebootRequest> as Decoder,
        Method::Status => decode_params::<StatusRequest>,
        Method::Shutdown => decode_params::<ShutdownRequest>,
        Method::Restart => decode_params::<RestartRequest>,
        Method::Version => decode_params::<VersionRequest>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_names() {
        let registry = MethodRegistry::builtin();

        assert_eq!(
            registry.names(),
            vec![
                "getstatus",
                "getversion",
                "reboot",
                "restart",
                "shutdown",
                "status",
                "version"
            ]
        );
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = MethodRegistry::builtin();

        assert_eq!(registry.resolve("REBOOT").unwrap().method, Method::Reboot);
        assert_eq!(registry.resolve("GetStatus").unwrap().method, Method::Status);
        assert_eq!(registry.resolve("getversion").unwrap().method, Method::Version);
        assert!(registry.resolve("frobnicate").is_none());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let entry = MethodRegistry::builtin().resolve("reboot").copied().unwrap();
        let call = entry
            .decode(Some(json!({"reason": "kernel update", "extra": [1, 2, 3]})))
            .unwrap();

        assert_eq!(
            call,
            MethodCall::Reboot(RebootRequest {
                reason: Some("kernel update".into()),
                force: None,
            })
        );
    }

    #[test]
    fn test_decode_absent_params_as_empty() {
        let registry = MethodRegistry::builtin();

        let call = registry.resolve("shutdown").unwrap().decode(None).unwrap();
        assert_eq!(call, MethodCall::Shutdown(ShutdownRequest::default()));

        let call = registry
            .resolve("status")
            .unwrap()
            .decode(Some(Value::Null))
            .unwrap();
        assert_eq!(call, MethodCall::Status(StatusRequest {}));
    }

    #[test]
    fn test_decode_type_mismatch_fails() {
        let registry = MethodRegistry::builtin();

        let err = registry
            .resolve("shutdown")
            .unwrap()
            .decode(Some(json!({"delay": "thirty"})))
            .unwrap_err();
        assert!(err.to_string().contains("invalid type"));

        assert!(
            registry
                .resolve("reboot")
                .unwrap()
                .decode(Some(json!({"force": "yes"})))
                .is_err()
        );
    }

    #[test]
    fn test_decode_non_object_params_fails() {
        let registry = MethodRegistry::builtin();
        assert!(registry.resolve("restart").unwrap().decode(Some(json!(42))).is_err());
    }

    #[test]
    fn test_register_extends_table() {
        let mut registry = MethodRegistry::new();
        assert!(registry.is_empty());

        fn bounce(call: MethodCall) -> MethodResult {
            match call {
                MethodCall::Restart(req) => handlers::restart(RestartRequest {
                    service: req.service.or_else(|| Some("bouncer".into())),
                })
                .into(),
                other => handlers::invoke(other),
            }
        }

        registry.register(
            "Bounce",
            MethodEntry::new(Method::Restart, decode_params::<RestartRequest>, bounce),
        );

        assert_eq!(registry.len(), 1);
        let entry = registry.resolve("bounce").unwrap();
        assert_eq!(entry.method, Method::Restart);

        match entry.invoke(entry.decode(None).unwrap()) {
            MethodResult::Restart(resp) => assert_eq!(resp.service, "bouncer"),
            other => panic!("Expected restart result, got {:?}", other),
        }
    }
}
