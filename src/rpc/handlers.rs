//! Method handlers.
//!
//! Each handler maps a typed request to a typed response. Optional request
//! fields are defaulted here. None of these touch the host: the reported
//! values are synthesized, only the timestamp comes from the wall clock.

use chrono::Local;

use super::methods::{
    MethodCall, MethodResult, RebootRequest, RebootResponse, RestartRequest, RestartResponse,
    ShutdownRequest, ShutdownResponse, StatusRequest, StatusResponse, VersionRequest,
    VersionResponse,
};

pub const DEFAULT_REBOOT_REASON: &str = "Manual reboot";
pub const DEFAULT_SHUTDOWN_REASON: &str = "Manual shutdown";
pub const DEFAULT_RESTART_SERVICE: &str = "system";

pub const APPLICATION_NAME: &str = "RPC-REST Service";
pub const BUILD_ID: &str = "20241127";
pub const FRAMEWORK_VERSION: &str = "axum 0.8";

/// Current local time as `YYYY-MM-DDTHH:MM:SS.mmm`.
pub fn timestamp() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string()
}

pub fn reboot(req: RebootRequest) -> RebootResponse {
    RebootResponse {
        status: "reboot_initiated".to_string(),
        reason: req
            .reason
            .unwrap_or_else(|| DEFAULT_REBOOT_REASON.to_string()),
        force: req.force.unwrap_or(false),
        timestamp: timestamp(),
        estimated_downtime: "30 seconds".to_string(),
    }
}

/// Placeholder figures, not live telemetry.
pub fn status(_req: StatusRequest) -> StatusResponse {
    StatusResponse {
        uptime: "2 days, 14 hours, 23 minutes".to_string(),
        memory_usage: "65%".to_string(),
        cpu_usage: "12%".to_string(),
        disk_usage: "78%".to_string(),
        active_connections: 42,
        timestamp: timestamp(),
    }
}

pub fn shutdown(req: ShutdownRequest) -> ShutdownResponse {
    ShutdownResponse {
        status: "shutdown_scheduled".to_string(),
        reason: req
            .reason
            .unwrap_or_else(|| DEFAULT_SHUTDOWN_REASON.to_string()),
        delay_seconds: req.delay.unwrap_or(0),
        timestamp: timestamp(),
    }
}

pub fn restart(req: RestartRequest) -> RestartResponse {
    RestartResponse {
        status: "restart_initiated".to_string(),
        service: req
            .service
            .unwrap_or_else(|| DEFAULT_RESTART_SERVICE.to_string()),
        timestamp: timestamp(),
        estimated_duration: "10 seconds".to_string(),
    }
}

pub fn version(_req: VersionRequest) -> VersionResponse {
    VersionResponse {
        application: APPLICATION_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: BUILD_ID.to_string(),
        runtime_version: format!("rust {}", env!("CARGO_PKG_RUST_VERSION")),
        framework_version: FRAMEWORK_VERSION.to_string(),
    }
}

/// Run the handler matching the call's variant. Built-in registry
/// entries use this as their handler.
pub fn invoke(call: MethodCall) -> MethodResult {
    match call {
        MethodCall::Reboot(req) => reboot(req).into(),
        MethodCall::Status(req) => status(req).into(),
        MethodCall::Shutdown(req) => shutdown(req).into(),
        MethodCall::Restart(req) => restart(req).into(),
        MethodCall::Version(req) => version(req).into(),
    }
}
