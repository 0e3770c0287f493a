//! `POST /rpc` handler.

use axum::{Json, extract::State};

use super::WebState;
use crate::rpc::{Request, Response};

/// Dispatch one envelope. Application-level failures are returned as an
/// error envelope with status 200; only an undecodable body is rejected.
pub async fn rpc_handler(
    State(state): State<WebState>,
    Json(request): Json<Request>,
) -> Json<Response> {
    Json(state.dispatcher.dispatch(request))
}
