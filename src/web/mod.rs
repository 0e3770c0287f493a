//! HTTP server.
//!
//! ## Endpoints
//!
//! - `POST /rpc` - unified RPC endpoint
//! - `POST /api/users`, `GET /api/users` - create and list users
//! - `GET|PUT|DELETE /api/users/{id}` - read, update and delete one user

mod rpc;
mod users;

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::context::AppContext;
use crate::rpc::Dispatcher;
use crate::users::UserStore;

/// Shared state for the route handlers
#[derive(Clone)]
pub struct WebState {
    pub dispatcher: Dispatcher,
    pub users: UserStore,
}

impl From<&AppContext> for WebState {
    fn from(ctx: &AppContext) -> Self {
        Self {
            dispatcher: ctx.dispatcher.clone(),
            users: ctx.users.clone(),
        }
    }
}

/// Build the application router.
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/rpc", post(rpc::rpc_handler))
        .route(
            "/api/users",
            post(users::create_user).get(users::list_users),
        )
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .with_state(state)
}

/// Web server exposing the RPC and users endpoints.
pub struct WebServer {
    bind_addr: SocketAddr,
    state: WebState,
    shutdown_tx: broadcast::Sender<()>,
}

impl WebServer {
    /// Create a new web server bound to the given address.
    pub fn new(ctx: &AppContext, bind_addr: SocketAddr) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            bind_addr,
            state: WebState::from(ctx),
            shutdown_tx,
        }
    }

    /// Bind and serve. Runs until shutdown() is called.
    pub async fn start(&self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener. Runs until shutdown() is called.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        let app = router(self.state.clone());
        tracing::info!(addr = %listener.local_addr()?, "HTTP server listening");

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Signal the server to shut down gracefully.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        router(WebState::from(&AppContext::new(AppConfig::default())))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_rpc_success() {
        let (status, body) = send(
            app(),
            "POST",
            "/rpc",
            Some(json!({"method":"reboot","params":{"reason":"Scheduled maintenance","force":false},"id":"1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "reboot");
        assert_eq!(body["id"], "1");
        assert_eq!(body["result"]["status"], "reboot_initiated");
        assert_eq!(body["result"]["reason"], "Scheduled maintenance");
        assert_eq!(body["result"]["force"], false);
        assert_eq!(body["result"]["estimatedDowntime"], "30 seconds");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_rpc_failure_is_still_200() {
        let (status, body) = send(
            app(),
            "POST",
            "/rpc",
            Some(json!({"method":"frobnicate","params":{},"id":"9"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "frobnicate");
        assert_eq!(body["id"], "9");
        assert_eq!(body["error"]["code"], -1);
        assert_eq!(body["error"]["message"], "Unknown method: frobnicate");
        assert!(body.get("result").is_none());
    }

    #[tokio::test]
    async fn test_rpc_scalar_id_and_method_get_envelopes() {
        let app = app();

        let (status, body) = send(
            app.clone(),
            "POST",
            "/rpc",
            Some(json!({"method":"status","params":{},"id":1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "1");
        assert_eq!(body["method"], "status");
        assert_eq!(body["result"]["activeConnections"], 42);

        let (status, body) = send(
            app,
            "POST",
            "/rpc",
            Some(json!({"method":5,"params":{},"id":"n"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "5");
        assert_eq!(body["id"], "n");
        assert_eq!(body["error"]["kind"], "unknown_method");
        assert_eq!(body["error"]["message"], "Unknown method: 5");
    }

    #[tokio::test]
    async fn test_rpc_malformed_json_is_transport_error() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rpc")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_users_crud_flow() {
        let app = app();

        let (status, body) = send(
            app.clone(),
            "POST",
            "/api/users",
            Some(json!({"username":"johndoe","email":"john.doe@example.com","fullName":"John Doe"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["fullName"], "John Doe");
        let created_at = body["data"]["createdAt"].clone();

        let (status, body) = send(app.clone(), "GET", "/api/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            app.clone(),
            "PUT",
            "/api/users/1",
            Some(json!({"fullName":"John Updated Doe"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["data"]["username"], "johndoe");
        assert_eq!(body["data"]["email"], "john.doe@example.com");
        assert_eq!(body["data"]["fullName"], "John Updated Doe");
        assert_eq!(body["data"]["createdAt"], created_at);

        let (status, body) = send(app.clone(), "GET", "/api/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["fullName"], "John Updated Doe");

        let (status, body) = send(app.clone(), "DELETE", "/api/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");

        let (status, body) = send(app, "GET", "/api/users/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_users_not_found() {
        let app = app();

        let (status, _) = send(app.clone(), "PUT", "/api/users/42", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(app, "DELETE", "/api/users/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_users_validation() {
        let app = app();

        let (status, body) = send(
            app.clone(),
            "POST",
            "/api/users",
            Some(json!({"username":"jd","email":"john.doe@example.com","fullName":"John Doe"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Username must be between 3 and 50 characters"
        );

        let (status, _) = send(
            app.clone(),
            "POST",
            "/api/users",
            Some(json!({"username":"johndoe","email":"john.doe@example.com","fullName":"John Doe"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            "PUT",
            "/api/users/1",
            Some(json!({"email":"nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email should be valid");
    }
}
