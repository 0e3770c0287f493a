//! `/api/users` handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::WebState;
use crate::users::{ApiResponse, CreateUserRequest, UpdateUserRequest, User};

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

fn reply<T>(status: StatusCode, body: ApiResponse<T>) -> Reply<T> {
    (status, Json(body))
}

fn not_found<T>() -> Reply<T> {
    reply(StatusCode::NOT_FOUND, ApiResponse::error("User not found"))
}

pub async fn create_user(
    State(state): State<WebState>,
    Json(request): Json<CreateUserRequest>,
) -> Reply<User> {
    let new_user = match request.validate() {
        Ok(user) => user,
        Err(e) => return reply(StatusCode::BAD_REQUEST, ApiResponse::error(e.to_string())),
    };

    let user = state.users.create(new_user).await;
    tracing::debug!(id = user.id, username = %user.username, "User created");
    reply(
        StatusCode::CREATED,
        ApiResponse::success("User created successfully", Some(user)),
    )
}

pub async fn list_users(State(state): State<WebState>) -> Reply<Vec<User>> {
    let users = state.users.list().await;
    reply(StatusCode::OK, ApiResponse::success("Success", Some(users)))
}

pub async fn get_user(State(state): State<WebState>, Path(id): Path<u64>) -> Reply<User> {
    match state.users.get(id).await {
        Some(user) => reply(StatusCode::OK, ApiResponse::success("Success", Some(user))),
        None => not_found(),
    }
}

pub async fn update_user(
    State(state): State<WebState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateUserRequest>,
) -> Reply<User> {
    if let Err(e) = request.validate() {
        return reply(StatusCode::BAD_REQUEST, ApiResponse::error(e.to_string()));
    }

    match state.users.update(id, request).await {
        Some(user) => reply(
            StatusCode::OK,
            ApiResponse::success("User updated successfully", Some(user)),
        ),
        None => not_found(),
    }
}

pub async fn delete_user(State(state): State<WebState>, Path(id): Path<u64>) -> Reply<()> {
    if state.users.delete(id).await {
        tracing::debug!(id, "User deleted");
        reply(
            StatusCode::OK,
            ApiResponse::success("User deleted successfully", None),
        )
    } else {
        not_found()
    }
}
