//! User endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{check_access, info};
use crate::mock_server::state::MockState;
use crate::User;

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let users: Vec<User> = state.users.values().cloned().collect();
    (StatusCode::OK, Json(users)).into_response()
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    match state.users.get(&id) {
        Some(user) => (StatusCode::OK, Json(user.clone())).into_response(),
        None => info(StatusCode::NOT_FOUND, format!("UserId {id} doesn't exist")),
    }
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    match state.users.remove(&id) {
        Some(_) => info(StatusCode::ACCEPTED, format!("User will be deleted: {id}")),
        None => info(StatusCode::NOT_FOUND, format!("UserId {id} doesn't exist")),
    }
}
