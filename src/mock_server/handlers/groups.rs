//! Group endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{check_access, info};
use crate::mock_server::state::MockState;
use crate::Group;

/// GET /api/v1/groups
pub async fn list_groups(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let groups: Vec<Group> = state.groups.values().cloned().collect();
    (StatusCode::OK, Json(groups)).into_response()
}

/// POST /api/v1/groups
pub async fn create_group(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let name = headers
        .get("name")
        .and_then(|v| v.to_str().ok())
        .filter(|n| !n.is_empty());
    let Some(name) = name else {
        return info(StatusCode::BAD_REQUEST, "ERROR - no group name provided");
    };

    match state.create_group(name) {
        Some(_) => info(StatusCode::OK, format!("Group {name} added")),
        None => info(StatusCode::BAD_REQUEST, format!("Group {name} already exists")),
    }
}
