//! Folder endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{check_access, header_u64, info};
use crate::mock_server::state::MockState;
use crate::Folder;

/// GET /api/v1/folders
pub async fn list_folders(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let folders: Vec<Folder> = state.folders.values().cloned().collect();
    (StatusCode::OK, Json(folders)).into_response()
}

/// GET /api/v1/folders/{id}
pub async fn get_folder(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    match state.folders.get(&id) {
        Some(folder) => (StatusCode::OK, Json(folder.clone())).into_response(),
        None => info(StatusCode::NOT_FOUND, format!("Folder id {id} doesn't exist")),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn missing(id: u64) -> Response {
    info(StatusCode::NOT_FOUND, format!("Folder id {id} doesn't exist"))
}

/// POST /api/v1/folders
pub async fn create_folder(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let Some(parent) = header_u64(&headers, "parentFolder") else {
        return info(StatusCode::BAD_REQUEST, "parentFolder header should be an integer");
    };
    let Some(name) = header_str(&headers, "folderName").filter(|n| !n.is_empty()) else {
        return info(StatusCode::BAD_REQUEST, "folderName header is required");
    };
    if !state.folders.contains_key(&parent) {
        return missing(parent);
    }

    let description = header_str(&headers, "folderDescription").map(str::to_string);
    match state.create_folder(parent, name, description) {
        (id, true) => info(StatusCode::OK, id),
        (id, false) => info(StatusCode::CREATED, id),
    }
}

/// PATCH /api/v1/folders/{id}
pub async fn update_folder(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let Some(folder) = state.folders.get_mut(&id) else {
        return missing(id);
    };
    if let Some(name) = header_str(&headers, "name") {
        folder.name = name.to_string();
    }
    if let Some(description) = header_str(&headers, "description") {
        folder.description = Some(description.to_string());
    }
    info(StatusCode::OK, "Folder updated")
}

/// DELETE /api/v1/folders/{id}
pub async fn delete_folder(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }
    if id == 1 {
        return info(StatusCode::BAD_REQUEST, "Can not delete root folder");
    }

    if state.delete_folder(id) {
        info(StatusCode::ACCEPTED, format!("Folder {id} scheduled for deletion"))
    } else {
        missing(id)
    }
}

/// PUT /api/v1/folders/{id}
pub async fn move_or_copy_folder(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let Some(parent) = header_u64(&headers, "parent") else {
        return info(StatusCode::BAD_REQUEST, "parent header should be an integer");
    };
    if !state.folders.contains_key(&parent) {
        return missing(parent);
    }

    match header_str(&headers, "action") {
        Some("move") if id == parent => info(StatusCode::BAD_REQUEST, "Can not move a folder into itself"),
        Some("move") if state.move_folder(id, parent) => {
            info(StatusCode::ACCEPTED, format!("Folder {id} moved to {parent}"))
        }
        Some("copy") => match state.copy_folder(id, parent) {
            Some(copy) => info(StatusCode::ACCEPTED, format!("Folder {id} copied to {parent} as {copy}")),
            None => missing(id),
        },
        Some("move") => missing(id),
        _ => info(StatusCode::BAD_REQUEST, "action header must be move or copy"),
    }
}
