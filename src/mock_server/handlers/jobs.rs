//! Job endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{check_access, header_u64, info, paginate};
use crate::mock_server::state::MockState;
use crate::{JobSpec, TOTAL_PAGES_HEADER};

/// Query parameters for listing jobs.
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsQuery {
    pub upload: Option<u64>,
}

/// GET /api/v1/jobs
pub async fn list_jobs(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<ListJobsQuery>,
) -> Response {
    let state = state.read().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let (jobs, total_pages) = paginate(&state.list_jobs(query.upload), &headers);
    (
        StatusCode::OK,
        [(TOTAL_PAGES_HEADER, total_pages.to_string())],
        Json(jobs),
    )
        .into_response()
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    match state.poll_job(id) {
        Some(job) => (StatusCode::OK, Json(job)).into_response(),
        None => info(StatusCode::NOT_FOUND, format!("Job id {id} doesn't exist")),
    }
}

/// POST /api/v1/jobs
pub async fn schedule_job(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    body: Result<Json<JobSpec>, JsonRejection>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let (Some(folder), Some(upload)) = (
        header_u64(&headers, "folderId"),
        header_u64(&headers, "uploadId"),
    ) else {
        return info(StatusCode::BAD_REQUEST, "folderId and uploadId headers are required");
    };
    if body.is_err() {
        return info(StatusCode::BAD_REQUEST, "Request body is not a job specification");
    }
    if !state.folders.contains_key(&folder) {
        return info(StatusCode::NOT_FOUND, format!("Folder id {folder} doesn't exist"));
    }

    match state.schedule_job(upload) {
        Some(id) => info(StatusCode::CREATED, id),
        None => info(StatusCode::NOT_FOUND, format!("Upload id {upload} doesn't exist")),
    }
}
