//! Report endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;

use super::{check_access, header_u64, info};
use crate::mock_server::state::MockState;
use crate::ReportFormat;

fn parse_format(value: &str) -> Option<ReportFormat> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

/// GET /api/v1/report
pub async fn generate_report(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let Some(upload) = header_u64(&headers, "uploadId") else {
        return info(StatusCode::BAD_REQUEST, "uploadId header should be an integer");
    };
    let format = headers
        .get("reportFormat")
        .and_then(|v| v.to_str().ok())
        .and_then(parse_format);
    let Some(format) = format else {
        return info(StatusCode::BAD_REQUEST, "reportFormat is not supported");
    };
    if !state.uploads.contains_key(&upload) {
        return info(StatusCode::NOT_FOUND, format!("Upload id {upload} doesn't exist"));
    }

    let id = state.request_report(upload, format);
    info(
        StatusCode::CREATED,
        format!("http://localhost/repo/api/v1/report/{id}"),
    )
}

/// GET /api/v1/report/{id}
pub async fn download_report(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }
    if state.poll_report(id) {
        return info(
            StatusCode::SERVICE_UNAVAILABLE,
            "Report is not ready yet. Check job status at /api/v1/jobs",
        );
    }

    let Some(report) = state.reports.get(&id) else {
        return info(StatusCode::NOT_FOUND, format!("Report {id} does not exist"));
    };
    let upload_name = state
        .uploads
        .get(&report.upload_id)
        .map(|u| u.uploadname.clone())
        .unwrap_or_default();
    let file_name = format!("{}_{upload_name}.txt", report.format.as_str());
    let content = format!("{} report for {upload_name}\n", report.format.as_str());

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        content,
    )
        .into_response()
}
