//! HTTP request handlers for the mock server.

pub mod folders;
pub mod groups;
pub mod jobs;
pub mod reports;
pub mod tokens;
pub mod uploads;
pub mod users;

pub use folders::*;
pub use groups::*;
pub use jobs::*;
pub use reports::*;
pub use tokens::*;
pub use uploads::*;
pub use users::*;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::mock_server::state::MockState;
use crate::GROUP_HEADER;

/// FOSSology's `Info` body: `{"code", "message", "type"}`.
pub(crate) fn info(status: StatusCode, message: impl Into<serde_json::Value>) -> Response {
    let kind = if status.is_success() || status == StatusCode::SERVICE_UNAVAILABLE {
        "INFO"
    } else {
        "ERROR"
    };
    (
        status,
        Json(serde_json::json!({
            "code": status.as_u16(),
            "message": message.into(),
            "type": kind,
        })),
    )
        .into_response()
}

/// Reject the request when its token or group is not accepted.
pub(crate) fn check_access(state: &MockState, headers: &HeaderMap) -> Option<Response> {
    if let Some(required) = &state.required_token {
        let presented = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(required.as_str()) {
            return Some(info(StatusCode::FORBIDDEN, "Invalid token"));
        }
    }

    let group = headers.get(GROUP_HEADER).and_then(|v| v.to_str().ok());
    if state.is_forbidden(group) {
        return Some(info(
            StatusCode::FORBIDDEN,
            format!("User is not a member of group {}", group.unwrap_or_default()),
        ));
    }
    None
}

/// Read a numeric request header.
pub(crate) fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Cut the page selected by the `page` and `limit` headers out of `items`.
/// Returns the page and the total number of pages.
pub(crate) fn paginate<T: Clone>(items: &[T], headers: &HeaderMap) -> (Vec<T>, usize) {
    let page = header_u64(headers, "page").unwrap_or(1).max(1);
    let limit = header_u64(headers, "limit").unwrap_or(100).max(1);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);

    let total_pages = items.len().div_ceil(limit).max(1);
    let start = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(limit);

    let page_items = items.iter().skip(start).take(limit).cloned().collect();
    (page_items, total_pages)
}
