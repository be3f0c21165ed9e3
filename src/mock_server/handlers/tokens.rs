//! Token endpoint handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::info;
use crate::mock_server::state::MockState;

/// Form body of a token request.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
    pub token_name: String,
    #[allow(dead_code)] // Scope is not enforced by the mock
    pub token_scope: String,
    #[allow(dead_code)]
    pub token_expire: String,
}

/// POST /api/v1/tokens
pub async fn create_token(
    State(state): State<Arc<RwLock<MockState>>>,
    Form(form): Form<TokenForm>,
) -> Response {
    let state = state.read().await;

    match state.credentials.get(&form.username) {
        Some(password) if *password == form.password => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "Authorization": format!("Bearer {}.{}", form.username, form.token_name),
            })),
        )
            .into_response(),
        _ => info(StatusCode::NOT_FOUND, "Username or password is incorrect"),
    }
}
