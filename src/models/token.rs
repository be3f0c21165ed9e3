//! Bearer token issuance.

use std::fmt;

use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::client::{api_url, json};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};

/// Permissions granted to a new token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    #[default]
    Read,
    Write,
}

/// Credentials and settings for a new API token.
#[derive(Clone, Serialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
    pub token_name: String,
    pub token_scope: TokenScope,
    /// Last day the token is valid, sent as `YYYY-MM-DD`.
    pub token_expire: NaiveDate,
}

impl fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequest")
            .field("username", &self.username)
            .field("token_name", &self.token_name)
            .field("token_scope", &self.token_scope)
            .field("token_expire", &self.token_expire)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(rename = "Authorization")]
    authorization: String,
}

/// Ask the server for a new bearer token.
///
/// Returns the bare token, without the `Bearer ` prefix.
///
/// # Errors
///
/// Returns [`FossologyError::ServerUnreachable`] if no connection could be
/// made, [`FossologyError::Authentication`] if the credentials are rejected,
/// and an API error for any other status.
#[tracing::instrument(skip(request), fields(username = %request.username))]
pub async fn generate_token(server_url: &str, request: &TokenRequest) -> Result<String> {
    let url = api_url(server_url)?.join("tokens")?;

    let response = Client::new()
        .post(url)
        .form(request)
        .send()
        .await
        .map_err(|source| {
            if source.is_connect() {
                FossologyError::ServerUnreachable {
                    url: server_url.to_string(),
                    source,
                }
            } else {
                FossologyError::HttpError(source)
            }
        })?;

    match dispatch::ISSUE_TOKEN.classify(response.status()) {
        Outcome::Success => {
            let body: TokenResponse = json(response).await?;
            tracing::info!("New token {} issued for {}", request.token_name, request.username);
            Ok(strip_bearer(&body.authorization).to_string())
        }
        Outcome::Rejected => Err(FossologyError::Authentication(format!(
            "Unable to authenticate {} on {server_url}",
            request.username
        ))),
        _ => Err(FossologyError::api("Error while generating new token", response).await),
    }
}

fn strip_bearer(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header).trim()
}
