//! Error types for FOSSology API operations.

use std::fmt;
use std::path::PathBuf;

use reqwest::Response;
use thiserror::Error;

/// Snapshot of a failed HTTP response, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDetails {
    /// HTTP status code.
    pub status: u16,
    /// The request URL.
    pub url: String,
    /// Raw response body.
    pub body: String,
}

impl ResponseDetails {
    /// Consume a response and keep what is useful for error reports.
    pub async fn capture(response: Response) -> Self {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Self { status, url, body }
    }

    /// The server-provided `message` field, if the body is a JSON object with one.
    pub fn server_message(&self) -> Option<String> {
        let json = serde_json::from_str::<serde_json::Value>(&self.body).ok()?;
        json.get("message")
            .and_then(|m| m.as_str())
            .map(ToString::to_string)
    }
}

impl fmt::Display for ResponseDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.server_message() {
            Some(message) => write!(f, "{message} ({})", self.status),
            None if self.body.is_empty() => write!(f, "HTTP {}", self.status),
            None => write!(f, "{} ({})", self.body, self.status),
        }
    }
}

/// Errors that can occur during FOSSology API operations.
#[derive(Debug, Error)]
pub enum FossologyError {
    /// Configuration is missing or incomplete.
    #[error("FOSSology configuration required: {0}")]
    ConfigMissing(String),

    /// Credentials were rejected.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The user may not access the resource, group or folder.
    #[error("Authorization error: {message}: {response}")]
    Authorization {
        message: String,
        response: ResponseDetails,
    },

    /// API request failed or could not be completed.
    #[error("FOSSology API error: {message}{}", format_response(.response))]
    Api {
        message: String,
        response: Option<ResponseDetails>,
    },

    /// The server could not be reached at all.
    #[error("Server {url} does not seem to be running or is unreachable: {source}")]
    ServerUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A local file could not be read for upload.
    #[error("Unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

fn format_response(response: &Option<ResponseDetails>) -> String {
    response
        .as_ref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

impl FossologyError {
    /// Build an authorization error from a 403 response.
    pub(crate) async fn unauthorized(message: impl Into<String>, response: Response) -> Self {
        Self::Authorization {
            message: message.into(),
            response: ResponseDetails::capture(response).await,
        }
    }

    /// Build an API error from an unexpected response.
    pub(crate) async fn api(message: impl Into<String>, response: Response) -> Self {
        Self::Api {
            message: message.into(),
            response: Some(ResponseDetails::capture(response).await),
        }
    }

    /// Build an API error that has no response attached.
    pub(crate) fn incomplete(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            response: None,
        }
    }

    /// The HTTP status of the response that caused this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authorization { response, .. } => Some(response.status),
            Self::Api { response, .. } => response.as_ref().map(|r| r.status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for FOSSology operations.
pub type Result<T> = core::result::Result<T, FossologyError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn details(status: u16, body: &str) -> ResponseDetails {
        ResponseDetails {
            status,
            url: "http://localhost/repo/api/v1/uploads/7".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_response_details_prefers_server_message() {
        let d = details(403, r#"{"code": 403, "message": "Upload is not accessible", "type": "ERROR"}"#);
        assert_eq!(d.to_string(), "Upload is not accessible (403)");
    }

    #[test]
    fn test_response_details_empty_body() {
        assert_eq!(details(500, "").to_string(), "HTTP 500");
    }

    #[test]
    fn test_authorization_display_keeps_message() {
        let err = FossologyError::Authorization {
            message: "Deleting upload 7 for group test not authorized".to_string(),
            response: details(403, ""),
        };
        let text = err.to_string();
        assert!(text.contains("Deleting upload 7 for group test not authorized"));
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn test_incomplete_api_error_has_no_status() {
        let err = FossologyError::incomplete("Upload of sources.zip failed");
        assert_eq!(err.to_string(), "FOSSology API error: Upload of sources.zip failed");
        assert_eq!(err.status_code(), None);
    }
}
