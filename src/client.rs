//! FOSSology API client.
//!
//! Low-level HTTP session that handles authentication, group scoping and raw
//! requests. Endpoint operations live on the model types and classify the
//! responses themselves through their status tables.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};
use crate::models::User;
use crate::retry::{Sleeper, TokioSleeper};

/// Server root used when `FOSSOLOGY_API_URL` is not set.
pub const DEFAULT_SERVER_URL: &str = "http://localhost/repo";
const API_PATH: &str = "api/v1/";
const USER_AGENT: &str = concat!("fossology-rs/", env!("CARGO_PKG_VERSION"));

/// Header that scopes a request to a non-default group.
pub const GROUP_HEADER: &str = "groupName";

/// Low-level FOSSology API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations are
/// implemented on the model types (`Upload`, `User`, `Folder`) and through
/// the `Get` and `List` traits.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool. It is never mutated after construction: scoping to a
/// group or changing the delay primitive returns a new client.
///
/// # Example
///
/// ```no_run
/// use fossology::FossologyClient;
///
/// # fn example() -> fossology::Result<()> {
/// // Create from environment variables
/// let client = FossologyClient::from_env()?;
///
/// // Or configure manually, scoped to a group
/// let client = FossologyClient::new("your-token", "http://localhost/repo")?.for_group("qa");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FossologyClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
    group: Option<String>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for FossologyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FossologyClient")
            .field("base_url", &self.base_url.as_str())
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

impl FossologyClient {
    /// Create a client from environment variables.
    ///
    /// Uses `FOSSOLOGY_TOKEN` for authentication, optionally `FOSSOLOGY_API_URL`
    /// for the server (defaults to `http://localhost/repo`) and
    /// `FOSSOLOGY_GROUP` to scope every request to a group.
    ///
    /// # Errors
    ///
    /// Returns an error if `FOSSOLOGY_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("FOSSOLOGY_TOKEN").map_err(|_| {
            FossologyError::ConfigMissing("FOSSOLOGY_TOKEN environment variable not set".to_string())
        })?;

        let server_url =
            env::var("FOSSOLOGY_API_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        let client = Self::new(&token, &server_url)?;
        Ok(match env::var("FOSSOLOGY_GROUP") {
            Ok(group) if !group.is_empty() => client.for_group(group),
            _ => client,
        })
    }

    /// Create a new client with the provided token and server URL.
    ///
    /// # Arguments
    ///
    /// * `token` - FOSSology bearer token
    /// * `server_url` - Server root (e.g., `http://localhost/repo`); the
    ///   `/api/v1` prefix is appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL is invalid.
    pub fn new(token: &str, server_url: &str) -> Result<Self> {
        let base_url = api_url(server_url)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(FossologyError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
            group: None,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Return a client whose requests are scoped to `group`.
    #[must_use]
    pub fn for_group(&self, group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..self.clone()
        }
    }

    /// Return a client that waits between polling attempts with `sleeper`.
    #[must_use]
    pub fn with_sleeper(&self, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            sleeper,
            ..self.clone()
        }
    }

    /// Get the API base URL (ends with `/api/v1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The group this client is scoped to, if any.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub(crate) fn sleeper(&self) -> &dyn Sleeper {
        self.sleeper.as_ref()
    }

    /// Build an authenticated request for `path`, relative to the API base.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;

        let mut builder = self.http.request(method, url).bearer_auth(&self.token);
        if let Some(group) = &self.group {
            builder = builder.header(GROUP_HEADER, group);
        }
        Ok(builder)
    }

    /// Send a request built with [`request`](Self::request).
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder.send().await.map_err(FossologyError::HttpError)
    }

    /// Get the API version reported by the server.
    ///
    /// # Errors
    ///
    /// Returns an API error if the server does not answer with 200.
    #[tracing::instrument(skip(self))]
    pub async fn version(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct VersionResponse {
            version: String,
        }

        let response = self.send(self.request(Method::GET, "version")?).await?;
        match dispatch::VERSION.classify(response.status()) {
            Outcome::Success => {
                let body: VersionResponse = json(response).await?;
                Ok(body.version)
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Getting API version {}not authorized",
                    scope_context(self.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api("Error while getting API version", response).await),
        }
    }

    /// Look up the user owning this session's token.
    ///
    /// # Errors
    ///
    /// Returns [`FossologyError::Authentication`] if no user called
    /// `username` is visible with this token.
    #[tracing::instrument(skip(self))]
    pub async fn authenticate(&self, username: &str) -> Result<User> {
        let users = User::list(self).await?;
        let user = users
            .into_iter()
            .find(|u| u.name == username)
            .ok_or_else(|| {
                FossologyError::Authentication(format!(
                    "User {username} was not found on {}",
                    self.base_url
                ))
            })?;
        tracing::info!("Authenticated as {} ({})", user.name, user.id);
        Ok(user)
    }
}

/// Build the `/api/v1/` base from a server root URL.
pub(crate) fn api_url(server_url: &str) -> Result<Url> {
    // Ensure server URL ends with /
    let server_url = if server_url.ends_with('/') {
        server_url.to_string()
    } else {
        format!("{server_url}/")
    };

    Ok(Url::parse(&server_url)?.join(API_PATH)?)
}

/// Decode a JSON response body.
pub(crate) async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json().await.map_err(FossologyError::HttpError)
}

/// FOSSology `Info` body of a 201/202 answer. `message` carries the ID of
/// the new entity, either bare or at the end of a URL.
#[derive(Deserialize)]
pub(crate) struct Accepted {
    message: serde_json::Value,
}

impl Accepted {
    pub(crate) fn id(&self) -> Option<u64> {
        match &self.message {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().rsplit('/').next()?.parse().ok(),
            _ => None,
        }
    }
}

/// Render the group and folder context of a failed request, e.g.
/// `"for group qa in folder 3 "`. Empty when neither is set.
pub(crate) fn scope_context(group: Option<&str>, folder: Option<u64>) -> String {
    let mut context = String::new();
    if let Some(group) = group {
        context.push_str(&format!("for group {group} "));
    }
    if let Some(folder) = folder {
        context.push_str(&format!("in folder {folder} "));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = FossologyClient::new("test-token", "http://localhost/repo").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("FossologyClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = FossologyClient::new("token", "http://localhost/repo").unwrap();
        let client2 = FossologyClient::new("token", "http://localhost/repo/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
        assert_eq!(client1.base_url().as_str(), "http://localhost/repo/api/v1/");
    }

    #[test]
    fn test_for_group_does_not_touch_original() {
        let client = FossologyClient::new("token", "http://localhost/repo").unwrap();
        let scoped = client.for_group("qa");
        assert_eq!(scoped.group(), Some("qa"));
        assert_eq!(client.group(), None);
    }

    #[test]
    fn test_scope_context() {
        assert_eq!(scope_context(None, None), "");
        assert_eq!(scope_context(Some("test"), None), "for group test ");
        assert_eq!(scope_context(None, Some(3)), "in folder 3 ");
        assert_eq!(scope_context(Some("test"), Some(3)), "for group test in folder 3 ");
    }

    #[test]
    fn test_accepted_id() {
        let parse = |body: &str| serde_json::from_str::<Accepted>(body).unwrap().id();
        assert_eq!(parse(r#"{"code": 201, "message": 12, "type": "INFO"}"#), Some(12));
        assert_eq!(parse(r#"{"code": 201, "message": "12", "type": "INFO"}"#), Some(12));
        assert_eq!(
            parse(r#"{"code": 201, "message": "http://localhost/repo/api/v1/report/7", "type": "INFO"}"#),
            Some(7)
        );
        assert_eq!(parse(r#"{"code": 201, "message": "done", "type": "INFO"}"#), None);
    }

    #[test]
    fn test_invalid_server_url() {
        let result = FossologyClient::new("token", "not a url");
        assert!(matches!(result, Err(FossologyError::UrlError(_))));
    }
}
