//! User model.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{json, scope_context, FossologyClient};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};
use crate::traits::Get;

/// A FOSSology user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Only visible to administrators.
    #[serde(default)]
    pub email: Option<String>,

    /// e.g. "read_write", "admin".
    #[serde(default)]
    pub access_level: Option<String>,

    #[serde(default)]
    pub root_folder_id: Option<u64>,

    #[serde(default)]
    pub email_notification: Option<bool>,

    /// Default agents scheduled for this user's uploads.
    #[serde(default)]
    pub agents: Option<serde_json::Value>,
}

impl User {
    /// List all users visible to the client.
    ///
    /// # Errors
    ///
    /// Returns an API error if the server does not answer with 200.
    #[tracing::instrument(skip(client))]
    pub async fn list(client: &FossologyClient) -> Result<Vec<User>> {
        let response = client.send(client.request(Method::GET, "users")?).await?;

        match dispatch::LIST_USERS.classify(response.status()) {
            Outcome::Success => json(response).await,
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!("Listing users {}not authorized", scope_context(client.group(), None)),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Unable to get a list of users from {}", client.base_url()),
                response,
            )
            .await),
        }
    }

    /// Delete this user. Requires administrator rights.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any status
    /// other than 202.
    #[tracing::instrument(skip(self, client), fields(user_id = self.id))]
    pub async fn delete(&self, client: &FossologyClient) -> Result<()> {
        let path = format!("users/{}", self.id);
        let response = client.send(client.request(Method::DELETE, &path)?).await?;

        match dispatch::DELETE_USER.classify(response.status()) {
            Outcome::Success => {
                tracing::info!("User {} ({}) has been deleted", self.name, self.id);
                Ok(())
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Deleting user {} ({}) {}not authorized",
                    self.name,
                    self.id,
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Error while deleting user {} ({})", self.name, self.id),
                response,
            )
            .await),
        }
    }
}

#[async_trait]
impl Get for User {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &FossologyClient, id: u64) -> Result<Self> {
        let path = format!("users/{id}");
        let response = client.send(client.request(Method::GET, &path)?).await?;

        match dispatch::DETAIL_USER.classify(response.status()) {
            Outcome::Success => json(response).await,
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Getting details for user {id} {}not authorized",
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Error while getting details for user {id}"),
                response,
            )
            .await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserialize() {
        let json = r#"{
            "id": 3,
            "name": "fossy",
            "description": "super user",
            "email": "fossy@localhost",
            "accessLevel": "admin",
            "rootFolderId": 1,
            "emailNotification": true,
            "agents": {"bucket": true, "copyright_email_author": true, "nomos": true}
        }"#;

        let user: User = serde_json::from_str(json).expect("Failed to deserialize user");

        assert_eq!(user.id, 3);
        assert_eq!(user.name, "fossy");
        assert_eq!(user.access_level.as_deref(), Some("admin"));
        assert_eq!(user.root_folder_id, Some(1));
    }

    #[test]
    fn test_user_deserialize_non_admin_view() {
        let json = r#"{"id": 4, "name": "reader", "description": ""}"#;

        let user: User = serde_json::from_str(json).expect("Failed to deserialize user");

        assert!(user.email.is_none());
        assert!(user.agents.is_none());
    }
}
