//! Group model.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{json, scope_context, FossologyClient};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};

/// A FOSSology group. Uploads and folders are shared through groups;
/// [`FossologyClient::for_group`] scopes requests to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
}

impl Group {
    /// List the groups the client's user belongs to.
    ///
    /// # Errors
    ///
    /// Returns an API error if the server does not answer with 200.
    #[tracing::instrument(skip(client))]
    pub async fn list(client: &FossologyClient) -> Result<Vec<Group>> {
        let response = client.send(client.request(Method::GET, "groups")?).await?;

        match dispatch::LIST_GROUPS.classify(response.status()) {
            Outcome::Success => {
                let groups: Vec<Group> = json(response).await?;
                tracing::debug!("Got {} groups", groups.len());
                Ok(groups)
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!("Listing groups {}not authorized", scope_context(client.group(), None)),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Unable to get a list of groups from {}", client.base_url()),
                response,
            )
            .await),
        }
    }

    /// Create a group called `name`. Requires administrator rights.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any status
    /// other than 200, which includes a name that is already taken.
    #[tracing::instrument(skip(client))]
    pub async fn create(client: &FossologyClient, name: &str) -> Result<()> {
        let request = client.request(Method::POST, "groups")?.header("name", name);
        let response = client.send(request).await?;

        match dispatch::CREATE_GROUP.classify(response.status()) {
            Outcome::Success => {
                tracing::info!("Group {name} has been added");
                Ok(())
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Creating group {name} {}not authorized",
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!(
                    "Group {name} already exists, failed to create group or no group name provided"
                ),
                response,
            )
            .await),
        }
    }
}
