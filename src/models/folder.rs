//! Folder model.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{json, scope_context, Accepted, FossologyClient};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};
use crate::traits::Get;

/// A FOSSology folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: u64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Parent folder ID; absent for the root folder.
    #[serde(default)]
    pub parent: Option<u64>,
}

impl Folder {
    /// Reference a folder whose ID and name are already known.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            parent: None,
        }
    }

    /// List all folders visible to the client.
    ///
    /// # Errors
    ///
    /// Returns an API error if the server does not answer with 200.
    #[tracing::instrument(skip(client))]
    pub async fn list(client: &FossologyClient) -> Result<Vec<Folder>> {
        let response = client.send(client.request(Method::GET, "folders")?).await?;

        match dispatch::LIST_FOLDERS.classify(response.status()) {
            Outcome::Success => {
                let folders: Vec<Folder> = json(response).await?;
                tracing::debug!("Got {} folders", folders.len());
                Ok(folders)
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Listing folders {}not authorized",
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api("Unable to get a list of folders", response).await),
        }
    }

    /// Create a folder called `name` below `parent`.
    ///
    /// FOSSology answers 200 instead of 201 when `parent` already holds a
    /// folder with that name; the existing folder is returned in that case.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any other
    /// status than 200 or 201.
    #[tracing::instrument(skip(client, parent), fields(parent_id = parent.id))]
    pub async fn create(
        client: &FossologyClient,
        parent: &Folder,
        name: &str,
        description: Option<&str>,
    ) -> Result<Folder> {
        let mut request = client
            .request(Method::POST, "folders")?
            .header("parentFolder", parent.id.to_string())
            .header("folderName", name);
        if let Some(description) = description {
            request = request.header("folderDescription", description);
        }
        let response = client.send(request).await?;

        match dispatch::CREATE_FOLDER.classify(response.status()) {
            Outcome::Success => {
                let existed = response.status() == reqwest::StatusCode::OK;
                let accepted: Accepted = json(response).await?;
                let id = accepted.id().ok_or_else(|| {
                    FossologyError::incomplete(format!(
                        "Folder {name} was created without a folder id"
                    ))
                })?;
                if existed {
                    tracing::info!("Folder {name} already exists");
                } else {
                    tracing::info!("Folder {name} has been created");
                }
                Folder::get(client, id).await
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Folder creation {}not authorized",
                    scope_context(client.group(), Some(parent.id))
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Unable to create folder {name} under {}", parent.name),
                response,
            )
            .await),
        }
    }

    /// Rename this folder or change its description, returning the updated folder.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any status
    /// other than 200.
    #[tracing::instrument(skip(self, client), fields(folder_id = self.id))]
    pub async fn update(
        &self,
        client: &FossologyClient,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Folder> {
        let path = format!("folders/{}", self.id);
        let mut request = client.request(Method::PATCH, &path)?;
        if let Some(name) = name {
            request = request.header("name", name);
        }
        if let Some(description) = description {
            request = request.header("description", description);
        }
        let response = client.send(request).await?;

        match dispatch::UPDATE_FOLDER.classify(response.status()) {
            Outcome::Success => {
                tracing::info!("Folder {} has been updated", self.id);
                Folder::get(client, self.id).await
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Updating folder {} {}not authorized",
                    self.id,
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(format!("Unable to update folder {}", self.id), response).await),
        }
    }

    /// Delete this folder and everything in it.
    ///
    /// The server only schedules the deletion; it completes in the background.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any status
    /// other than 202.
    #[tracing::instrument(skip(self, client), fields(folder_id = self.id))]
    pub async fn delete(&self, client: &FossologyClient) -> Result<()> {
        let path = format!("folders/{}", self.id);
        let response = client.send(client.request(Method::DELETE, &path)?).await?;

        match dispatch::DELETE_FOLDER.classify(response.status()) {
            Outcome::Success => {
                tracing::info!("Folder {} has been scheduled for deletion", self.name);
                Ok(())
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Deleting folder {} {}not authorized",
                    self.id,
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(format!("Unable to delete folder {}", self.id), response).await),
        }
    }

    /// Move this folder below `parent`, returning the moved folder.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any status
    /// other than 202.
    pub async fn move_to(&self, client: &FossologyClient, parent: &Folder) -> Result<Folder> {
        self.put(client, FolderAction::Move, parent).await?;
        Folder::get(client, self.id).await
    }

    /// Copy this folder below `parent`.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any status
    /// other than 202.
    pub async fn copy_to(&self, client: &FossologyClient, parent: &Folder) -> Result<()> {
        self.put(client, FolderAction::Copy, parent).await
    }

    #[tracing::instrument(skip(self, client, parent), fields(folder_id = self.id, parent_id = parent.id))]
    async fn put(&self, client: &FossologyClient, action: FolderAction, parent: &Folder) -> Result<()> {
        let path = format!("folders/{}", self.id);
        let request = client
            .request(Method::PUT, &path)?
            .header("action", action.as_str())
            .header("parent", parent.id.to_string());
        let response = client.send(request).await?;

        let table = match action {
            FolderAction::Move => dispatch::MOVE_FOLDER,
            FolderAction::Copy => dispatch::COPY_FOLDER,
        };
        match table.classify(response.status()) {
            Outcome::Success => {
                tracing::info!(
                    "Folder {} has been {} to {}",
                    self.name,
                    action.past_tense(),
                    parent.name
                );
                Ok(())
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "{} folder {} {}not authorized",
                    action.gerund(),
                    self.id,
                    scope_context(client.group(), Some(parent.id))
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!(
                    "Unable to {} folder {} to {}",
                    action.as_str(),
                    self.name,
                    parent.name
                ),
                response,
            )
            .await),
        }
    }
}

/// The `action` header of PUT /folders/{id}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FolderAction {
    Move,
    Copy,
}

impl FolderAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Copy => "copy",
        }
    }

    fn gerund(self) -> &'static str {
        match self {
            Self::Move => "Moving",
            Self::Copy => "Copying",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Self::Move => "moved",
            Self::Copy => "copied",
        }
    }
}

#[async_trait]
impl Get for Folder {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &FossologyClient, id: u64) -> Result<Self> {
        let path = format!("folders/{id}");
        let response = client.send(client.request(Method::GET, &path)?).await?;

        match dispatch::DETAIL_FOLDER.classify(response.status()) {
            Outcome::Success => json(response).await,
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Getting details for folder {id} {}not authorized",
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Error while getting details for folder {id}"),
                response,
            )
            .await),
        }
    }
}
