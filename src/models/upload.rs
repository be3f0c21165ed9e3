//! Upload model and trait implementations.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{json, scope_context, FossologyClient};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};
use crate::models::folder::Folder;
use crate::pagination::{self, Page};
use crate::retry::{Attempt, Polled, RetryPolicy};
use crate::traits::{Get, List};

/// Header naming the destination or source folder of a request.
pub(crate) const FOLDER_HEADER: &str = "folderId";

/// A FOSSology upload.
///
/// An upload is an artifact (archive, VCS checkout or fetched URL) that the
/// server unpacks and scans in the background. Every value returned by this
/// crate is a snapshot; fetch it again to observe server-side changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upload {
    /// The upload ID.
    pub id: u64,

    /// The upload name (usually the file, VCS or URL target name).
    pub uploadname: String,

    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// When the upload was created, as reported by the server.
    #[serde(default)]
    pub uploaddate: Option<String>,

    /// ID of the folder holding the upload.
    #[serde(default)]
    pub folderid: Option<u64>,

    /// Name of the folder holding the upload.
    #[serde(default)]
    pub foldername: Option<String>,

    /// Content hashes and size (servers newer than 1.0.16).
    #[serde(default)]
    pub hash: Option<UploadHash>,

    /// File size in bytes (servers up to 1.0.16).
    #[serde(default)]
    pub filesize: Option<u64>,

    /// SHA1 of the uploaded file (servers up to 1.0.16).
    #[serde(default)]
    pub filesha1: Option<String>,
}

/// Content hashes of an uploaded file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadHash {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

impl Upload {
    /// File size in bytes, whichever server generation reported it.
    pub fn size(&self) -> Option<u64> {
        self.hash
            .as_ref()
            .and_then(|h| h.size)
            .or(self.filesize)
    }

    /// SHA1 of the uploaded file, whichever server generation reported it.
    pub fn sha1(&self) -> Option<&str> {
        self.hash
            .as_ref()
            .and_then(|h| h.sha1.as_deref())
            .or(self.filesha1.as_deref())
    }

    /// Delete this upload.
    ///
    /// The server only schedules the deletion; it completes in the background.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any status
    /// other than 202.
    #[tracing::instrument(skip(self, client), fields(upload_id = self.id))]
    pub async fn delete(&self, client: &FossologyClient) -> Result<()> {
        let path = format!("uploads/{}", self.id);
        let response = client.send(client.request(Method::DELETE, &path)?).await?;

        match dispatch::DELETE_UPLOAD.classify(response.status()) {
            Outcome::Success => {
                tracing::info!("Upload {} has been scheduled for deletion", self.id);
                Ok(())
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Deleting upload {} {}not authorized",
                    self.id,
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(format!("Unable to delete upload {}", self.id), response).await),
        }
    }

    /// Move this upload to another folder.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any status
    /// other than 202.
    #[tracing::instrument(skip(self, client, folder), fields(upload_id = self.id, folder_id = folder.id))]
    pub async fn move_to(&self, client: &FossologyClient, folder: &Folder) -> Result<()> {
        let path = format!("uploads/{}", self.id);
        let request = client
            .request(Method::PATCH, &path)?
            .header(FOLDER_HEADER, folder.id.to_string());
        let response = client.send(request).await?;

        match dispatch::MOVE_UPLOAD.classify(response.status()) {
            Outcome::Success => {
                tracing::info!("Upload {} has been moved to {}", self.uploadname, folder.name);
                Ok(())
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Moving upload {} {}not authorized",
                    self.id,
                    scope_context(client.group(), Some(folder.id))
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Unable to move upload {} to {}", self.uploadname, folder.name),
                response,
            )
            .await),
        }
    }

    /// Copy this upload into another folder.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any status
    /// other than 202.
    #[tracing::instrument(skip(self, client, folder), fields(upload_id = self.id, folder_id = folder.id))]
    pub async fn copy_to(&self, client: &FossologyClient, folder: &Folder) -> Result<()> {
        let path = format!("uploads/{}", self.id);
        let request = client
            .request(Method::PUT, &path)?
            .header(FOLDER_HEADER, folder.id.to_string());
        let response = client.send(request).await?;

        match dispatch::COPY_UPLOAD.classify(response.status()) {
            Outcome::Success => {
                tracing::info!("Upload {} has been copied to {}", self.uploadname, folder.name);
                Ok(())
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Copy upload {} {}not authorized",
                    self.id,
                    scope_context(client.group(), Some(folder.id))
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Unable to copy upload {} to {}", self.uploadname, folder.name),
                response,
            )
            .await),
        }
    }
}

/// Query parameters for listing uploads.
#[derive(Debug, Clone, Serialize)]
pub struct UploadListQuery {
    /// Only list uploads from this folder.
    #[serde(rename = "folderId", skip_serializing_if = "Option::is_none")]
    pub folder: Option<u64>,

    /// Include uploads from child folders (the server default).
    #[serde(skip_serializing_if = "is_true")]
    pub recursive: bool,
}

impl Default for UploadListQuery {
    fn default() -> Self {
        Self {
            folder: None,
            recursive: true,
        }
    }
}

impl UploadListQuery {
    /// Uploads directly inside `folder`, without descending into children.
    #[must_use]
    pub fn in_folder(folder: &Folder) -> Self {
        Self {
            folder: Some(folder.id),
            recursive: false,
        }
    }
}

fn is_true(value: &bool) -> bool {
    *value
}

/// Fetch an upload once, reporting 503 as "not ready".
async fn fetch_detail(client: &FossologyClient, id: u64) -> Result<Attempt<Upload>> {
    let path = format!("uploads/{id}");
    let response = client.send(client.request(Method::GET, &path)?).await?;

    match dispatch::DETAIL_UPLOAD.classify(response.status()) {
        Outcome::Success => {
            tracing::debug!("Got details for upload {id}");
            Ok(Attempt::Ready(json(response).await?))
        }
        Outcome::NotReady => {
            tracing::debug!("Unpack agent for {id} didn't start yet, is the scheduler running?");
            Ok(Attempt::NotReady)
        }
        Outcome::Forbidden => Err(FossologyError::unauthorized(
            format!(
                "Getting details for upload {id} {}not authorized",
                scope_context(client.group(), None)
            ),
            response,
        )
        .await),
        Outcome::Rejected | Outcome::Unexpected => Err(FossologyError::api(
            format!("Error while getting details for upload {id}"),
            response,
        )
        .await),
    }
}

/// Poll the upload detail endpoint until the unpack agent has finished.
pub(crate) async fn poll_detail(client: &FossologyClient, id: u64) -> Result<Polled<Upload>> {
    RetryPolicy::UNPACK
        .run(client.sleeper(), |_| fetch_detail(client, id))
        .await
}

#[async_trait]
impl Get for Upload {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &FossologyClient, id: u64) -> Result<Self> {
        match poll_detail(client, id).await? {
            Polled::Ready(upload) => Ok(upload),
            Polled::Exhausted { attempts } => Err(FossologyError::incomplete(format!(
                "Getting details for upload {id} could not be completed after {attempts} attempts"
            ))),
        }
    }
}

#[async_trait]
impl List for Upload {
    type Query = UploadListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &FossologyClient,
        query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>> {
        let request = client
            .request(Method::GET, "uploads")?
            .query(query)
            .header("limit", count.to_string())
            .header("page", page.to_string());
        let response = client.send(request).await?;

        match dispatch::LIST_UPLOADS.classify(response.status()) {
            Outcome::Success => {
                let total = pagination::total_pages(response.headers());
                let uploads: Vec<Upload> = json(response).await?;
                tracing::info!(
                    "Retrieved page {page} of uploads, {} pages are in total available",
                    total.map_or_else(|| "Unknown".to_string(), |t| t.to_string())
                );
                Ok(Page::new(uploads, page, count, total))
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Retrieving list of uploads {}not authorized",
                    scope_context(client.group(), query.folder)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api("Unable to retrieve the list of uploads", response).await),
        }
    }
}

// Convenience functions for working with uploads

/// Get a single upload by ID, waiting for the unpack agent if needed.
///
/// # Example
///
/// ```ignore
/// use fossology::{FossologyClient, get_upload};
///
/// let client = FossologyClient::from_env()?;
/// let upload = get_upload(&client, 42).await?;
/// println!("{} ({:?} bytes)", upload.uploadname, upload.size());
/// ```
pub async fn get_upload(client: &FossologyClient, id: u64) -> Result<Upload> {
    Upload::get(client, id).await
}

/// Fetch a single page of uploads.
///
/// # Arguments
///
/// * `client` - The FOSSology API client
/// * `query` - Folder scoping and recursion
/// * `page` - Page number (1-indexed)
/// * `count` - Number of uploads per page
pub async fn get_uploads_page(
    client: &FossologyClient,
    query: UploadListQuery,
    page: u32,
    count: u32,
) -> Result<Page<Upload>> {
    Upload::list_page(client, &query, page, count).await
}
