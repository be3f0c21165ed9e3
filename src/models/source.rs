//! Upload creation from a local file, a VCS repository or a URL.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use tokio_util::io::ReaderStream;
use serde::{Deserialize, Serialize};

use crate::client::{json, scope_context, Accepted, FossologyClient};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};
use crate::models::folder::Folder;
use crate::models::upload::{poll_detail, Upload, FOLDER_HEADER};
use crate::retry::Polled;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "fileInput";

/// Who may see an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Private,
    /// Visible to the groups the uploader belongs to (server default).
    #[default]
    Protected,
    Public,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Public => "public",
        }
    }
}

/// A repository to check out on the server side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcsSpec {
    /// "git" or "svn".
    pub vcs_type: String,
    pub vcs_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcs_branch: Option<String>,
    /// Name of the resulting upload.
    pub vcs_name: String,
    #[serde(default)]
    pub vcs_username: String,
    #[serde(default)]
    pub vcs_password: String,
}

/// A URL the server should fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlSpec {
    pub url: String,
    /// Name of the resulting upload.
    pub name: String,
    /// Comma-separated list of accepted file suffixes.
    #[serde(default)]
    pub accept: String,
    /// Comma-separated list of rejected file suffixes.
    #[serde(default)]
    pub reject: String,
    #[serde(default)]
    pub max_recursion_depth: u32,
}

/// Where the content of a new upload comes from.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// A local file sent as multipart body.
    File(PathBuf),
    Vcs(VcsSpec),
    Url(UrlSpec),
}

impl UploadSource {
    /// Value of the `uploadType` header.
    fn upload_type(&self) -> &'static str {
        match self {
            Self::File(_) => "server",
            Self::Vcs(_) => "vcs",
            Self::Url(_) => "url",
        }
    }

    /// Human-readable name used in logs and errors.
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Vcs(vcs) => vcs.vcs_name.clone(),
            Self::Url(url) => url.name.clone(),
        }
    }
}

/// Optional settings for a new upload.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub description: Option<String>,
    /// Omitted from the request when `None` or `Protected`.
    pub access_level: Option<AccessLevel>,
    /// Skip SCM metadata (e.g. `.git`) while scanning.
    pub ignore_scm: bool,
}

/// Open `path` as a streamed multipart part. The file is read while the
/// request body is sent, never buffered whole.
async fn file_part(path: &Path) -> Result<Part> {
    let io_error = |source| FossologyError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = tokio::fs::File::open(path).await.map_err(io_error)?;
    let length = file.metadata().await.map_err(io_error)?.len();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let body = Body::wrap_stream(ReaderStream::new(file));
    Ok(Part::stream_with_length(body, length).file_name(file_name))
}

impl Upload {
    /// Create a new upload in `folder` and wait until the server has unpacked it.
    ///
    /// Returns `Ok(None)` without contacting the server when `source` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403, an API error on any other
    /// status than 201, and an API error if the new upload never becomes
    /// available.
    #[tracing::instrument(skip(client, folder, source, options), fields(folder_id = folder.id))]
    pub async fn create(
        client: &FossologyClient,
        folder: &Folder,
        source: Option<UploadSource>,
        options: &UploadOptions,
    ) -> Result<Option<Upload>> {
        let Some(source) = source else {
            tracing::warn!("Neither VCS, nor URL nor file given, not uploading anything");
            return Ok(None);
        };
        let label = source.label();

        let mut request = client
            .request(Method::POST, "uploads")?
            .header(FOLDER_HEADER, folder.id.to_string())
            .header("uploadType", source.upload_type());
        if let Some(description) = &options.description {
            request = request.header("uploadDescription", description);
        }
        if let Some(level) = options.access_level.filter(|l| *l != AccessLevel::Protected) {
            request = request.header("public", level.as_str());
        }
        if options.ignore_scm {
            request = request.header("ignoreScm", "true");
        }
        request = match &source {
            UploadSource::File(path) => {
                request.multipart(Form::new().part(FILE_FIELD, file_part(path).await?))
            }
            UploadSource::Vcs(vcs) => request.json(vcs),
            UploadSource::Url(url) => request.json(url),
        };

        let response = client.send(request).await?;
        let upload_id = match dispatch::CREATE_UPLOAD.classify(response.status()) {
            Outcome::Success => {
                let accepted: Accepted = json(response).await?;
                accepted.id().ok_or_else(|| {
                    FossologyError::incomplete(format!(
                        "Upload of {label} was accepted without an upload id"
                    ))
                })?
            }
            Outcome::Forbidden => {
                return Err(FossologyError::unauthorized(
                    format!(
                        "Upload of {label} {}not authorized",
                        scope_context(client.group(), Some(folder.id))
                    ),
                    response,
                )
                .await)
            }
            _ => {
                let description = options.description.as_deref().unwrap_or(&label);
                return Err(FossologyError::api(
                    format!("Upload {description} could not be performed"),
                    response,
                )
                .await);
            }
        };

        match poll_detail(client, upload_id).await? {
            Polled::Ready(upload) => {
                match upload.size() {
                    Some(size) => tracing::info!(
                        "Upload {} ({size} bytes) has been uploaded on {}",
                        upload.uploadname,
                        upload.uploaddate.as_deref().unwrap_or("unknown date")
                    ),
                    None => tracing::info!(
                        "Upload {} has been uploaded on {}",
                        upload.uploadname,
                        upload.uploaddate.as_deref().unwrap_or("unknown date")
                    ),
                }
                Ok(Some(upload))
            }
            Polled::Exhausted { .. } => {
                Err(FossologyError::incomplete(format!("Upload of {label} failed")))
            }
        }
    }
}

/// Create a new upload; see [`Upload::create`].
///
/// # Example
///
/// ```ignore
/// use fossology::{upload_file, FossologyClient, Folder, UploadOptions, UploadSource};
///
/// let client = FossologyClient::from_env()?;
/// let folder = Folder::new(1, "Software Repository");
/// let source = UploadSource::File("sources.zip".into());
/// let upload = upload_file(&client, &folder, Some(source), &UploadOptions::default()).await?;
/// ```
pub async fn upload_file(
    client: &FossologyClient,
    folder: &Folder,
    source: Option<UploadSource>,
    options: &UploadOptions,
) -> Result<Option<Upload>> {
    Upload::create(client, folder, source, options).await
}
