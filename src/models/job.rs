//! Job model and agent scheduling.
//!
//! Every upload gets an unpack job when it is created. Scanners, deciders
//! and reuse run as further jobs, scheduled with [`Job::schedule`]; summary
//! and license data only become available once those have completed.

use std::fmt;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};

use crate::client::{json, scope_context, Accepted, FossologyClient};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};
use crate::models::folder::Folder;
use crate::models::upload::{Upload, FOLDER_HEADER};
use crate::pagination::{self, Page};
use crate::retry::{Attempt, Polled, RetryPolicy};
use crate::traits::{Get, List};

/// A FOSSology job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: u64,

    /// Usually the name of the upload the job runs on.
    pub name: String,

    #[serde(default)]
    pub queue_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_id")]
    pub upload_id: Option<u64>,

    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<u64>,

    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: Option<u64>,

    /// Estimated seconds until completion.
    #[serde(default)]
    pub eta: Option<u64>,

    pub status: JobStatus,
}

/// Older servers send numeric job fields as strings.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Number(n)) => Some(n),
        Some(Id::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Whether the job will not change state anymore.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Job '{}' ({}) queued on {} (Status: {:?} ETA: {})",
            self.name,
            self.id,
            self.queue_date.as_deref().unwrap_or("unknown date"),
            self.status,
            self.eta.unwrap_or_default()
        )
    }
}

/// Agents to schedule on an upload, sent as the body of POST /jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub analysis: Analysis,
    pub decider: Decider,
    pub reuse: Reuse,
}

/// Scanner agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub bucket: bool,
    pub copyright_email_author: bool,
    pub ecc: bool,
    pub keyword: bool,
    pub mime: bool,
    pub monk: bool,
    pub nomos: bool,
    pub ojo: bool,
    pub package: bool,
}

/// Automatic clearing decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decider {
    pub nomos_monk: bool,
    pub bulk_reused: bool,
    pub new_scanner: bool,
    pub ojo_decider: bool,
}

/// Reuse of clearing decisions from an earlier upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reuse {
    /// Upload to reuse decisions from; 0 for none.
    pub reuse_upload: u64,
    /// Group owning `reuse_upload`.
    pub reuse_group: u64,
    pub reuse_main: bool,
    pub reuse_enhanced: bool,
    pub reuse_report: bool,
    pub reuse_copyright: bool,
}

impl JobSpec {
    /// The license scanners (nomos, monk, ojo) and their deciders.
    pub fn license_scan() -> Self {
        Self {
            analysis: Analysis {
                monk: true,
                nomos: true,
                ojo: true,
                ..Default::default()
            },
            decider: Decider {
                nomos_monk: true,
                ojo_decider: true,
                ..Default::default()
            },
            reuse: Reuse::default(),
        }
    }
}

/// Query parameters for listing jobs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobListQuery {
    /// Only list jobs of this upload.
    #[serde(rename = "upload", skip_serializing_if = "Option::is_none")]
    pub upload: Option<u64>,
}

impl JobListQuery {
    /// Jobs that ran on `upload`.
    #[must_use]
    pub fn for_upload(upload: &Upload) -> Self {
        Self {
            upload: Some(upload.id),
        }
    }
}

impl Job {
    /// Schedule the agents of `spec` on `upload`, which lives in `folder`.
    ///
    /// Returns the new job as the server reports it right after scheduling;
    /// use [`Job::wait`] to block until it has finished.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403 and an API error on any other
    /// status than 201.
    #[tracing::instrument(skip(client, folder, upload, spec), fields(folder_id = folder.id, upload_id = upload.id))]
    pub async fn schedule(
        client: &FossologyClient,
        folder: &Folder,
        upload: &Upload,
        spec: &JobSpec,
    ) -> Result<Job> {
        let request = client
            .request(Method::POST, "jobs")?
            .header(FOLDER_HEADER, folder.id.to_string())
            .header("uploadId", upload.id.to_string())
            .json(spec);
        let response = client.send(request).await?;

        match dispatch::SCHEDULE_JOBS.classify(response.status()) {
            Outcome::Success => {
                let accepted: Accepted = json(response).await?;
                let id = accepted.id().ok_or_else(|| {
                    FossologyError::incomplete(format!(
                        "Jobs for upload {} were scheduled without a job id",
                        upload.uploadname
                    ))
                })?;
                tracing::info!("Job {id} has been scheduled for upload {}", upload.uploadname);
                Job::get(client, id).await
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Scheduling job {}not authorized",
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Scheduling jobs for upload {} failed", upload.uploadname),
                response,
            )
            .await),
        }
    }

    /// Poll job `id` with `policy` until it is completed or failed.
    ///
    /// # Errors
    ///
    /// Returns an API error if the job is still running after the last
    /// attempt, plus any error of [`Job::get`].
    #[tracing::instrument(skip(client))]
    pub async fn wait(client: &FossologyClient, id: u64, policy: RetryPolicy) -> Result<Job> {
        let polled = policy.run(client.sleeper(), |_| poll_job(client, id)).await?;

        match polled {
            Polled::Ready(job) => Ok(job),
            Polled::Exhausted { attempts } => Err(FossologyError::incomplete(format!(
                "Job {id} did not finish after {attempts} attempts"
            ))),
        }
    }
}

/// Fetch a job once, reporting an unfinished one as "not ready".
async fn poll_job(client: &FossologyClient, id: u64) -> Result<Attempt<Job>> {
    let job = Job::get(client, id).await?;
    if job.status.is_finished() {
        Ok(Attempt::Ready(job))
    } else {
        tracing::debug!("Job {id} is {:?}, ETA {:?}s", job.status, job.eta);
        Ok(Attempt::NotReady)
    }
}

#[async_trait]
impl Get for Job {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &FossologyClient, id: u64) -> Result<Self> {
        let path = format!("jobs/{id}");
        let response = client.send(client.request(Method::GET, &path)?).await?;

        match dispatch::DETAIL_JOB.classify(response.status()) {
            Outcome::Success => json(response).await,
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Getting details for job {id} {}not authorized",
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api(
                format!("Error while getting details for job {id}"),
                response,
            )
            .await),
        }
    }
}

#[async_trait]
impl List for Job {
    type Query = JobListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &FossologyClient,
        query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>> {
        let request = client
            .request(Method::GET, "jobs")?
            .query(query)
            .header("limit", count.to_string())
            .header("page", page.to_string());
        let response = client.send(request).await?;

        match dispatch::LIST_JOBS.classify(response.status()) {
            Outcome::Success => {
                let total = pagination::total_pages(response.headers());
                let jobs: Vec<Job> = json(response).await?;
                tracing::debug!("Retrieved page {page} of jobs, {} jobs on it", jobs.len());
                Ok(Page::new(jobs, page, count, total))
            }
            Outcome::Forbidden => Err(FossologyError::unauthorized(
                format!(
                    "Getting the list of jobs {}not authorized",
                    scope_context(client.group(), None)
                ),
                response,
            )
            .await),
            _ => Err(FossologyError::api("Getting the list of jobs failed", response).await),
        }
    }
}

/// Schedule agents on an upload; see [`Job::schedule`].
pub async fn schedule_jobs(
    client: &FossologyClient,
    folder: &Folder,
    upload: &Upload,
    spec: &JobSpec,
) -> Result<Job> {
    Job::schedule(client, folder, upload, spec).await
}
