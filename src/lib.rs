//! FOSSology API client library.
//!
//! A Rust library for the FOSSology REST API (`/api/v1`). Entity types
//! implement the [`Get`] and [`List`] traits where the server supports
//! those operations; everything else is an inherent method on the entity.
//!
//! # Quick Start
//!
//! ```no_run
//! use fossology::{FossologyClient, Folder, Get, LicenseQuery, Upload, UploadOptions, UploadSource};
//!
//! #[tokio::main]
//! async fn main() -> fossology::Result<()> {
//!     // Create client from environment variables
//!     let client = FossologyClient::from_env()?;
//!
//!     // Upload a local archive into the root folder
//!     let folder = Folder::get(&client, 1).await?;
//!     let source = UploadSource::File("sources.tar.gz".into());
//!     if let Some(upload) = Upload::create(&client, &folder, Some(source), &UploadOptions::default()).await? {
//!         let summary = upload.summary(&client).await?;
//!         println!("{}: {} files to clear", upload.uploadname, summary.files_to_be_cleared);
//!
//!         let findings = upload.licenses(&client, &LicenseQuery::default()).await?;
//!         println!("{} files with findings", findings.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Background processing
//!
//! FOSSology unpacks and scans uploads asynchronously. Until that is done,
//! detail, summary and license requests answer `503`. Those operations poll
//! with a fixed delay and a bounded number of attempts (see [`RetryPolicy`]).
//! Every other status is classified once, through the per-operation tables
//! in [`dispatch`].
//!
//! # Jobs and reports
//!
//! [`Job::schedule`] starts scanner agents on an upload and [`Job::wait`]
//! polls until they are done. Reports are requested with
//! [`Upload::generate_report`] and fetched with [`Report::download`]; both
//! wait while the report agent answers `503`.
//!
//! # Groups
//!
//! [`FossologyClient::for_group`] returns a client whose requests are sent
//! with the `groupName` header, so the same operations work on resources
//! owned by another group.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `FOSSOLOGY_TOKEN` (required) - Bearer token
//! - `FOSSOLOGY_API_URL` (optional) - Server root (defaults to `http://localhost/repo`)
//! - `FOSSOLOGY_GROUP` (optional) - Group to scope requests to

pub mod cli;
mod client;
pub mod dispatch;
mod error;
mod models;
mod output;
mod pagination;
mod retry;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{FossologyClient, DEFAULT_SERVER_URL, GROUP_HEADER};
pub use error::{FossologyError, ResponseDetails, Result};
pub use output::PrettyPrint;
pub use pagination::{Page, TOTAL_PAGES_HEADER};
pub use retry::{Attempt, Polled, RetryPolicy, Sleeper, TokioSleeper};

// Re-export traits
pub use traits::{Get, List, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    // Upload types
    Upload,
    UploadHash,
    UploadListQuery,
    // Creation types
    AccessLevel,
    UploadOptions,
    UploadSource,
    UrlSpec,
    VcsSpec,
    // Analysis results
    Findings,
    LicenseFinding,
    LicenseQuery,
    Summary,
    DEFAULT_AGENT,
    // Jobs and reports
    Analysis,
    Decider,
    Job,
    JobListQuery,
    JobSpec,
    JobStatus,
    Report,
    ReportFormat,
    Reuse,
    // Users, groups, folders and tokens
    Folder,
    Group,
    TokenRequest,
    TokenScope,
    User,
};

// Re-export convenience functions
pub use models::{generate_token, get_upload, get_uploads_page, schedule_jobs, upload_file};
