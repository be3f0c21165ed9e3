//! Upload summary model.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{json, scope_context, FossologyClient};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};
use crate::models::upload::Upload;
use crate::retry::{Attempt, Polled, RetryPolicy};

/// Clearing summary of a processed upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The upload ID.
    pub id: u64,

    /// The upload name.
    pub upload_name: String,

    /// Main license selected by a clearing expert.
    #[serde(default)]
    pub main_license: Option<String>,

    #[serde(default)]
    pub unique_licenses: u64,

    #[serde(default)]
    pub total_licenses: u64,

    #[serde(default)]
    pub unique_concluded_licenses: u64,

    #[serde(default)]
    pub total_concluded_licenses: u64,

    #[serde(default)]
    pub files_to_be_cleared: u64,

    #[serde(default)]
    pub files_cleared: u64,

    /// Clearing status (e.g. "Open", "InProgress", "Closed").
    #[serde(default)]
    pub clearing_status: Option<String>,

    #[serde(default)]
    pub copyright_count: u64,
}

async fn fetch_summary(client: &FossologyClient, upload: &Upload) -> Result<Attempt<Summary>> {
    let path = format!("uploads/{}/summary", upload.id);
    let response = client.send(client.request(Method::GET, &path)?).await?;

    match dispatch::UPLOAD_SUMMARY.classify(response.status()) {
        Outcome::Success => Ok(Attempt::Ready(json(response).await?)),
        Outcome::NotReady => {
            tracing::debug!("Summary of upload {} is not ready yet", upload.id);
            Ok(Attempt::NotReady)
        }
        Outcome::Forbidden => Err(FossologyError::unauthorized(
            format!(
                "Getting summary of upload {} {}not authorized",
                upload.id,
                scope_context(client.group(), None)
            ),
            response,
        )
        .await),
        Outcome::Rejected | Outcome::Unexpected => Err(FossologyError::api(
            format!("No summary for upload {} (id={})", upload.uploadname, upload.id),
            response,
        )
        .await),
    }
}

impl Upload {
    /// Get the clearing summary of this upload.
    ///
    /// Polls while the server answers 503 (scan still running), a few times
    /// with a short delay.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403, and an API error on any other
    /// failure or once the polling budget is spent.
    #[tracing::instrument(skip(self, client), fields(upload_id = self.id))]
    pub async fn summary(&self, client: &FossologyClient) -> Result<Summary> {
        let polled = RetryPolicy::ANALYSIS
            .run(client.sleeper(), |_| fetch_summary(client, self))
            .await?;

        match polled {
            Polled::Ready(summary) => Ok(summary),
            Polled::Exhausted { attempts } => Err(FossologyError::incomplete(format!(
                "Getting summary of upload {} could not be completed after {attempts} attempts",
                self.id
            ))),
        }
    }
}
