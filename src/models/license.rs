//! License findings of an upload.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{json, scope_context, FossologyClient};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};
use crate::models::upload::Upload;
use crate::retry::{Attempt, Polled, RetryPolicy};

/// Scanner agent queried when none is named.
pub const DEFAULT_AGENT: &str = "nomos";

/// Licenses found in a single file of an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseFinding {
    /// Path of the file inside the upload.
    #[serde(rename = "filePath")]
    pub file_path: String,

    #[serde(default)]
    pub findings: Findings,
}

/// Scanner and clearing results for one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Findings {
    /// Licenses reported by the scanner agent.
    #[serde(default)]
    pub scanner: Option<Vec<String>>,

    /// Licenses concluded by a clearing expert.
    #[serde(default)]
    pub conclusion: Option<Vec<String>>,
}

impl LicenseFinding {
    /// Scanner results, empty when the agent found nothing.
    pub fn scanner(&self) -> &[String] {
        self.findings.scanner.as_deref().unwrap_or_default()
    }

    /// Concluded licenses, empty when nothing was concluded.
    pub fn conclusion(&self) -> &[String] {
        self.findings.conclusion.as_deref().unwrap_or_default()
    }
}

/// Options for [`Upload::licenses`].
#[derive(Debug, Clone, Default)]
pub struct LicenseQuery {
    /// Scanner agent to report on (defaults to `nomos`).
    pub agent: Option<String>,

    /// Also list findings for container entries (archives, directories).
    pub containers: bool,
}

impl LicenseQuery {
    /// Findings of a specific agent.
    #[must_use]
    pub fn agent(agent: impl Into<String>) -> Self {
        Self {
            agent: Some(agent.into()),
            containers: false,
        }
    }

    fn agent_name(&self) -> &str {
        self.agent.as_deref().unwrap_or(DEFAULT_AGENT)
    }
}

#[derive(Serialize)]
struct LicenseParams<'a> {
    agent: &'a str,
    #[serde(skip_serializing_if = "is_false")]
    containers: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

async fn fetch_licenses(
    client: &FossologyClient,
    upload: &Upload,
    query: &LicenseQuery,
) -> Result<Attempt<Vec<LicenseFinding>>> {
    let path = format!("uploads/{}/licenses", upload.id);
    let params = LicenseParams {
        agent: query.agent_name(),
        containers: query.containers,
    };
    let response = client
        .send(client.request(Method::GET, &path)?.query(&params))
        .await?;

    match dispatch::UPLOAD_LICENSES.classify(response.status()) {
        Outcome::Success => Ok(Attempt::Ready(json(response).await?)),
        Outcome::NotReady => {
            tracing::debug!(
                "License scan of upload {} by {} is not finished yet",
                upload.id,
                params.agent
            );
            Ok(Attempt::NotReady)
        }
        Outcome::Forbidden => Err(FossologyError::unauthorized(
            format!(
                "Getting license for upload {} {}not authorized",
                upload.id,
                scope_context(client.group(), None)
            ),
            response,
        )
        .await),
        Outcome::Rejected => Err(FossologyError::api(
            format!(
                "Unable to get licenses from {} for {} (id={})",
                params.agent, upload.uploadname, upload.id
            ),
            response,
        )
        .await),
        Outcome::Unexpected => Err(FossologyError::api(
            format!("No licenses for upload {} (id={})", upload.uploadname, upload.id),
            response,
        )
        .await),
    }
}

impl Upload {
    /// Get the per-file license findings of this upload.
    ///
    /// # Errors
    ///
    /// Returns an API error when the agent has not been run on the upload
    /// (412), an authorization error on 403, and an API error on any other
    /// failure or once the polling budget is spent.
    #[tracing::instrument(skip(self, client), fields(upload_id = self.id))]
    pub async fn licenses(
        &self,
        client: &FossologyClient,
        query: &LicenseQuery,
    ) -> Result<Vec<LicenseFinding>> {
        let polled = RetryPolicy::ANALYSIS
            .run(client.sleeper(), |_| fetch_licenses(client, self, query))
            .await?;

        match polled {
            Polled::Ready(findings) => Ok(findings),
            Polled::Exhausted { attempts } => Err(FossologyError::incomplete(format!(
                "Getting licenses of upload {} could not be completed after {attempts} attempts",
                self.id
            ))),
        }
    }
}
