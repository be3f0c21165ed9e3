//! Report generation and download.

use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};

use crate::client::{json, scope_context, Accepted, FossologyClient};
use crate::dispatch::{self, Outcome};
use crate::error::{FossologyError, Result};
use crate::models::upload::Upload;
use crate::retry::{Attempt, Polled, RetryPolicy};

/// Report formats the server can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Dep5,
    Spdx2,
    Spdx2tv,
    #[default]
    Readmeoss,
    Unifiedreport,
}

impl ReportFormat {
    /// Value of the `reportFormat` header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dep5 => "dep5",
            Self::Spdx2 => "spdx2",
            Self::Spdx2tv => "spdx2tv",
            Self::Readmeoss => "readmeoss",
            Self::Unifiedreport => "unifiedreport",
        }
    }
}

/// A downloaded report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: u64,
    /// File name suggested by the server.
    pub name: String,
    pub content: Vec<u8>,
}

impl Report {
    /// The report content, if it is valid UTF-8 (all formats except the
    /// unified report are text).
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// Download report `id`, waiting while the report agent is still running.
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403, an API error on any other
    /// status than 200, and an API error if the report never becomes ready.
    #[tracing::instrument(skip(client))]
    pub async fn download(client: &FossologyClient, id: u64) -> Result<Report> {
        let polled = RetryPolicy::REPORT
            .run(client.sleeper(), |_| fetch_report(client, id))
            .await?;

        match polled {
            Polled::Ready(report) => {
                tracing::info!("Downloaded report {} ({} bytes)", report.name, report.content.len());
                Ok(report)
            }
            Polled::Exhausted { attempts } => Err(FossologyError::incomplete(format!(
                "Download of report {id} could not be completed after {attempts} attempts"
            ))),
        }
    }
}

async fn fetch_report(client: &FossologyClient, id: u64) -> Result<Attempt<Report>> {
    let path = format!("report/{id}");
    let request = client
        .request(Method::GET, &path)?
        .header(reqwest::header::ACCEPT, "text/plain");
    let response = client.send(request).await?;

    match dispatch::DOWNLOAD_REPORT.classify(response.status()) {
        Outcome::Success => {
            let name = attachment_name(&response).unwrap_or_else(|| format!("report-{id}"));
            let content = response.bytes().await?.to_vec();
            Ok(Attempt::Ready(Report { id, name, content }))
        }
        Outcome::NotReady => {
            tracing::debug!("Report {id} is not ready yet");
            Ok(Attempt::NotReady)
        }
        Outcome::Forbidden => Err(FossologyError::unauthorized(
            format!(
                "Getting report {id} {}not authorized",
                scope_context(client.group(), None)
            ),
            response,
        )
        .await),
        Outcome::Rejected | Outcome::Unexpected => {
            Err(FossologyError::api(format!("Download of report {id} failed"), response).await)
        }
    }
}

/// File name from a `Content-Disposition: attachment; filename="..."` header.
fn attachment_name(response: &Response) -> Option<String> {
    let value = response.headers().get(CONTENT_DISPOSITION)?.to_str().ok()?;
    parse_filename(value)
}

fn parse_filename(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

async fn request_report(
    client: &FossologyClient,
    upload: &Upload,
    format: ReportFormat,
) -> Result<Attempt<u64>> {
    let request = client
        .request(Method::GET, "report")?
        .header("uploadId", upload.id.to_string())
        .header("reportFormat", format.as_str());
    let response = client.send(request).await?;

    match dispatch::GENERATE_REPORT.classify(response.status()) {
        Outcome::Success => {
            let accepted: Accepted = json(response).await?;
            let id = accepted.id().ok_or_else(|| {
                FossologyError::incomplete(format!(
                    "Report generation for upload {} returned no report id",
                    upload.uploadname
                ))
            })?;
            Ok(Attempt::Ready(id))
        }
        Outcome::NotReady => {
            tracing::debug!("Report agent busy, upload {} has to wait", upload.id);
            Ok(Attempt::NotReady)
        }
        Outcome::Forbidden => Err(FossologyError::unauthorized(
            format!(
                "Generating report for upload {} {}not authorized",
                upload.id,
                scope_context(client.group(), None)
            ),
            response,
        )
        .await),
        Outcome::Rejected | Outcome::Unexpected => Err(FossologyError::api(
            format!("Report generation for upload {} failed", upload.uploadname),
            response,
        )
        .await),
    }
}

impl Upload {
    /// Ask the server to generate a report in `format` and return the report ID.
    ///
    /// Generation runs in the background; pass the ID to [`Report::download`].
    ///
    /// # Errors
    ///
    /// Returns an authorization error on 403, an API error on any other
    /// status than 201, and an API error if the report agent stays busy.
    #[tracing::instrument(skip(self, client), fields(upload_id = self.id))]
    pub async fn generate_report(&self, client: &FossologyClient, format: ReportFormat) -> Result<u64> {
        let polled = RetryPolicy::REPORT
            .run(client.sleeper(), |_| request_report(client, self, format))
            .await?;

        match polled {
            Polled::Ready(id) => {
                tracing::info!("Report {id} for upload {} has been requested", self.uploadname);
                Ok(id)
            }
            Polled::Exhausted { attempts } => Err(FossologyError::incomplete(format!(
                "Report generation for upload {} could not be completed after {attempts} attempts",
                self.uploadname
            ))),
        }
    }
}
