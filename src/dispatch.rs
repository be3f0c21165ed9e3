//! Declarative status-code dispatch.
//!
//! Each endpoint operation owns a [`StatusTable`] that maps the HTTP status
//! of a response to an [`Outcome`]. Request construction and response
//! handling stay separate, so the mapping can be audited and tested on its own.

use reqwest::StatusCode;

/// What an operation should do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation-specific success code.
    Success,
    /// 403: the user may not access the resource in this scope.
    Forbidden,
    /// Background processing has not finished; poll again.
    NotReady,
    /// A status the operation reports with its own hard-failure message.
    Rejected,
    /// Anything else.
    Unexpected,
}

/// Status → outcome mapping for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTable {
    success: u16,
    also_success: Option<u16>,
    not_ready: Option<u16>,
    rejected: Option<u16>,
}

impl StatusTable {
    /// A table where `success` is the only accepted status.
    pub const fn expect(success: u16) -> Self {
        Self {
            success,
            also_success: None,
            not_ready: None,
            rejected: None,
        }
    }

    /// Accept `status` as a second success code.
    pub const fn or(mut self, status: u16) -> Self {
        self.also_success = Some(status);
        self
    }

    /// Treat `status` as "not ready yet".
    pub const fn not_ready(mut self, status: u16) -> Self {
        self.not_ready = Some(status);
        self
    }

    /// Treat `status` as a hard failure with a dedicated message.
    pub const fn reject(mut self, status: u16) -> Self {
        self.rejected = Some(status);
        self
    }

    /// The success status for this endpoint.
    pub const fn success(&self) -> u16 {
        self.success
    }

    /// Classify a response status.
    pub fn classify(&self, status: StatusCode) -> Outcome {
        let code = status.as_u16();
        if code == self.success || self.also_success == Some(code) {
            Outcome::Success
        } else if code == StatusCode::FORBIDDEN.as_u16() {
            Outcome::Forbidden
        } else if self.not_ready == Some(code) {
            Outcome::NotReady
        } else if self.rejected == Some(code) {
            Outcome::Rejected
        } else {
            Outcome::Unexpected
        }
    }
}

/// GET /uploads/{id}
pub const DETAIL_UPLOAD: StatusTable = StatusTable::expect(200).not_ready(503);
/// POST /uploads
pub const CREATE_UPLOAD: StatusTable = StatusTable::expect(201);
/// GET /uploads/{id}/summary
pub const UPLOAD_SUMMARY: StatusTable = StatusTable::expect(200).not_ready(503);
/// GET /uploads/{id}/licenses
pub const UPLOAD_LICENSES: StatusTable = StatusTable::expect(200).not_ready(503).reject(412);
/// DELETE /uploads/{id}
pub const DELETE_UPLOAD: StatusTable = StatusTable::expect(202);
/// GET /uploads
pub const LIST_UPLOADS: StatusTable = StatusTable::expect(200);
/// PATCH /uploads/{id}
pub const MOVE_UPLOAD: StatusTable = StatusTable::expect(202);
/// PUT /uploads/{id}
pub const COPY_UPLOAD: StatusTable = StatusTable::expect(202);
/// GET /users
pub const LIST_USERS: StatusTable = StatusTable::expect(200);
/// GET /users/{id}
pub const DETAIL_USER: StatusTable = StatusTable::expect(200);
/// DELETE /users/{id}
pub const DELETE_USER: StatusTable = StatusTable::expect(202);
/// GET /folders
pub const LIST_FOLDERS: StatusTable = StatusTable::expect(200);
/// GET /folders/{id}
pub const DETAIL_FOLDER: StatusTable = StatusTable::expect(200);
/// POST /folders; 200 means a folder with that name already exists.
pub const CREATE_FOLDER: StatusTable = StatusTable::expect(201).or(200);
/// PATCH /folders/{id}
pub const UPDATE_FOLDER: StatusTable = StatusTable::expect(200);
/// DELETE /folders/{id}
pub const DELETE_FOLDER: StatusTable = StatusTable::expect(202);
/// PUT /folders/{id} with `action: move`
pub const MOVE_FOLDER: StatusTable = StatusTable::expect(202);
/// PUT /folders/{id} with `action: copy`
pub const COPY_FOLDER: StatusTable = StatusTable::expect(202);
/// GET /groups
pub const LIST_GROUPS: StatusTable = StatusTable::expect(200);
/// POST /groups
pub const CREATE_GROUP: StatusTable = StatusTable::expect(200);
/// POST /jobs
pub const SCHEDULE_JOBS: StatusTable = StatusTable::expect(201);
/// GET /jobs
pub const LIST_JOBS: StatusTable = StatusTable::expect(200);
/// GET /jobs/{id}
pub const DETAIL_JOB: StatusTable = StatusTable::expect(200);
/// GET /report
pub const GENERATE_REPORT: StatusTable = StatusTable::expect(201).not_ready(503);
/// GET /report/{id}
pub const DOWNLOAD_REPORT: StatusTable = StatusTable::expect(200).not_ready(503);
/// GET /version
pub const VERSION: StatusTable = StatusTable::expect(200);
/// POST /tokens; 404 means the credentials were rejected.
pub const ISSUE_TOKEN: StatusTable = StatusTable::expect(201).reject(404);
