//! Mock server state management.
//!
//! Provides the in-memory data store for the mock FOSSology API server.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Folder, Group, Job, JobStatus, LicenseFinding, ReportFormat, Summary, Upload, User};

/// A report the mock has been asked to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockReport {
    pub upload_id: u64,
    pub format: ReportFormat,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Uploads indexed by ID.
    pub uploads: BTreeMap<u64, Upload>,

    /// Folders indexed by ID.
    pub folders: BTreeMap<u64, Folder>,

    /// Users indexed by ID.
    pub users: BTreeMap<u64, User>,

    /// Groups indexed by ID.
    pub groups: BTreeMap<u64, Group>,

    /// Jobs indexed by ID.
    pub jobs: BTreeMap<u64, Job>,

    /// Requested reports indexed by ID.
    pub reports: BTreeMap<u64, MockReport>,

    /// Clearing summaries indexed by upload ID.
    pub summaries: HashMap<u64, Summary>,

    /// License findings indexed by upload ID and agent name.
    /// An agent without an entry was never scheduled for that upload.
    pub licenses: HashMap<(u64, String), Vec<LicenseFinding>>,

    /// Remaining "not ready" answers per upload for the detail endpoint.
    pub unpacking: HashMap<u64, u32>,

    /// Remaining "not ready" answers per upload for summary and licenses.
    pub scanning: HashMap<u64, u32>,

    /// Remaining "Processing" answers per job.
    pub running: HashMap<u64, u32>,

    /// Remaining "not ready" answers per report download.
    pub generating: HashMap<u64, u32>,

    /// How many "not ready" detail answers a new upload gets.
    pub unpack_polls: u32,

    /// How many polls a newly scheduled job stays "Processing".
    pub job_polls: u32,

    /// How many "not ready" answers the download of a new report gets.
    pub report_polls: u32,

    /// Groups whose requests are answered with 403.
    pub forbidden_groups: HashSet<String>,

    /// Username/password pairs accepted by the token endpoint.
    pub credentials: HashMap<String, String>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    next_upload_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add an upload to the state.
    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.uploads.insert(upload.id, upload);
        self
    }

    /// Add a folder to the state.
    pub fn with_folder(mut self, folder: Folder) -> Self {
        self.folders.insert(folder.id, folder);
        self
    }

    /// Add a user to the state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    /// Add a summary to the state.
    pub fn with_summary(mut self, summary: Summary) -> Self {
        self.summaries.insert(summary.id, summary);
        self
    }

    /// Add the findings of `agent` for an upload.
    pub fn with_licenses(mut self, upload_id: u64, agent: &str, findings: Vec<LicenseFinding>) -> Self {
        self.licenses.insert((upload_id, agent.to_string()), findings);
        self
    }

    /// Answer the detail endpoint of an upload with 503 `polls` times.
    pub fn with_unpacking(mut self, upload_id: u64, polls: u32) -> Self {
        self.unpacking.insert(upload_id, polls);
        self
    }

    /// Answer summary and license requests of an upload with 503 `polls` times.
    pub fn with_scanning(mut self, upload_id: u64, polls: u32) -> Self {
        self.scanning.insert(upload_id, polls);
        self
    }

    /// Make every new upload report "not ready" `polls` times.
    pub fn with_unpack_polls(mut self, polls: u32) -> Self {
        self.unpack_polls = polls;
        self
    }

    /// Add a group to the state.
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.insert(group.id, group);
        self
    }

    /// Add a job to the state.
    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.insert(job.id, job);
        self
    }

    /// Keep every newly scheduled job "Processing" for `polls` requests.
    pub fn with_job_polls(mut self, polls: u32) -> Self {
        self.job_polls = polls;
        self
    }

    /// Answer the download of every new report with 503 `polls` times.
    pub fn with_report_polls(mut self, polls: u32) -> Self {
        self.report_polls = polls;
        self
    }

    /// Reject requests made on behalf of `group`.
    pub fn with_forbidden_group(mut self, group: &str) -> Self {
        self.forbidden_groups.insert(group.to_string());
        self
    }

    /// Accept `username`/`password` on the token endpoint.
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials
            .insert(username.to_string(), password.to_string());
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Whether requests on behalf of `group` are rejected.
    pub fn is_forbidden(&self, group: Option<&str>) -> bool {
        group
            .map(|g| self.forbidden_groups.contains(g))
            .unwrap_or(false)
    }

    /// Consume one "not ready" answer from `counters`. Returns true while
    /// the entity is still being processed.
    fn still_busy(counters: &mut HashMap<u64, u32>, id: u64) -> bool {
        match counters.get_mut(&id) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    /// Whether the unpack agent is still running for `id`.
    pub fn poll_unpack(&mut self, id: u64) -> bool {
        Self::still_busy(&mut self.unpacking, id)
    }

    /// Whether the scanners are still running for `id`.
    pub fn poll_scan(&mut self, id: u64) -> bool {
        Self::still_busy(&mut self.scanning, id)
    }

    /// Whether report `id` is still being generated.
    pub fn poll_report(&mut self, id: u64) -> bool {
        Self::still_busy(&mut self.generating, id)
    }

    /// Current view of job `id`. A running job reports "Processing" until
    /// its polls are used up and "Completed" afterwards.
    pub fn poll_job(&mut self, id: u64) -> Option<Job> {
        let busy = Self::still_busy(&mut self.running, id);
        let job = self.jobs.get_mut(&id)?;
        if job.status == JobStatus::Queued || job.status == JobStatus::Processing {
            if busy {
                job.status = JobStatus::Processing;
                job.eta = Some(10);
            } else {
                job.status = JobStatus::Completed;
                job.eta = Some(0);
            }
        }
        Some(job.clone())
    }

    /// Jobs, optionally only those of one upload.
    pub fn list_jobs(&self, upload: Option<u64>) -> Vec<Job> {
        self.jobs
            .values()
            .filter(|j| upload.is_none() || j.upload_id == upload)
            .cloned()
            .collect()
    }

    /// Queue a job on upload `upload_id` and return its ID.
    pub fn schedule_job(&mut self, upload_id: u64) -> Option<u64> {
        let name = self.uploads.get(&upload_id)?.uploadname.clone();
        let id = next_key(&self.jobs);
        self.jobs.insert(
            id,
            Job {
                id,
                name,
                queue_date: Some(now()),
                upload_id: Some(upload_id),
                user_id: Some(3),
                group_id: Some(3),
                eta: None,
                status: JobStatus::Queued,
            },
        );
        if self.job_polls > 0 {
            self.running.insert(id, self.job_polls);
        }
        Some(id)
    }

    /// Register a report request and return the report ID.
    pub fn request_report(&mut self, upload_id: u64, format: ReportFormat) -> u64 {
        let id = next_key(&self.reports);
        self.reports.insert(id, MockReport { upload_id, format });
        if self.report_polls > 0 {
            self.generating.insert(id, self.report_polls);
        }
        id
    }

    /// Create a folder below `parent`. Returns the folder ID and whether a
    /// folder with that name already existed there.
    pub fn create_folder(&mut self, parent: u64, name: &str, description: Option<String>) -> (u64, bool) {
        let existing = self
            .folders
            .values()
            .find(|f| f.parent == Some(parent) && f.name == name);
        if let Some(folder) = existing {
            return (folder.id, true);
        }

        let id = next_key(&self.folders);
        self.folders.insert(
            id,
            Folder {
                id,
                name: name.to_string(),
                description: Some(description.unwrap_or_default()),
                parent: Some(parent),
            },
        );
        (id, false)
    }

    /// Remove a folder together with its subfolders and their uploads.
    pub fn delete_folder(&mut self, id: u64) -> bool {
        if !self.folders.contains_key(&id) {
            return false;
        }
        let doomed: HashSet<u64> = self
            .folders
            .keys()
            .copied()
            .filter(|&f| f == id || self.is_descendant(f, id))
            .collect();
        self.folders.retain(|f, _| !doomed.contains(f));
        self.uploads
            .retain(|_, u| !u.folderid.is_some_and(|f| doomed.contains(&f)));
        true
    }

    /// Reparent folder `id` below `parent`.
    pub fn move_folder(&mut self, id: u64, parent: u64) -> bool {
        match self.folders.get_mut(&id) {
            Some(folder) => {
                folder.parent = Some(parent);
                true
            }
            None => false,
        }
    }

    /// Copy folder `id` (without its content) below `parent`.
    pub fn copy_folder(&mut self, id: u64, parent: u64) -> Option<u64> {
        let mut copy = self.folders.get(&id)?.clone();
        let new_id = next_key(&self.folders);
        copy.id = new_id;
        copy.parent = Some(parent);
        self.folders.insert(new_id, copy);
        Some(new_id)
    }

    /// Create a group called `name`; `None` if the name is taken.
    pub fn create_group(&mut self, name: &str) -> Option<u64> {
        if self.groups.values().any(|g| g.name == name) {
            return None;
        }
        let id = next_key(&self.groups);
        self.groups.insert(
            id,
            Group {
                id,
                name: name.to_string(),
            },
        );
        Some(id)
    }

    /// List uploads, optionally restricted to a folder and its children.
    pub fn list_uploads(&self, folder: Option<u64>, recursive: bool) -> Vec<&Upload> {
        self.uploads
            .values()
            .filter(|u| match (folder, u.folderid) {
                (None, _) => true,
                (Some(f), Some(uf)) if uf == f => true,
                (Some(f), Some(uf)) => recursive && self.is_descendant(uf, f),
                (Some(_), None) => false,
            })
            .collect()
    }

    /// Whether `folder` lies below `ancestor`.
    fn is_descendant(&self, folder: u64, ancestor: u64) -> bool {
        let mut current = self.folders.get(&folder).and_then(|f| f.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.folders.get(&id).and_then(|f| f.parent);
        }
        false
    }

    /// Register a new upload named `name` in `folder` and return its ID.
    pub fn create_upload(&mut self, name: &str, folder: &Folder, description: Option<String>) -> u64 {
        let id = self.allocate_id();
        let mut upload = super::Fixtures::minimal_upload(id, name, folder);
        upload.description = description;
        upload.uploaddate = Some(now());
        self.uploads.insert(id, upload);
        if self.unpack_polls > 0 {
            self.unpacking.insert(id, self.unpack_polls);
        }
        // Unpacking runs as a job of its own.
        let job_polls = std::mem::replace(&mut self.job_polls, self.unpack_polls);
        self.schedule_job(id);
        self.job_polls = job_polls;
        id
    }

    /// Move an upload to `folder`.
    pub fn move_upload(&mut self, id: u64, folder: &Folder) -> bool {
        match self.uploads.get_mut(&id) {
            Some(upload) => {
                upload.folderid = Some(folder.id);
                upload.foldername = Some(folder.name.clone());
                true
            }
            None => false,
        }
    }

    /// Copy an upload into `folder`, returning the new upload ID.
    pub fn copy_upload(&mut self, id: u64, folder: &Folder) -> Option<u64> {
        let mut copy = self.uploads.get(&id)?.clone();
        let new_id = self.allocate_id();
        copy.id = new_id;
        copy.folderid = Some(folder.id);
        copy.foldername = Some(folder.name.clone());
        self.uploads.insert(new_id, copy);
        Some(new_id)
    }

    fn allocate_id(&mut self) -> u64 {
        let highest = self.uploads.keys().next_back().copied().unwrap_or(0);
        self.next_upload_id = self.next_upload_id.max(highest) + 1;
        self.next_upload_id
    }
}

/// The key following the highest one in `map`.
fn next_key<V>(map: &BTreeMap<u64, V>) -> u64 {
    map.keys().next_back().map_or(1, |k| k + 1)
}

/// Timestamp in the format FOSSology uses for dates.
fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.6f+00").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_state_add_and_get_upload() {
        let root = Fixtures::root_folder();
        let state = MockState::new().with_upload(Fixtures::upload(2, "a.zip", &root, 10));

        let upload = state.uploads.get(&2);
        assert!(upload.is_some());
        assert_eq!(upload.unwrap().uploadname, "a.zip");
    }

    #[test]
    fn test_state_poll_unpack_counts_down() {
        let mut state = MockState::new().with_unpacking(2, 2);

        assert!(state.poll_unpack(2));
        assert!(state.poll_unpack(2));
        assert!(!state.poll_unpack(2));
        assert!(!state.poll_unpack(99));
    }

    #[test]
    fn test_state_list_uploads_recursive() {
        let root = Fixtures::root_folder();
        let child = Fixtures::folder(2, "Child", 1);
        let state = MockState::new()
            .with_folder(root.clone())
            .with_folder(child.clone())
            .with_upload(Fixtures::upload(10, "top.zip", &root, 1))
            .with_upload(Fixtures::upload(11, "nested.zip", &child, 1));

        assert_eq!(state.list_uploads(None, true).len(), 2);
        assert_eq!(state.list_uploads(Some(1), true).len(), 2);
        assert_eq!(state.list_uploads(Some(1), false).len(), 1);
        assert_eq!(state.list_uploads(Some(2), false).len(), 1);
    }

    #[test]
    fn test_state_create_and_copy_allocate_new_ids() {
        let root = Fixtures::root_folder();
        let mut state = MockState::new()
            .with_upload(Fixtures::upload(5, "a.zip", &root, 1))
            .with_unpack_polls(3);

        let created = state.create_upload("b.zip", &root, None);
        assert_eq!(created, 6);
        assert_eq!(state.unpacking.get(&created), Some(&3));

        let copied = state.copy_upload(5, &root).unwrap();
        assert_eq!(copied, 7);
        assert_eq!(state.uploads.len(), 3);
    }

    #[test]
    fn test_state_forbidden_group() {
        let state = MockState::new().with_forbidden_group("secret");
        assert!(state.is_forbidden(Some("secret")));
        assert!(!state.is_forbidden(Some("public")));
        assert!(!state.is_forbidden(None));
    }

    #[test]
    fn test_state_scheduled_job_completes_after_polls() {
        let root = Fixtures::root_folder();
        let mut state = MockState::new()
            .with_upload(Fixtures::upload(2, "a.zip", &root, 1))
            .with_job_polls(2);

        let id = state.schedule_job(2).unwrap();
        assert_eq!(state.jobs[&id].status, JobStatus::Queued);
        assert_eq!(state.poll_job(id).unwrap().status, JobStatus::Processing);
        assert_eq!(state.poll_job(id).unwrap().status, JobStatus::Processing);
        assert_eq!(state.poll_job(id).unwrap().status, JobStatus::Completed);

        assert!(state.schedule_job(99).is_none());
        assert!(state.poll_job(99).is_none());
    }

    #[test]
    fn test_state_create_upload_adds_unpack_job() {
        let root = Fixtures::root_folder();
        let mut state = MockState::new().with_unpack_polls(1).with_job_polls(5);

        let upload = state.create_upload("b.zip", &root, None);

        let jobs = state.list_jobs(Some(upload));
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].name, "b.zip");
        assert_eq!(state.running.get(&jobs[0].id), Some(&1));
        assert_eq!(state.job_polls, 5);
    }

    #[test]
    fn test_state_folder_create_and_delete() {
        let root = Fixtures::root_folder();
        let mut state = MockState::new().with_folder(root.clone());

        let (drop, existed) = state.create_folder(1, "Drop", None);
        assert!(!existed);
        assert_eq!(state.create_folder(1, "Drop", None), (drop, true));
        let (nested, _) = state.create_folder(drop, "Nested", Some("n".to_string()));
        let nested_folder = state.folders[&nested].clone();
        state = state.with_upload(Fixtures::upload(8, "n.zip", &nested_folder, 1));

        assert!(state.delete_folder(drop));
        assert!(!state.folders.contains_key(&nested));
        assert!(state.uploads.is_empty());
        assert!(state.folders.contains_key(&1));
        assert!(!state.delete_folder(drop));
    }

    #[test]
    fn test_state_group_names_are_unique() {
        let mut state = MockState::new();

        assert_eq!(state.create_group("qa"), Some(1));
        assert_eq!(state.create_group("qa"), None);
        assert_eq!(state.create_group("dev"), Some(2));
    }
}
