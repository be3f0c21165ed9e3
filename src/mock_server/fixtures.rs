//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{Findings, Folder, Group, Job, JobStatus, LicenseFinding, Summary, Upload, UploadHash, User};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Folder Fixtures
    // =========================================================================

    /// The root folder every FOSSology instance has.
    pub fn root_folder() -> Folder {
        Folder {
            id: 1,
            name: "Software Repository".to_string(),
            description: Some("Top Folder".to_string()),
            parent: None,
        }
    }

    /// A child folder of `parent`.
    pub fn folder(id: u64, name: &str, parent: u64) -> Folder {
        Folder {
            id,
            name: name.to_string(),
            description: Some(String::new()),
            parent: Some(parent),
        }
    }

    // =========================================================================
    // Upload Fixtures
    // =========================================================================

    /// Create a minimal upload with required fields only.
    pub fn minimal_upload(id: u64, name: &str, folder: &Folder) -> Upload {
        Upload {
            id,
            uploadname: name.to_string(),
            description: None,
            uploaddate: None,
            folderid: Some(folder.id),
            foldername: Some(folder.name.clone()),
            hash: None,
            filesize: None,
            filesha1: None,
        }
    }

    /// Create an upload as reported by a current server.
    pub fn upload(id: u64, name: &str, folder: &Folder, size: u64) -> Upload {
        let mut upload = Self::minimal_upload(id, name, folder);
        upload.description = Some(format!("Fixture {name}"));
        upload.uploaddate = Some("2024-03-14 09:26:53.589793+00".to_string());
        upload.hash = Some(UploadHash {
            sha1: Some(format!("{:040X}", id)),
            md5: Some(format!("{:032X}", id)),
            sha256: Some(format!("{:064X}", id)),
            size: Some(size),
        });
        upload
    }

    // =========================================================================
    // Analysis Fixtures
    // =========================================================================

    /// A clearing summary for `upload`.
    pub fn summary(upload: &Upload, main_license: Option<&str>) -> Summary {
        Summary {
            id: upload.id,
            upload_name: upload.uploadname.clone(),
            main_license: main_license.map(str::to_string),
            unique_licenses: 3,
            total_licenses: 12,
            unique_concluded_licenses: 1,
            total_concluded_licenses: 2,
            files_to_be_cleared: 10,
            files_cleared: 2,
            clearing_status: Some("Open".to_string()),
            copyright_count: 7,
        }
    }

    /// A single license finding.
    pub fn finding(path: &str, scanner: &[&str]) -> LicenseFinding {
        LicenseFinding {
            file_path: path.to_string(),
            findings: Findings {
                scanner: Some(scanner.iter().map(|s| s.to_string()).collect()),
                conclusion: None,
            },
        }
    }

    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create a user with the given access level.
    pub fn user(id: u64, name: &str, access_level: &str) -> User {
        User {
            id,
            name: name.to_string(),
            description: Some(format!("{name} account")),
            email: Some(format!("{name}@localhost")),
            access_level: Some(access_level.to_string()),
            root_folder_id: Some(1),
            email_notification: Some(false),
            agents: None,
        }
    }

    /// A group.
    pub fn group(id: u64, name: &str) -> Group {
        Group {
            id,
            name: name.to_string(),
        }
    }

    // =========================================================================
    // Job Fixtures
    // =========================================================================

    /// A job on `upload` in state `status`.
    pub fn job(id: u64, upload: &Upload, status: JobStatus) -> Job {
        Job {
            id,
            name: upload.uploadname.clone(),
            queue_date: Some("2024-03-14 09:26:53.589793+00".to_string()),
            upload_id: Some(upload.id),
            user_id: Some(3),
            group_id: Some(3),
            eta: Some(0),
            status,
        }
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub folders: Vec<Folder>,
    pub uploads: Vec<Upload>,
    pub summaries: Vec<Summary>,
    pub licenses: Vec<(u64, String, Vec<LicenseFinding>)>,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub jobs: Vec<Job>,
}

impl DefaultScenario {
    fn new() -> Self {
        let root = Fixtures::root_folder();
        let drop = Fixtures::folder(2, "Drop", root.id);

        let base_files = Fixtures::upload(2, "base-files_11.tar.xz", &root, 65_432);
        let python = Fixtures::upload(3, "fossology-python-master.zip", &drop, 241_117);

        let summaries = vec![
            Fixtures::summary(&base_files, Some("GPL-2.0-or-later")),
            Fixtures::summary(&python, None),
        ];

        let licenses = vec![(
            base_files.id,
            crate::DEFAULT_AGENT.to_string(),
            vec![
                Fixtures::finding(
                    "base-files_11.tar.xz/base-files_11.tar/base-files-11/licenses/GPL-2",
                    &["GPL-2.0-only"],
                ),
                Fixtures::finding(
                    "base-files_11.tar.xz/base-files_11.tar/base-files-11/debian/copyright",
                    &["GPL-2.0-or-later", "BSD-3-Clause"],
                ),
            ],
        )];

        let users = vec![
            Fixtures::user(3, "fossy", "admin"),
            Fixtures::user(4, "reader", "read_only"),
        ];

        let groups = vec![Fixtures::group(2, "Default User"), Fixtures::group(3, "fossy")];

        let jobs = vec![
            Fixtures::job(1, &base_files, JobStatus::Completed),
            Fixtures::job(2, &python, JobStatus::Completed),
        ];

        Self {
            folders: vec![root, drop],
            uploads: vec![base_files, python],
            summaries,
            licenses,
            users,
            groups,
            jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_upload() {
        let upload = Fixtures::minimal_upload(5, "sources.zip", &Fixtures::root_folder());
        assert_eq!(upload.id, 5);
        assert_eq!(upload.folderid, Some(1));
        assert!(upload.hash.is_none());
    }

    #[test]
    fn test_upload_has_hash() {
        let upload = Fixtures::upload(9, "sources.zip", &Fixtures::root_folder(), 100);
        assert_eq!(upload.size(), Some(100));
        assert_eq!(upload.sha1().map(str::len), Some(40));
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert!(!scenario.folders.is_empty());
        assert!(!scenario.uploads.is_empty());
        assert_eq!(scenario.summaries.len(), scenario.uploads.len());
        assert!(!scenario.licenses.is_empty());
        assert!(!scenario.users.is_empty());
        assert_eq!(scenario.jobs.len(), scenario.uploads.len());
        assert!(scenario.groups.iter().any(|g| g.name == "fossy"));
    }
}
