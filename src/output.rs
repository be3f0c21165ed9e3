//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Folder, Group, Job, Summary, Upload, User};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Upload {
    fn pretty_print(&self) -> String {
        let header = format!("Upload #{}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Name:           {}", self.uploadname),
        ];

        if let Some(ref description) = self.description {
            if !description.is_empty() {
                lines.push(format!("Description:    {}", description));
            }
        }

        match (&self.foldername, self.folderid) {
            (Some(name), Some(id)) => lines.push(format!("Folder:         {} ({})", name, id)),
            (None, Some(id)) => lines.push(format!("Folder:         {}", id)),
            _ => {}
        }

        if let Some(ref date) = self.uploaddate {
            lines.push(format!("Uploaded:       {}", date));
        }

        if let Some(size) = self.size() {
            lines.push(format!("Size:           {} bytes", size));
        }

        if let Some(sha1) = self.sha1() {
            lines.push(format!("SHA1:           {}", sha1));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Summary {
    fn pretty_print(&self) -> String {
        let header = format!("Summary: {}", self.upload_name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider];

        if let Some(ref license) = self.main_license {
            lines.push(format!("Main License:   {}", license));
        }

        if let Some(ref status) = self.clearing_status {
            lines.push(format!("Clearing:       {}", status));
        }

        lines.push(format!(
            "Licenses:       {} unique, {} total",
            self.unique_licenses, self.total_licenses
        ));
        lines.push(format!(
            "Concluded:      {} unique, {} total",
            self.unique_concluded_licenses, self.total_concluded_licenses
        ));
        lines.push(format!(
            "Files:          {} cleared, {} to be cleared",
            self.files_cleared, self.files_to_be_cleared
        ));
        lines.push(format!("Copyrights:     {}", self.copyright_count));

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let header = format!("User: {}", self.name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("ID:             {}", self.id)];

        if let Some(ref email) = self.email {
            lines.push(format!("Email:          {}", email));
        }

        if let Some(ref level) = self.access_level {
            lines.push(format!("Access:         {}", level));
        }

        if let Some(folder) = self.root_folder_id {
            lines.push(format!("Root Folder:    {}", folder));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Folder {
    fn pretty_print(&self) -> String {
        let header = format!("Folder: {}", self.name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("ID:             {}", self.id)];

        if let Some(ref description) = self.description {
            if !description.is_empty() {
                lines.push(format!("Description:    {}", description));
            }
        }

        if let Some(parent) = self.parent {
            lines.push(format!("Parent:         {}", parent));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Group {
    fn pretty_print(&self) -> String {
        format!("Group #{}: {}", self.id, self.name)
    }
}

impl PrettyPrint for Job {
    fn pretty_print(&self) -> String {
        let header = format!("Job #{}: {}", self.id, self.name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("Status:         {:?}", self.status)];

        if let Some(upload) = self.upload_id {
            lines.push(format!("Upload:         {}", upload));
        }

        if let Some(ref date) = self.queue_date {
            lines.push(format!("Queued:         {}", date));
        }

        if let Some(eta) = self.eta.filter(|_| !self.status.is_finished()) {
            lines.push(format!("ETA:            {}s", eta));
        }

        lines.join("\n")
    }
}
