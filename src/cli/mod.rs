//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the fossology binary.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{AccessLevel, ReportFormat, TokenScope};

/// FOSSology API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "fossology", about = "FOSSology API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Run every request on behalf of this group.
    #[arg(long, global = true, env = "FOSSOLOGY_GROUP")]
    pub group: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The numeric ID.
        id: u64,
    },

    /// List entities with optional filtering and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Page number (1-indexed, uploads and jobs).
        #[arg(long)]
        page: Option<u32>,

        /// Number of items per page (uploads and jobs).
        #[arg(long)]
        count: Option<u32>,

        /// Only list uploads in this folder.
        #[arg(long)]
        folder: Option<u64>,

        /// Do not include uploads from child folders.
        #[arg(long)]
        no_recursive: bool,

        /// Only list jobs of this upload.
        #[arg(long)]
        upload: Option<u64>,
    },

    /// Create a new upload and wait until it is unpacked.
    Upload(UploadArgs),

    /// Show the clearing summary of an upload.
    Summary {
        /// The upload ID.
        id: u64,
    },

    /// Show the license findings of an upload.
    Licenses {
        /// The upload ID.
        id: u64,

        /// Scanner agent to report on.
        #[arg(long, default_value = crate::DEFAULT_AGENT)]
        agent: String,

        /// Include findings for archives and directories.
        #[arg(long)]
        containers: bool,
    },

    /// Schedule an upload for deletion.
    Delete {
        /// The upload ID.
        id: u64,
    },

    /// Move an upload to another folder.
    Move {
        /// The upload ID.
        id: u64,

        /// Destination folder ID.
        #[arg(long)]
        folder: u64,
    },

    /// Copy an upload into another folder.
    Copy {
        /// The upload ID.
        id: u64,

        /// Destination folder ID.
        #[arg(long)]
        folder: u64,
    },

    /// Create, change or remove folders.
    Folder {
        #[command(subcommand)]
        action: FolderCommand,
    },

    /// Create a new group.
    CreateGroup {
        /// Name of the group.
        name: String,
    },

    /// Schedule the license scanners on an upload.
    Schedule {
        /// The upload ID.
        id: u64,

        /// Wait until the job has finished.
        #[arg(long)]
        wait: bool,
    },

    /// Generate a report for an upload and save it.
    Report {
        /// The upload ID.
        id: u64,

        /// Report format.
        #[arg(long, value_enum, default_value = "readmeoss")]
        format: Format,

        /// Directory to write the report to.
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },

    /// Request a new API token with username and password.
    Token(TokenArgs),

    /// Print the server API version.
    Version,
}

/// Folder subcommands.
#[derive(Subcommand, Debug)]
pub enum FolderCommand {
    /// Create a folder.
    Create {
        /// Name of the new folder.
        name: String,

        /// Parent folder ID.
        #[arg(long, default_value = "1")]
        parent: u64,

        #[arg(long)]
        description: Option<String>,
    },

    /// Rename a folder or change its description.
    Update {
        /// The folder ID.
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a folder and its content.
    Delete {
        /// The folder ID.
        id: u64,
    },

    /// Move a folder below another one.
    Move {
        /// The folder ID.
        id: u64,

        /// New parent folder ID.
        #[arg(long)]
        parent: u64,
    },

    /// Copy a folder below another one.
    Copy {
        /// The folder ID.
        id: u64,

        /// Parent folder ID of the copy.
        #[arg(long)]
        parent: u64,
    },
}

/// Arguments of the `upload` command.
#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("source")
        .args(["file", "vcs_url", "url"])
        .multiple(false)
))]
pub struct UploadArgs {
    /// Destination folder ID.
    #[arg(long, default_value = "1")]
    pub folder: u64,

    /// Local file to upload.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Repository to check out on the server.
    #[arg(long, requires = "name")]
    pub vcs_url: Option<String>,

    /// Repository type.
    #[arg(long, default_value = "git")]
    pub vcs_type: String,

    /// Branch to check out.
    #[arg(long)]
    pub vcs_branch: Option<String>,

    /// URL to fetch on the server.
    #[arg(long, requires = "name")]
    pub url: Option<String>,

    /// Name of the upload (VCS and URL sources).
    #[arg(long)]
    pub name: Option<String>,

    /// Upload description.
    #[arg(long)]
    pub description: Option<String>,

    /// Visibility of the upload.
    #[arg(long, value_enum)]
    pub access_level: Option<Visibility>,

    /// Ignore SCM metadata while scanning.
    #[arg(long)]
    pub ignore_scm: bool,
}

/// Arguments of the `token` command.
#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, env = "FOSSOLOGY_USER")]
    pub username: String,

    #[arg(long, env = "FOSSOLOGY_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Name of the new token.
    #[arg(long, default_value = "fossology-rs")]
    pub name: String,

    #[arg(long, value_enum, default_value = "read")]
    pub scope: Scope,

    /// Last day of validity (YYYY-MM-DD).
    #[arg(long)]
    pub expire: NaiveDate,
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// An uploaded package.
    #[value(alias = "uploads")]
    Upload,
    /// A user account.
    #[value(alias = "users")]
    User,
    /// A folder.
    #[value(alias = "folders")]
    Folder,
    /// A scheduled agent run.
    #[value(alias = "jobs")]
    Job,
    /// A user group (list only).
    #[value(alias = "groups")]
    Group,
}

/// Upload visibility accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Protected,
    Public,
}

impl From<Visibility> for AccessLevel {
    fn from(value: Visibility) -> Self {
        match value {
            Visibility::Private => AccessLevel::Private,
            Visibility::Protected => AccessLevel::Protected,
            Visibility::Public => AccessLevel::Public,
        }
    }
}

/// Token scope accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Read,
    Write,
}

impl From<Scope> for TokenScope {
    fn from(value: Scope) -> Self {
        match value {
            Scope::Read => TokenScope::Read,
            Scope::Write => TokenScope::Write,
        }
    }
}

/// Report format accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Dep5,
    Spdx2,
    Spdx2tv,
    Readmeoss,
    Unifiedreport,
}

impl From<Format> for ReportFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Dep5 => ReportFormat::Dep5,
            Format::Spdx2 => ReportFormat::Spdx2,
            Format::Spdx2tv => ReportFormat::Spdx2tv,
            Format::Readmeoss => ReportFormat::Readmeoss,
            Format::Unifiedreport => ReportFormat::Unifiedreport,
        }
    }
}
