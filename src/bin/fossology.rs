//! FOSSology API CLI binary.
//!
//! A command-line interface for interacting with the FOSSology API.

use clap::Parser;
use fossology::cli::{Cli, Command, Entity, FolderCommand, TokenArgs, UploadArgs};
use fossology::{
    generate_token, Folder, FossologyClient, FossologyError, Get, Group, Job, JobListQuery,
    JobSpec, LicenseFinding, LicenseQuery, List, Page, PrettyPrint, Report, RetryPolicy,
    TokenRequest, Upload, UploadListQuery, UploadOptions, UploadSource, UrlSpec, User, VcsSpec,
    DEFAULT_PAGE_SIZE, DEFAULT_SERVER_URL,
};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use tabled::{Table, Tabled};

/// Exit status when the server cannot be reached at all.
const EXIT_UNREACHABLE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Token(ref args) => handle_token(args).await,
        _ => match FossologyClient::from_env() {
            Ok(client) => {
                let client = match cli.group.as_deref() {
                    Some(group) => client.for_group(group),
                    None => client,
                };
                run(&client, cli).await
            }
            Err(e) => {
                eprintln!("Error: {e}");
                eprintln!("Hint: Set FOSSOLOGY_TOKEN environment variable");
                return ExitCode::FAILURE;
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ FossologyError::ServerUnreachable { .. }) => {
            eprintln!("Fatal: {e}");
            ExitCode::from(EXIT_UNREACHABLE)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &FossologyClient, cli: Cli) -> fossology::Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, id, json).await,
        Command::List {
            entity,
            page,
            count,
            folder,
            no_recursive,
            upload,
        } => {
            let query = ListQueries {
                uploads: UploadListQuery {
                    folder,
                    recursive: !no_recursive,
                },
                jobs: JobListQuery { upload },
            };
            handle_list(client, entity, page, count, query, json).await
        }
        Command::Upload(args) => handle_upload(client, args, json).await,
        Command::Summary { id } => {
            let upload = Upload::get(client, id).await?;
            let summary = upload.summary(client).await?;
            output_single(&summary, json)
        }
        Command::Licenses {
            id,
            agent,
            containers,
        } => {
            let upload = Upload::get(client, id).await?;
            let query = LicenseQuery {
                agent: Some(agent),
                containers,
            };
            let findings = upload.licenses(client, &query).await?;
            output_rows(&findings, json, |l| LicenseRow::from(l))
        }
        Command::Delete { id } => {
            let upload = Upload::get(client, id).await?;
            upload.delete(client).await
        }
        Command::Move { id, folder } => {
            let upload = Upload::get(client, id).await?;
            let folder = Folder::get(client, folder).await?;
            upload.move_to(client, &folder).await
        }
        Command::Copy { id, folder } => {
            let upload = Upload::get(client, id).await?;
            let folder = Folder::get(client, folder).await?;
            upload.copy_to(client, &folder).await
        }
        Command::Folder { action } => handle_folder(client, action, json).await,
        Command::CreateGroup { name } => Group::create(client, &name).await,
        Command::Schedule { id, wait } => {
            let upload = Upload::get(client, id).await?;
            let folder = Folder::get(client, upload.folderid.unwrap_or(1)).await?;
            let mut job = Job::schedule(client, &folder, &upload, &JobSpec::license_scan()).await?;
            if wait {
                job = Job::wait(client, job.id, RetryPolicy::JOB).await?;
            }
            output_single(&job, json)
        }
        Command::Report { id, format, output } => {
            let upload = Upload::get(client, id).await?;
            let report_id = upload.generate_report(client, format.into()).await?;
            let report = Report::download(client, report_id).await?;
            save_report(&report, &output).await
        }
        Command::Version => {
            let version = client.version().await?;
            println!("{version}");
            Ok(())
        }
        Command::Token(ref args) => handle_token(args).await,
    }
}

async fn handle_get(
    client: &FossologyClient,
    entity: Entity,
    id: u64,
    json: bool,
) -> fossology::Result<()> {
    match entity {
        Entity::Upload => output_single(&Upload::get(client, id).await?, json),
        Entity::User => output_single(&User::get(client, id).await?, json),
        Entity::Folder => output_single(&Folder::get(client, id).await?, json),
        Entity::Job => output_single(&Job::get(client, id).await?, json),
        Entity::Group => {
            let group = Group::list(client)
                .await?
                .into_iter()
                .find(|g| g.id == id)
                .ok_or_else(|| FossologyError::Api {
                    message: format!("Group {id} not found"),
                    response: None,
                })?;
            output_single(&group, json)
        }
    }
}

/// Per-entity list filters collected from the `list` flags.
struct ListQueries {
    uploads: UploadListQuery,
    jobs: JobListQuery,
}

async fn handle_list(
    client: &FossologyClient,
    entity: Entity,
    page: Option<u32>,
    count: Option<u32>,
    query: ListQueries,
    json: bool,
) -> fossology::Result<()> {
    let page = page.unwrap_or(1);
    let count = count.unwrap_or(DEFAULT_PAGE_SIZE);
    match entity {
        Entity::Upload => {
            let uploads = Upload::list_page(client, &query.uploads, page, count).await?;
            output_page(&uploads, json, |u| UploadRow::from(u))
        }
        Entity::Job => {
            let jobs = Job::list_page(client, &query.jobs, page, count).await?;
            output_page(&jobs, json, |j| JobRow::from(j))
        }
        Entity::User => output_rows(&User::list(client).await?, json, |u| UserRow::from(u)),
        Entity::Folder => output_rows(&Folder::list(client).await?, json, |f| FolderRow::from(f)),
        Entity::Group => output_rows(&Group::list(client).await?, json, |g| GroupRow::from(g)),
    }
}

async fn handle_folder(
    client: &FossologyClient,
    action: FolderCommand,
    json: bool,
) -> fossology::Result<()> {
    match action {
        FolderCommand::Create {
            name,
            parent,
            description,
        } => {
            let parent = Folder::get(client, parent).await?;
            let folder = Folder::create(client, &parent, &name, description.as_deref()).await?;
            output_single(&folder, json)
        }
        FolderCommand::Update {
            id,
            name,
            description,
        } => {
            let folder = Folder::get(client, id).await?;
            let folder = folder
                .update(client, name.as_deref(), description.as_deref())
                .await?;
            output_single(&folder, json)
        }
        FolderCommand::Delete { id } => Folder::get(client, id).await?.delete(client).await,
        FolderCommand::Move { id, parent } => {
            let folder = Folder::get(client, id).await?;
            let parent = Folder::get(client, parent).await?;
            output_single(&folder.move_to(client, &parent).await?, json)
        }
        FolderCommand::Copy { id, parent } => {
            let folder = Folder::get(client, id).await?;
            let parent = Folder::get(client, parent).await?;
            folder.copy_to(client, &parent).await
        }
    }
}

async fn save_report(report: &Report, dir: &Path) -> fossology::Result<()> {
    let path = dir.join(&report.name);
    tokio::fs::write(&path, &report.content)
        .await
        .map_err(|source| FossologyError::Io {
            path: path.clone(),
            source,
        })?;
    println!("Report {} saved to {}", report.id, path.display());
    Ok(())
}

async fn handle_upload(
    client: &FossologyClient,
    args: UploadArgs,
    json: bool,
) -> fossology::Result<()> {
    let folder = Folder::get(client, args.folder).await?;
    let name = args.name.unwrap_or_default();

    let source = if let Some(path) = args.file {
        Some(UploadSource::File(path))
    } else if let Some(vcs_url) = args.vcs_url {
        Some(UploadSource::Vcs(VcsSpec {
            vcs_type: args.vcs_type,
            vcs_url,
            vcs_branch: args.vcs_branch,
            vcs_name: name,
            ..Default::default()
        }))
    } else {
        args.url.map(|url| {
            UploadSource::Url(UrlSpec {
                url,
                name,
                ..Default::default()
            })
        })
    };

    let options = UploadOptions {
        description: args.description,
        access_level: args.access_level.map(Into::into),
        ignore_scm: args.ignore_scm,
    };

    match Upload::create(client, &folder, source, &options).await? {
        Some(upload) => output_single(&upload, json),
        None => {
            eprintln!("Hint: Pass one of --file, --vcs-url or --url");
            Ok(())
        }
    }
}

async fn handle_token(args: &TokenArgs) -> fossology::Result<()> {
    let server_url =
        std::env::var("FOSSOLOGY_API_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let request = TokenRequest {
        username: args.username.clone(),
        password: args.password.clone(),
        token_name: args.name.clone(),
        token_scope: args.scope.into(),
        token_expire: args.expire,
    };
    let token = generate_token(&server_url, &request).await?;
    println!("{token}");
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> fossology::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_rows<T, R, F>(items: &[T], json: bool, to_row: F) -> fossology::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> fossology::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    output_rows(&page.items, json, to_row)?;
    if !json {
        if let Some(total) = page.total_pages {
            println!("\nPage {}/{}", page.page, total);
        } else if page.has_more {
            println!("\nPage {} (more available)", page.page);
        } else {
            println!("\nPage {} (end)", page.page);
        }
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct UploadRow {
    id: u64,
    name: String,
    folder: String,
    uploaded: String,
}

impl From<&Upload> for UploadRow {
    fn from(u: &Upload) -> Self {
        Self {
            id: u.id,
            name: u.uploadname.clone(),
            folder: u.foldername.clone().unwrap_or_default(),
            uploaded: u.uploaddate.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: u64,
    name: String,
    access: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            access: u.access_level.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct FolderRow {
    id: u64,
    name: String,
    parent: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id,
            name: f.name.clone(),
            parent: f.parent.map(|p| p.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct JobRow {
    id: u64,
    name: String,
    upload: String,
    status: String,
    queued: String,
}

impl From<&Job> for JobRow {
    fn from(j: &Job) -> Self {
        Self {
            id: j.id,
            name: j.name.clone(),
            upload: j.upload_id.map(|u| u.to_string()).unwrap_or_default(),
            status: format!("{:?}", j.status),
            queued: j.queue_date.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct GroupRow {
    id: u64,
    name: String,
}

impl From<&Group> for GroupRow {
    fn from(g: &Group) -> Self {
        Self {
            id: g.id,
            name: g.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct LicenseRow {
    file: String,
    scanner: String,
    conclusion: String,
}

impl From<&LicenseFinding> for LicenseRow {
    fn from(l: &LicenseFinding) -> Self {
        Self {
            file: l.file_path.clone(),
            scanner: l.scanner().join(", "),
            conclusion: l.conclusion().join(", "),
        }
    }
}
