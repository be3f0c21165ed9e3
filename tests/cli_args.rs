//! CLI argument parsing tests.

use clap::Parser;
use fossology::cli::{Cli, Command, Entity, FolderCommand, Format, Scope, Visibility};

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["fossology", "get", "upload", "42"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get { entity, id } => {
            assert!(matches!(entity, Entity::Upload));
            assert_eq!(id, 42);
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_rejects_non_numeric_id() {
    let result = Cli::try_parse_from(["fossology", "get", "upload", "latest"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_parses_list_subcommand() {
    let cli = Cli::parse_from(["fossology", "list", "uploads"]);

    assert!(!cli.json);
    match cli.command {
        Command::List {
            entity,
            folder,
            no_recursive,
            ..
        } => {
            assert!(matches!(entity, Entity::Upload));
            assert_eq!(folder, None);
            assert!(!no_recursive);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_global_json_and_group_flags() {
    // Flags before subcommand
    let cli = Cli::parse_from(["fossology", "--json", "--group", "qa", "list", "uploads"]);
    assert!(cli.json);
    assert_eq!(cli.group.as_deref(), Some("qa"));

    // Flags after subcommand (global flags)
    let cli = Cli::parse_from(["fossology", "list", "uploads", "--json", "--group", "qa"]);
    assert!(cli.json);
    assert_eq!(cli.group.as_deref(), Some("qa"));
}

#[test]
fn test_list_pagination_args() {
    let cli = Cli::parse_from([
        "fossology", "list", "uploads", "--page", "2", "--count", "50", "--folder", "3",
        "--no-recursive",
    ]);

    match cli.command {
        Command::List {
            page,
            count,
            folder,
            no_recursive,
            ..
        } => {
            assert_eq!(page, Some(2));
            assert_eq!(count, Some(50));
            assert_eq!(folder, Some(3));
            assert!(no_recursive);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_upload_from_file() {
    let cli = Cli::parse_from([
        "fossology",
        "upload",
        "--folder",
        "2",
        "--file",
        "sources.zip",
        "--description",
        "Nightly",
        "--access-level",
        "public",
        "--ignore-scm",
    ]);

    match cli.command {
        Command::Upload(args) => {
            assert_eq!(args.folder, 2);
            assert_eq!(args.file.as_deref(), Some(std::path::Path::new("sources.zip")));
            assert_eq!(args.description.as_deref(), Some("Nightly"));
            assert_eq!(args.access_level, Some(Visibility::Public));
            assert!(args.ignore_scm);
        }
        _ => panic!("Expected Upload command"),
    }
}

#[test]
fn test_upload_sources_are_exclusive() {
    let result = Cli::try_parse_from([
        "fossology",
        "upload",
        "--file",
        "sources.zip",
        "--url",
        "https://example.com/a.zip",
        "--name",
        "a.zip",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_upload_vcs_requires_name() {
    let result = Cli::try_parse_from([
        "fossology",
        "upload",
        "--vcs-url",
        "https://github.com/fossology/fossology-python",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_licenses_defaults_to_nomos() {
    let cli = Cli::parse_from(["fossology", "licenses", "7"]);

    match cli.command {
        Command::Licenses {
            id,
            agent,
            containers,
        } => {
            assert_eq!(id, 7);
            assert_eq!(agent, "nomos");
            assert!(!containers);
        }
        _ => panic!("Expected Licenses command"),
    }
}

#[test]
fn test_move_requires_folder() {
    assert!(Cli::try_parse_from(["fossology", "move", "7"]).is_err());

    let cli = Cli::parse_from(["fossology", "move", "7", "--folder", "3"]);
    assert!(matches!(cli.command, Command::Move { id: 7, folder: 3 }));
}

#[test]
fn test_token_args() {
    let cli = Cli::parse_from([
        "fossology",
        "token",
        "--username",
        "fossy",
        "--password",
        "fossy",
        "--scope",
        "write",
        "--expire",
        "2026-12-31",
    ]);

    match cli.command {
        Command::Token(args) => {
            assert_eq!(args.username, "fossy");
            assert_eq!(args.scope, Scope::Write);
            assert_eq!(args.name, "fossology-rs");
            assert_eq!(args.expire.to_string(), "2026-12-31");
        }
        _ => panic!("Expected Token command"),
    }
}

#[test]
fn test_entity_variants() {
    let cli = Cli::parse_from(["fossology", "get", "upload", "1"]);
    assert!(matches!(cli.command, Command::Get { entity: Entity::Upload, .. }));

    let cli = Cli::parse_from(["fossology", "get", "user", "1"]);
    assert!(matches!(cli.command, Command::Get { entity: Entity::User, .. }));

    let cli = Cli::parse_from(["fossology", "list", "folders"]);
    assert!(matches!(cli.command, Command::List { entity: Entity::Folder, .. }));

    let cli = Cli::parse_from(["fossology", "get", "job", "9"]);
    assert!(matches!(cli.command, Command::Get { entity: Entity::Job, id: 9 }));

    let cli = Cli::parse_from(["fossology", "list", "groups"]);
    assert!(matches!(cli.command, Command::List { entity: Entity::Group, .. }));
}

#[test]
fn test_list_jobs_of_upload() {
    let cli = Cli::parse_from(["fossology", "list", "jobs", "--upload", "2"]);

    match cli.command {
        Command::List { entity, upload, .. } => {
            assert_eq!(entity, Entity::Job);
            assert_eq!(upload, Some(2));
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_folder_create_defaults_to_root_parent() {
    let cli = Cli::parse_from(["fossology", "folder", "create", "Drop", "--description", "incoming"]);

    match cli.command {
        Command::Folder {
            action:
                FolderCommand::Create {
                    name,
                    parent,
                    description,
                },
        } => {
            assert_eq!(name, "Drop");
            assert_eq!(parent, 1);
            assert_eq!(description.as_deref(), Some("incoming"));
        }
        _ => panic!("Expected folder create command"),
    }
}

#[test]
fn test_folder_move_requires_parent() {
    let result = Cli::try_parse_from(["fossology", "folder", "move", "4"]);
    assert!(result.is_err());

    let cli = Cli::parse_from(["fossology", "folder", "move", "4", "--parent", "2"]);
    assert!(matches!(
        cli.command,
        Command::Folder {
            action: FolderCommand::Move { id: 4, parent: 2 }
        }
    ));
}

#[test]
fn test_schedule_and_report_args() {
    let cli = Cli::parse_from(["fossology", "schedule", "2", "--wait"]);
    assert!(matches!(cli.command, Command::Schedule { id: 2, wait: true }));

    let cli = Cli::parse_from(["fossology", "report", "2", "--format", "spdx2"]);
    match cli.command {
        Command::Report { id, format, output } => {
            assert_eq!(id, 2);
            assert_eq!(format, Format::Spdx2);
            assert_eq!(output, std::path::PathBuf::from("."));
        }
        _ => panic!("Expected Report command"),
    }
}
