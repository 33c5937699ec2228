use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use kit::areas::repository::Repository;
use kit::artifacts::core::PagerWriter;
use kit::artifacts::diff::tree_diff::DiffFilter;
use kit::commands::porcelain::diff::DiffOptions;
use kit::errors::{RepositoryError, repository_error};
use minus::Pager;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "KIT_LOG";

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    about = "A small content-addressed version control tool",
    long_about = "kit stores snapshots of a directory as blobs, trees and commits in a \
    .git metadata directory, and moves the working tree between them.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(short = 'C', global = true, help = "Run as if started in this directory")]
    directory: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Create an empty repository")]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(about = "Stage file contents")]
    Add {
        #[arg(required = true, help = "Files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(about = "Record the staged snapshot as a new commit")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(about = "Show the working tree status")]
    Status {
        #[arg(long, help = "Machine-readable two-column output")]
        porcelain: bool,
    },
    #[command(about = "Show changes between the workspace, the index and commits")]
    Diff {
        #[arg(long, help = "Compare the index with HEAD")]
        cached: bool,
        #[arg(long, help = "Only print the change kind and path")]
        name_status: bool,
        #[arg(long, value_parser = parse_diff_filter, help = "Select changes by kind (A, D, M)")]
        diff_filter: Option<DiffFilter>,
        #[arg(num_args = 0..=2, help = "Two revisions to compare")]
        revisions: Vec<String>,
    },
    #[command(about = "List or create branches")]
    Branch {
        #[arg(index = 1, help = "Name of the branch to create")]
        name: Option<String>,
        #[arg(index = 2, help = "Revision the branch starts at (defaults to HEAD)")]
        start: Option<String>,
    },
    #[command(about = "Switch to a branch or commit")]
    Checkout {
        #[arg(index = 1, help = "Branch name or revision")]
        target: String,
    },
    #[command(name = "cat-file", about = "Print the content of an object")]
    CatFile {
        #[arg(short = 'p', help = "Object id or revision to print")]
        object: String,
    },
    #[command(name = "hash-object", about = "Compute the blob id of a file")]
    HashObject {
        #[arg(short, long, help = "Write the blob to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "ls-tree", about = "List the files of a revision's tree")]
    LsTree {
        #[arg(index = 1, default_value = "HEAD")]
        revision: String,
    },
}

fn parse_diff_filter(value: &str) -> Result<DiffFilter, String> {
    DiffFilter::try_parse(value).ok_or_else(|| format!("invalid diff filter '{value}'"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match repository_error(&error) {
            Some(RepositoryError::Conflict(report)) => {
                eprintln!("{report}");
                ExitCode::from(1)
            }
            _ => {
                eprintln!("fatal: {error:#}");
                ExitCode::from(128)
            }
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = match cli.directory {
        Some(directory) => directory,
        None => std::env::current_dir()?,
    };

    let pager = paging_enabled(&cli.command).then(Pager::new);
    let writer: Box<dyn Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };

    match cli.command {
        Commands::Init { path } => {
            let path = path.map(|path| root.join(path)).unwrap_or(root);
            Repository::new(&path, writer)?.init()?
        }
        command => {
            let mut repository = Repository::new(&root, writer)?;
            dispatch(&mut repository, command)?;
        }
    }

    if let Some(pager) = pager {
        minus::page_all(pager)?;
    }

    Ok(())
}

fn dispatch(repository: &mut Repository, command: Commands) -> Result<()> {
    match command {
        Commands::Init { .. } => repository.init(),
        Commands::Add { paths } => repository.add(&paths),
        Commands::Commit { message } => repository.commit(&message),
        Commands::Status { porcelain } => repository.status(porcelain),
        Commands::Diff {
            cached,
            name_status,
            diff_filter,
            revisions,
        } => {
            let revisions = match revisions.as_slice() {
                [] => None,
                [old, new] => Some((old.clone(), new.clone())),
                _ => anyhow::bail!("diff compares either the index or exactly two revisions"),
            };
            repository.diff(&DiffOptions::new(
                cached,
                revisions,
                name_status,
                diff_filter.unwrap_or_else(DiffFilter::empty),
            ))
        }
        Commands::Branch { name: None, .. } => repository.list_branches(),
        Commands::Branch {
            name: Some(name),
            start,
        } => repository.branch(&name, start.as_deref()),
        Commands::Checkout { target } => repository.checkout(&target),
        Commands::CatFile { object } => repository.cat_file(&object),
        Commands::HashObject { write, file } => repository.hash_object(&file, write),
        Commands::LsTree { revision } => repository.ls_tree(&revision),
    }
}

/// Only diff output is paged, and only on a terminal.
fn paging_enabled(command: &Commands) -> bool {
    matches!(command, Commands::Diff { .. })
        && std::env::var_os("NO_PAGER").is_none()
        && std::io::stdout().is_terminal()
}
