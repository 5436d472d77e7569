//! ogit CLI - minimal local version control

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ogit::ops::{add, commit, fsck, log, status};
use ogit::{read_object, Error, Hash, Repo};

#[derive(Parser)]
#[command(name = "ogit")]
#[command(about = "minimal local version control - content-addressed objects and a linear history")]
#[command(version)]
struct Cli {
    /// working directory holding the .ogit repository
    #[arg(short = 'C', long, default_value = ".", env = "OGIT_WORKDIR")]
    workdir: PathBuf,

    /// more logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// create the repository layout
    Init,

    /// store a file and stage it for the next commit
    Add {
        /// file to stage
        path: PathBuf,
    },

    /// record the staged files as a new commit
    Commit {
        /// commit message
        #[arg(short, long)]
        message: String,
    },

    /// show history from head, newest first
    Log {
        /// maximum number of commits to show
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },

    /// list staged and untracked top-level files
    Status,

    /// write an object's raw bytes to stdout
    CatFile {
        /// object hash
        object: String,
    },

    /// verify repository integrity
    Fsck,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        1 => EnvFilter::new("ogit=debug"),
        _ => EnvFilter::new("ogit=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> ogit::Result<()> {
    match cli.command {
        Commands::Init => {
            println!("Initializing ogit repository...");
            match Repo::init(&cli.workdir) {
                Ok(_) => println!("ogit repository initialized successfully!"),
                Err(Error::RepoExists(_)) => println!("ogit already initialized."),
                Err(e) => return Err(e),
            }
        }

        Commands::Add { path } => {
            let repo = Repo::open(&cli.workdir)?;
            let outcome = add(&repo, &path)?;

            if outcome.newly_stored {
                println!("Added {} to ogit.", outcome.path);
            } else {
                println!("File {} already added to ogit.", outcome.path);
            }
            println!("Added {} to ogit index.", outcome.path);
        }

        Commands::Commit { message } => {
            let repo = Repo::open(&cli.workdir)?;
            let hash = commit(&repo, &message)?;
            println!("Committed as {} with message: \"{}\"", hash, message);
        }

        Commands::Log { max_count } => {
            let repo = Repo::open(&cli.workdir)?;
            let walk = log(&repo)?;
            let limit = max_count.unwrap_or(usize::MAX);

            let mut shown = 0;
            for entry in walk.take(limit) {
                println!("{}", entry?);
                shown += 1;
            }

            if shown == 0 && limit > 0 {
                println!("No commits found");
            }
        }

        Commands::Status => {
            let repo = Repo::open(&cli.workdir)?;
            let status = status(&repo)?;

            println!("Staged files:");
            for name in &status.staged {
                println!("  {}", name);
            }

            println!("\nUntracked files:");
            for name in &status.untracked {
                println!("  {}", name);
            }
        }

        Commands::CatFile { object } => {
            let repo = Repo::open(&cli.workdir)?;
            let hash = Hash::from_hex(&object)?;
            let data = read_object(&repo, &hash)?;
            io::stdout()
                .write_all(&data)
                .map_err(|e| Error::Io { path: "stdout".into(), source: e })?;
        }

        Commands::Fsck => {
            let repo = Repo::open(&cli.workdir)?;
            let report = fsck(&repo)?;

            println!("objects checked: {}", report.objects_checked);
            println!("commits reachable: {}", report.commits);

            if !report.corrupt_objects.is_empty() {
                println!("\ncorrupt objects:");
                for obj in &report.corrupt_objects {
                    println!("  {}: {}", obj.hash, obj.message);
                }
            }

            if !report.missing_objects.is_empty() {
                println!("\nmissing objects:");
                for obj in &report.missing_objects {
                    println!(
                        "  {} {} (referenced by {})",
                        obj.object_type, obj.hash, obj.referenced_by
                    );
                }
            }

            if !report.dangling_objects.is_empty() {
                println!("\ndangling objects: {}", report.dangling_objects.len());
            }

            if report.is_ok() {
                println!("\nrepository is healthy");
            } else {
                println!("\nrepository has issues");
                return Err(Error::IntegrityCheck(format!(
                    "{} corrupt, {} missing",
                    report.corrupt_objects.len(),
                    report.missing_objects.len()
                )));
            }
        }
    }

    Ok(())
}
