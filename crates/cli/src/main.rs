//! Pebble CLI - pebble command

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod config;
mod util;

/// Pebble - minimal local snapshot history for a project directory
#[derive(Parser)]
#[command(name = "pebble")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project directory (default: search upward from the current directory)
    #[arg(short = 'C', long = "project", global = true)]
    project: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a project and register it
    Init {
        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,
        /// Project description
        #[arg(long, default_value = "")]
        desc: String,
    },
    /// Stage changes against the last throw
    Gather {
        /// Folders or files to scan (default: whole project, with deletions)
        folders: Vec<PathBuf>,
    },
    /// Commit the staged changes
    Throw {
        /// Throw message
        #[arg(short, long)]
        message: String,
    },
    /// Step back one throw, or rebuild the working tree at head
    Reset {
        /// Rebuild at the current head instead of stepping back
        #[arg(long)]
        to_head: bool,
    },
    /// Copy a registered project's head into a new directory
    Clone {
        /// Registered project name
        name: String,
        /// Destination directory (must be missing or empty)
        dest: PathBuf,
    },
    /// Show throws from head back to the first one
    Log {
        /// Number of throws to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show project, head and staged changes
    Status,
    /// Unregister the project and remove its .pebble directory
    Delete {
        /// Skip the confirmation prompts
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load()?;
    util::init_tracing(cli.verbose, config.log_level.as_deref());

    let registry = config.registry()?;
    let project = cli.project.as_deref();

    match cli.command {
        Commands::Init { name, desc } => cmd::init::run(project, name, desc, &registry),
        Commands::Gather { folders } => cmd::gather::run(project, &folders),
        Commands::Throw { message } => cmd::throw::run(project, &message, &registry),
        Commands::Reset { to_head } => cmd::reset::run(project, to_head, &registry),
        Commands::Clone { name, dest } => cmd::clone::run(&name, &dest, &registry),
        Commands::Log { limit } => cmd::log::run(project, limit),
        Commands::Status => cmd::status::run(project),
        Commands::Delete { yes } => cmd::delete::run(project, yes, &registry),
    }
}
