use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed weekly planning CLI.
/// Storage defaults to ~/.weekplan/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "wp", version, about = "Weekly task planning board")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
