//! Command-line interface

use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub mod commands;
pub mod output;

pub use commands::Commands;
pub use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "partdb",
    version,
    about = "Manage storage locations and the parts placed in them",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Machine-readable JSON output on stdout
    #[arg(long, global = true)]
    pub robot: bool,

    /// More logging (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// No logging at all
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file to use instead of the global and project files
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub const fn output_format(&self) -> OutputFormat {
        if self.robot {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}
