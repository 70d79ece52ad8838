//! CLI argument definitions for the bucket client.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bucket",
    version,
    about = "Build integer arrays, store them, and sort them remotely",
    long_about = "Build an integer array from typed values, generated numbers, a .txt file,\n\
                  or a stored array, save it to the array store and run the remote sort.\n\
                  Stored arrays can be listed, looked up by id, edited, and deleted."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the array store API.
    #[arg(long = "api-url", env = "BUCKET_API_URL", global = true)]
    pub api_url: Option<String>,

    /// JSON file with client settings.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save an array to the store.
    Save(SubmitArgs),

    /// Save an array to the store and sort it.
    Sort(SubmitArgs),

    /// List stored arrays, fifty per page.
    List(ListArgs),

    /// Show one stored array.
    Show {
        /// Array id.
        id: String,
    },

    /// Replace a stored array's elements.
    Edit(EditArgs),

    /// Delete a stored array.
    Delete {
        /// Array id.
        id: String,
    },
}

#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Smallest generated value.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub min: String,

    /// Largest generated value.
    #[arg(long, default_value = "100", allow_hyphen_values = true)]
    pub max: String,
}

/// Where the array to save comes from. Exactly one source is required.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Elements entered one by one.
    #[arg(long, num_args = 1.., allow_negative_numbers = true, value_name = "VALUE")]
    pub values: Option<Vec<String>>,

    /// Elements as one space-separated line. Non-integers become 0.
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub bulk: Option<String>,

    /// Generate COUNT random elements between --min and --max.
    #[arg(long, value_name = "COUNT")]
    pub generate: Option<String>,

    /// Read elements from a .txt file, one per line.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Start from a stored array.
    #[arg(long = "from-id", value_name = "ID")]
    pub from_id: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Args)]
pub struct EditArgs {
    /// Array id.
    pub id: String,

    /// New elements as one space-separated line.
    #[arg(long, allow_hyphen_values = true)]
    pub data: String,

    /// Sort the array in place after saving.
    #[arg(long)]
    pub sort: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
