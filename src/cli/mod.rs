//! CLI module for plotrag.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};

/// plotrag - grounded answers about movie plots
///
/// Ask a question directly with `plotrag --query "..."`, or use a subcommand
/// to build and inspect the knowledge base.
#[derive(Parser, Debug)]
#[command(name = "plotrag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(flatten)]
    pub ask: AskArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Arguments for answering a question.
#[derive(Args, Debug, Clone, Default)]
pub struct AskArgs {
    /// Movie-related question
    #[arg(short, long)]
    pub query: Option<String>,

    /// Number of retrieved chunks [default: 5]
    #[arg(long = "top_k", visible_alias = "top-k")]
    pub top_k: Option<usize>,

    /// Include the retrieved chunk texts in the output
    #[arg(long = "show_contexts", visible_alias = "show-contexts")]
    pub show_contexts: bool,

    /// Chat model to use instead of the configured one
    #[arg(short, long)]
    pub model: Option<String>,
}

impl Cli {
    /// Check the choice between the top-level question and a subcommand.
    ///
    /// Global options may appear anywhere, but the top-level question flags
    /// only make sense without a subcommand, and a question is required then.
    pub fn validate(&self) -> Result<(), clap::Error> {
        match (&self.command, self.ask.is_empty()) {
            (None, _) if self.ask.query.is_none() => Err(Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                "the following required arguments were not provided: --query <QUERY>",
            )),
            (Some(_), false) => Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "--query, --top_k, --show_contexts and --model cannot be used with a subcommand",
            )),
            _ => Ok(()),
        }
    }
}

impl AskArgs {
    /// Whether none of the question flags were given.
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.top_k.is_none() && !self.show_contexts && self.model.is_none()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a question from the indexed movie plots
    Ask(AskArgs),

    /// Chunk, embed and index the movie plot dataset
    Ingest {
        /// CSV file with Title and Plot columns (overrides config)
        #[arg(short, long)]
        dataset: Option<String>,

        /// Number of leading rows to ingest (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Clear the collection before writing
        #[arg(long)]
        reset: bool,
    },

    /// Show the chunks retrieved for a query, without asking the model
    Search {
        /// Search query
        #[arg(short, long)]
        query: String,

        /// Number of retrieved chunks [default: 5]
        #[arg(long = "top_k", visible_alias = "top-k")]
        top_k: Option<usize>,
    },

    /// Show vector store statistics
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write a default configuration file if none exists
    Init,

    /// Show configuration file path
    Path,
}
