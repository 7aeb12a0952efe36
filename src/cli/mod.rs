//! CLI module for wikirag.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// wikirag - Question answering over Wikipedia articles
///
/// Splits wikitext into token-bounded chunks, embeds them into a CSV corpus,
/// and answers questions from the most related chunks.
#[derive(Parser, Debug)]
#[command(name = "wikirag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check configuration and API access
    Doctor,

    /// Show the sections and chunks extracted from a wikitext file
    Sections {
        /// Wikitext file to read
        input: String,

        /// Article title, used as the top-level heading
        #[arg(short, long)]
        title: String,

        /// Print chunks instead of sections
        #[arg(long)]
        chunks: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Chunk, embed and store a wikitext file as a corpus
    Index {
        /// Wikitext file to read
        input: String,

        /// Article title, used as the top-level heading
        #[arg(short, long)]
        title: String,

        /// Corpus CSV to write (defaults to the configured path)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Rank corpus chunks by relatedness to a query
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Corpus CSV to read (defaults to the configured path)
        #[arg(long)]
        corpus: Option<String>,
    },

    /// Ask a question and get an answer from the corpus
    Ask {
        /// The question to ask
        question: String,

        /// Chat model to use for response generation
        #[arg(short, long)]
        model: Option<String>,

        /// Corpus CSV to read (defaults to the configured path)
        #[arg(long)]
        corpus: Option<String>,

        /// Print the message sent to the model before the answer
        #[arg(long)]
        show_message: bool,
    },

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

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}
