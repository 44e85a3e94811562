//! src/cli.rs
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Send git changes to an MCP code review server and render the findings as HTML
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Review server URL, overrides the config file and MCP_REVIEW_SERVER_URL.
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Connect and read timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review uncommitted changes, staged changes or a single file.
    #[command(alias = "rev")]
    Review(ReviewArgs),

    /// Review a range of lines from a file.
    #[command(alias = "sel")]
    Selection {
        /// File containing the selection.
        file: PathBuf,

        /// First selected line, starting at 1.
        #[arg(long)]
        start: usize,

        /// Last selected line, inclusive.
        #[arg(long)]
        end: usize,

        /// Write the HTML report here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether the review server is reachable.
    Health,

    /// Render a saved server response as HTML. Use `-` to read stdin.
    Render {
        input: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the welcome page.
    Welcome,

    /// Initialize the mcp-review configuration file.
    #[command(alias = "i")]
    Init {
        /// Overwrite an existing configuration file.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ReviewArgs {
    /// Only review staged changes.
    #[arg(long, conflicts_with = "file")]
    pub staged: bool,

    /// Only review changes to this file.
    #[arg(long)]
    pub file: Option<String>,

    /// Submit through the webhook endpoint instead of the typed one.
    #[arg(long)]
    pub webhook: bool,

    /// Focus area sent to the server. Repeat for several.
    #[arg(long = "focus")]
    pub focus: Vec<String>,

    /// Show every issue regardless of the configured minimum severity.
    #[arg(long)]
    pub all_issues: bool,

    /// Write the HTML report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
