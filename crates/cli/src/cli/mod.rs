// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use ragq_core::FileType;

pub use args::{OutputArgs, TopKArgs, DEFAULT_TOP_K};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Parse `document` or `image`.
fn file_type(s: &str) -> Result<FileType, String> {
    s.parse::<FileType>()
        .map_err(|_| "expected 'document' or 'image'".to_string())
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "ragq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "Upload, search, and manage files in a RAG document repository")]
#[command(
    long_about = "Upload, search, and manage files in a RAG document repository.\n\n\
    Uploads go through a durable local queue: files are saved before any network \
    traffic and retried with backoff until the server accepts them."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and store a session token
    #[command(after_help = colors::examples("\
Examples:
  ragq login alice                          Prompt for the password
  echo \"$PW\" | ragq login alice --password-stdin   Read the password from stdin"))]
    Login {
        /// Account name
        #[arg(value_parser = non_empty_string)]
        username: String,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in account
    Whoami {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Queue files for upload and process them
    ///
    /// Files are saved to the local queue first, so nothing is lost if the
    /// connection drops. The type is inferred from the extension unless
    /// --type is given.
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  ragq upload paper.pdf                 Upload a document
  ragq upload a.png b.jpg               Upload two images
  ragq upload scan.bin --type image     Force the file type
  ragq upload *.pdf --no-wait           Queue only; process later")
    )]
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// File type for every path (document, image)
        #[arg(long = "type", short = 't', value_parser = file_type)]
        file_type: Option<FileType>,

        /// Queue the files without processing them
        #[arg(long)]
        no_wait: bool,
    },

    /// Inspect and manage the upload queue
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Search documents by text or images by example
    #[command(subcommand)]
    Search(SearchCommand),

    /// List, download, or delete your files
    #[command(subcommand)]
    Files(FilesCommand),

    /// Administrative views (admin accounts only)
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Check server and component health
    Health {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  ragq completion bash > ~/.local/share/bash-completion/completions/ragq
  ragq completion zsh > ~/.zfunc/_ragq
  ragq completion fish > ~/.config/fish/completions/ragq.fish")
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Upload queue commands.
#[derive(Subcommand)]
pub enum QueueCommand {
    /// List queue entries (uploading, queued, failed, completed)
    List {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run a processing pass over queued entries
    Process,
    /// Requeue every failed entry and process it
    Retry,
    /// Remove an entry that is not uploading
    #[command(arg_required_else_help = true)]
    Remove {
        /// Upload id or unique prefix, as shown by 'ragq queue list'
        #[arg(value_parser = non_empty_string)]
        id: String,
    },
    /// Remove every completed entry
    ClearCompleted,
}

/// Search commands.
#[derive(Subcommand)]
pub enum SearchCommand {
    /// Search indexed documents by text
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  ragq search text \"transformer attention\"        Top 5 matches
  ragq search text \"loss curves\" -k 10            Top 10 matches")
    )]
    Text {
        /// Query text
        #[arg(value_parser = non_empty_string)]
        query: String,

        #[command(flatten)]
        top_k: TopKArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Search indexed images with an example image
    #[command(arg_required_else_help = true)]
    Image {
        /// Example image
        path: PathBuf,

        #[command(flatten)]
        top_k: TopKArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Commands over your stored files.
#[derive(Subcommand)]
pub enum FilesCommand {
    /// List your files
    List {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Download a file
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  ragq files download document paper.pdf           Save to ./paper.pdf
  ragq files download image cat.png -o /tmp/c.png  Save to a chosen path")
    )]
    Download {
        /// File type (document, image)
        #[arg(value_parser = file_type)]
        file_type: FileType,

        /// Stored file name
        #[arg(value_parser = non_empty_string)]
        name: String,

        /// Destination path (default: ./<name>)
        #[arg(long = "output", short = 'o')]
        output: Option<PathBuf>,
    },
    /// Delete a file from the repository
    #[command(arg_required_else_help = true)]
    Delete {
        /// File type (document, image)
        #[arg(value_parser = file_type)]
        file_type: FileType,

        /// Stored file name
        #[arg(value_parser = non_empty_string)]
        name: String,
    },
}

/// Admin commands.
#[derive(Subcommand)]
pub enum AdminCommand {
    /// List every user's files
    Files {
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Configuration commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Set a configuration value
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  ragq config set api_url https://rag.example.com   Point at a server
  ragq config set queue.max_retries 5               Allow more attempts")
    )]
    Set {
        /// Setting name (e.g. api_url, queue.max_retries)
        key: String,

        /// New value
        value: String,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
