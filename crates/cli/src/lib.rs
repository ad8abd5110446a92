// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ragq - command-line client for a RAG document repository.
//!
//! Uploads go through the durable queue in [`ragq_core`]: files are stored
//! in a local SQLite database first, then sent one at a time with retry and
//! backoff. Search, file management, and health checks talk to the server
//! directly through [`api::ApiClient`].
//!
//! # Main Components
//!
//! - [`Cli`] / [`Command`] - argument parsing
//! - [`Config`] - `config.toml` settings with environment overrides
//! - [`api::ApiClient`] - HTTP client for the repository API
//! - [`transmit::HttpTransmitter`] - connects the queue processor to the API
//! - [`Error`] - error types with user hints

mod cli;
pub mod colors;
mod commands;
mod display;
mod guard;
pub mod help;
mod lock;
mod prompt;

pub mod api;
pub mod auth;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod transmit;

pub use cli::{
    AdminCommand, Cli, Command, ConfigCommand, FilesCommand, OutputArgs, OutputFormat,
    QueueCommand, SearchCommand, TopKArgs,
};
pub use config::Config;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

use commands::Context;

/// Execute a CLI command on a fresh tokio runtime.
pub fn run(command: Command) -> Result<()> {
    if let Command::Completion { shell } = command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "ragq", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = Context::load()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute(&ctx, command))
}

async fn execute(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Login {
            username,
            password_stdin,
        } => commands::session::login(ctx, &username, password_stdin).await,
        Command::Logout => commands::session::logout(ctx),
        Command::Whoami { output } => commands::session::whoami(ctx, output.output).await,
        Command::Upload {
            paths,
            file_type,
            no_wait,
        } => commands::upload::run(ctx, &paths, file_type, no_wait).await,
        Command::Queue(cmd) => commands::queue::run(ctx, cmd).await,
        Command::Search(cmd) => commands::search::run(ctx, cmd).await,
        Command::Files(cmd) => commands::files::run(ctx, cmd).await,
        Command::Admin(cmd) => commands::files::run_admin(ctx, cmd).await,
        Command::Health { output } => commands::health::run(ctx, output.output).await,
        Command::Config(cmd) => commands::config::run(ctx, cmd),
        Command::Completion { .. } => Ok(()),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
