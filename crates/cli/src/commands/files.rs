// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Stored asset commands: `files ...` and `admin files`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::api::RemoteFile;
use crate::cli::{AdminCommand, FilesCommand, OutputFormat};
use crate::display::{format_files, format_size};
use crate::error::{Error, Result};

use super::{print_json, Context};

/// Execute a files subcommand.
pub async fn run(ctx: &Context, cmd: FilesCommand) -> Result<()> {
    let client = ctx.authed_client()?;
    match cmd {
        FilesCommand::List { output } => report(&client.list_files().await?, output.output),
        FilesCommand::Download {
            file_type,
            name,
            output,
        } => {
            let bytes = client.download_file(file_type, &name).await?;
            let dest = download_path(&name, output)?;
            if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, &bytes)?;
            println!(
                "Saved {} ({}) to {}",
                name,
                format_size(bytes.len() as u64),
                dest.display()
            );
            Ok(())
        }
        FilesCommand::Delete { file_type, name } => {
            client.delete_file(file_type, &name).await?;
            println!("Deleted {} {}", file_type, name);
            Ok(())
        }
    }
}

/// Execute an admin subcommand.
pub async fn run_admin(ctx: &Context, cmd: AdminCommand) -> Result<()> {
    match cmd {
        AdminCommand::Files { output } => {
            let files = ctx.authed_client()?.admin_files().await?;
            report(&files, output.output)
        }
    }
}

/// Where a download goes: the explicit path, else the file name in the
/// working directory. Server names never escape the working directory.
pub fn download_path(name: &str, explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    Path::new(name)
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| Error::FileNotFound(name.to_string()))
}

fn report(files: &[RemoteFile], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => println!("{}", format_files(files)),
        OutputFormat::Json => print_json(files)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
