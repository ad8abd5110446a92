// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ragq_core::{FileType, NewUpload};

use crate::api::SearchResponse;
use crate::cli::{OutputFormat, SearchCommand};
use crate::display::format_search_hits;
use crate::error::{Error, Result};

use super::{print_json, Context};

/// Execute a search subcommand.
pub async fn run(ctx: &Context, cmd: SearchCommand) -> Result<()> {
    match cmd {
        SearchCommand::Text {
            query,
            top_k,
            output,
        } => {
            let response = ctx
                .authed_client()?
                .search_text(&query, top_k.top_k)
                .await?;
            report(&response, output.output)
        }
        SearchCommand::Image {
            path,
            top_k,
            output,
        } => {
            let example = read_example_image(&path)?;
            let response = ctx
                .authed_client()?
                .search_image((&example).into(), top_k.top_k)
                .await?;
            report(&response, output.output)
        }
    }
}

/// Load the query image, refusing files that are not images.
pub fn read_example_image(path: &Path) -> Result<NewUpload> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if FileType::from_file_name(name) != Some(FileType::Image) {
        return Err(Error::InvalidFileType(name.to_string()));
    }
    Ok(NewUpload::from_path(path)?)
}

fn report(response: &SearchResponse, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => println!("{}", format_search_hits(&response.results)),
        OutputFormat::Json => print_json(&response.results)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
