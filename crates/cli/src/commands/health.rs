// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::OutputFormat;
use crate::display::format_health;
use crate::error::{Error, Result};

use super::{print_json, Context};

/// Print server health. Sends the session token when one is available.
///
/// An unhealthy report is an error so scripts can test the exit status.
pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let client = match ctx.authed_client() {
        Ok(client) => client,
        Err(Error::NotLoggedIn) => ctx.client()?,
        Err(e) => return Err(e),
    };
    let report = client.health().await?;
    match output {
        OutputFormat::Text => println!("{}", format_health(&report)),
        OutputFormat::Json => print_json(&report)?,
    }
    if report.is_healthy() {
        Ok(())
    } else {
        Err(Error::Unhealthy(report.status))
    }
}
