// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `login`, `logout`, and `whoami`.

use crate::auth::Credentials;
use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::prompt;

use super::{print_json, Context};

/// Exchange a username and password for a token and store it.
pub async fn login(ctx: &Context, username: &str, password_stdin: bool) -> Result<()> {
    let password = if password_stdin {
        prompt::read_stdin_line()?
    } else {
        prompt::read_password(&format!("Password for {}: ", username))?
    };
    if password.is_empty() {
        return Err(Error::FieldRequired { field: "Password" });
    }

    let response = ctx.client()?.login(username, &password).await?;
    ctx.tokens.save(&Credentials {
        token: response.access_token,
        username: Some(username.to_string()),
    })?;
    tracing::info!(username, "session stored");
    println!("Logged in as {}", username);
    Ok(())
}

/// Remove the stored token.
pub fn logout(ctx: &Context) -> Result<()> {
    if ctx.tokens.clear()? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

/// Ask the server who the current token belongs to.
pub async fn whoami(ctx: &Context, output: OutputFormat) -> Result<()> {
    let user = ctx.authed_client()?.me().await?;
    match output {
        OutputFormat::Text => {
            let role = if user.is_admin { " (admin)" } else { "" };
            println!("{}{}", user.username, role);
        }
        OutputFormat::Json => print_json(&user)?,
    }
    Ok(())
}
