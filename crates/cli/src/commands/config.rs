// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::error::{Error, Result};

use super::Context;

/// Execute a config subcommand.
pub fn run(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            print!("{}", render(&ctx.config)?);
            println!("\n# config dir: {}", ctx.config_dir.display());
            println!("# queue: {}", ctx.config.queue_db_path()?.display());
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            set(ctx, &key, &value)?;
            println!("Set {} = {}", key, value);
            Ok(())
        }
    }
}

/// The effective configuration as TOML.
pub fn render(config: &Config) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
}

/// Update one key in the config file. Environment overrides are not written back.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load(&ctx.config_dir)?;
    config.set(key, value)?;
    config.save(&ctx.config_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
