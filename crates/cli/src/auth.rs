// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session token persistence.
//!
//! `ragq login` stores the access token in `credentials` next to
//! `config.toml`. `RAGQ_TOKEN` takes precedence over the stored token.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::env;
use crate::error::{Error, Result};

const CREDENTIALS_FILE_NAME: &str = "credentials";

/// A stored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Reads and writes the credentials file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store rooted at the config directory.
    pub fn new(config_dir: &Path) -> Self {
        TokenStore {
            path: config_dir.join(CREDENTIALS_FILE_NAME),
        }
    }

    /// Path of the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, if any.
    pub fn load(&self) -> Result<Option<Credentials>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let credentials: Credentials = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse credentials: {}", e)))?;
        Ok(Some(credentials))
    }

    /// Writes the session, readable only by the current user on unix.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(credentials)
            .map_err(|e| Error::Config(format!("failed to serialize credentials: {}", e)))?;

        let mut options = fs::OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(content.as_bytes())?;
        // `mode` only applies on create; tighten a file that already existed.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    /// Removes the stored session. Returns false if there was none.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// The token to send: `RAGQ_TOKEN` if set, else the stored one.
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(token) = env::token() {
            return Ok(token);
        }
        self.load()?
            .map(|c| c.token)
            .ok_or(Error::NotLoggedIn)
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
