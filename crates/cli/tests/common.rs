// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Shared by several test binaries; not every binary uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use mockito::{Matcher, Server, ServerGuard};
pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub const TOKEN: &str = "test-token";

/// Isolated config and data directories for one test.
pub struct TestEnv {
    pub temp: TempDir,
    api_url: String,
    token: Option<String>,
}

impl TestEnv {
    /// Environment pointing at `api_url`, logged in with [`TOKEN`].
    pub fn new(api_url: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        // No backoff between attempts.
        fs::write(
            config_dir.join("config.toml"),
            "timeout_secs = 5\n\n[queue]\nbase_delay_ms = 0\n",
        )
        .unwrap();
        TestEnv {
            temp,
            api_url: api_url.to_string(),
            token: Some(TOKEN.to_string()),
        }
    }

    /// Environment with a server URL nothing listens on.
    pub fn offline() -> Self {
        Self::new("http://127.0.0.1:9")
    }

    /// Drop the `RAGQ_TOKEN` session.
    pub fn logged_out(mut self) -> Self {
        self.token = None;
        self
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp.path().join("data")
    }

    /// Write a file under the temp dir and return its path.
    pub fn file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.temp.path().join("files").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    pub fn ragq(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("ragq");
        cmd.env("RAGQ_CONFIG_DIR", self.config_dir())
            .env("RAGQ_DATA_DIR", self.data_dir())
            .env("RAGQ_API_URL", &self.api_url)
            .env("NO_COLOR", "1")
            .env_remove("RAGQ_LOG")
            .env_remove("COLOR")
            .current_dir(self.temp.path());
        match &self.token {
            Some(token) => cmd.env("RAGQ_TOKEN", token),
            None => cmd.env_remove("RAGQ_TOKEN"),
        };
        cmd
    }

    /// `ragq queue list -o json` parsed.
    pub fn queue_json(&self) -> Vec<serde_json::Value> {
        let output = self
            .ragq()
            .args(["queue", "list", "-o", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}
