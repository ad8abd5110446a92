// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule. Empty values are treated as unset.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns the value of `RAGQ_API_URL` if set.
pub fn api_url() -> Option<String> {
    non_empty(vars::RAGQ_API_URL)
}

/// Returns the value of `RAGQ_CONFIG_DIR` if set.
pub fn config_dir() -> Option<PathBuf> {
    non_empty(vars::RAGQ_CONFIG_DIR).map(PathBuf::from)
}

/// Returns the value of `RAGQ_DATA_DIR` if set.
pub fn data_dir() -> Option<PathBuf> {
    non_empty(vars::RAGQ_DATA_DIR).map(PathBuf::from)
}

/// Returns the value of `RAGQ_TOKEN` if set. Takes precedence over stored credentials.
pub fn token() -> Option<String> {
    non_empty(vars::RAGQ_TOKEN)
}

/// Returns the log filter from `RAGQ_LOG` if set.
pub fn log_filter() -> Option<String> {
    non_empty(vars::RAGQ_LOG)
}

/// Returns `true` if `NO_COLOR=1`.
pub fn no_color() -> bool {
    std::env::var(vars::NO_COLOR).is_ok_and(|v| v == "1")
}

/// Returns `true` if `COLOR=1`.
pub fn force_color() -> bool {
    std::env::var(vars::COLOR).is_ok_and(|v| v == "1")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
