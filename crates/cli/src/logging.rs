// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging to stderr.
//!
//! Defaults to warnings only so command output stays clean. `RAGQ_LOG`
//! takes a standard `EnvFilter` directive, e.g. `ragq_core=debug`.

use tracing_subscriber::EnvFilter;

use crate::env;

const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from `RAGQ_LOG`, falling back to warnings.
pub fn filter() -> EnvFilter {
    env::log_filter()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Safe to call more than once.
pub fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!env::no_color())
        .try_init();
}
