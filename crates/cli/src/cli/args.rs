// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Argument groups shared across commands via `#[command(flatten)]`.

use clap::builder::TypedValueParser;
use clap::Args;

use super::OutputFormat;

/// Default number of search results.
pub const DEFAULT_TOP_K: usize = 5;

/// `-o/--output` for commands with structured output.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct OutputArgs {
    /// Output format (text, json)
    #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Result count for search commands.
#[derive(Args, Clone, Copy, Debug)]
pub struct TopKArgs {
    /// Number of results to return
    #[arg(
        long = "top-k",
        short = 'k',
        default_value_t = DEFAULT_TOP_K,
        value_parser = clap::value_parser!(u16).range(1..=100).map(usize::from)
    )]
    pub top_k: usize,
}
