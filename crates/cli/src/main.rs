// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use ragq_cli::Cli;

fn main() {
    let cli = Cli::parse();
    ragq_cli::logging::setup_logging();
    if let Err(e) = ragq_cli::run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
