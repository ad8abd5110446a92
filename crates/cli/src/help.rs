// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level help text.

use crate::colors;
use clap::builder::styling::Styles;

/// Clap styles matching [`colors::codes`].
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let fg = |code: u8| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    let header = fg(colors::codes::HEADER);
    let context = fg(colors::codes::CONTEXT);

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(fg(colors::codes::LITERAL))
        .placeholder(context)
        .valid(context)
}

/// Main help template: grouped commands before the options.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

const QUEUE_COMMANDS: &[(&str, &str)] = &[
    ("upload", "Queue files for upload and process them"),
    ("queue", "Inspect and manage the upload queue"),
];

const REPOSITORY_COMMANDS: &[(&str, &str)] = &[
    ("search", "Search documents by text or images by example"),
    ("files", "List, download, or delete your files"),
    ("admin", "Administrative views (admin accounts only)"),
    ("health", "Check server and component health"),
];

const SETUP_COMMANDS: &[(&str, &str)] = &[
    ("login", "Sign in and store a session token"),
    ("logout", "Forget the stored session"),
    ("whoami", "Show the signed-in account"),
    ("config", "Show or change settings"),
    ("completion", "Generate shell completions"),
];

fn section(title: &str, rows: &[(&str, &str)]) -> String {
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0) + 2;
    let mut out = colors::header(title);
    for (name, about) in rows {
        let pad = " ".repeat(width - name.len());
        out.push_str(&format!("\n  {}{}{}", colors::literal(name), pad, about));
    }
    out
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    [
        section("Uploads:", QUEUE_COMMANDS),
        section("Repository:", REPOSITORY_COMMANDS),
        section("Session & Setup:", SETUP_COMMANDS),
    ]
    .join("\n\n")
}

/// Quickstart shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  ragq login <username>          Sign in
  ragq upload report.pdf         Queue a document and upload it
  ragq queue list                Show the upload queue
  ragq search text \"query\"       Search indexed documents",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
