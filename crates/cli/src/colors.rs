// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal colors for help output.
//!
//! `NO_COLOR=1` disables colors; `COLOR=1` forces them without a TTY.

use std::io::IsTerminal;

use crate::env;

/// ANSI 256-color codes.
pub mod codes {
    /// Section headers
    pub const HEADER: u8 = 74;
    /// Commands and flags
    pub const LITERAL: u8 = 250;
    /// Placeholders, quoted values, hints
    pub const CONTEXT: u8 = 245;

    pub const HEADER_START: &str = "\x1b[38;5;74m";
    pub const LITERAL_START: &str = "\x1b[38;5;250m";
    pub const CONTEXT_START: &str = "\x1b[38;5;245m";
    pub const RESET: &str = "\x1b[0m";
}

/// True if help output should be colored.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn paint(code: u8, text: &str) -> String {
    format!("\x1b[38;5;{}m{}{}", code, text, codes::RESET)
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

pub fn literal(text: &str) -> String {
    paint(codes::LITERAL, text)
}

pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

/// Colorize an examples block.
///
/// Lines ending in `:` are headers. Other lines split at the first run of
/// two or more spaces into a command and its description; only the command
/// is colored.
pub fn examples(text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }
    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let indent = &line[..line.len() - trimmed.len()];
            if trimmed.ends_with(':') && !trimmed.contains("  ") {
                return format!("{}{}", indent, header(trimmed));
            }
            match find_description_start(trimmed) {
                Some(end) => format!(
                    "{}{}{}",
                    indent,
                    colorize_command(&trimmed[..end]),
                    &trimmed[end..]
                ),
                None if !trimmed.is_empty() => format!("{}{}", indent, colorize_command(trimmed)),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Color a command line word by word: `<placeholders>`, quoted strings, and
/// `-x VALUE` values as context, everything else as literal.
pub fn colorize_command(cmd: &str) -> String {
    let mut out = Vec::new();
    let mut words = cmd.split(' ').peekable();
    let mut after_flag = false;
    while let Some(word) = words.next() {
        if word.is_empty() {
            out.push(String::new());
            continue;
        }
        let is_value = word.starts_with('<') || word.starts_with('"') || after_flag;
        after_flag = word.starts_with('-') && !word.contains('=') && takes_value(word);
        if is_value {
            out.push(context(word));
        } else {
            out.push(literal(word));
        }
    }
    out.join(" ")
}

/// Flags in examples that are followed by a value.
fn takes_value(flag: &str) -> bool {
    matches!(flag, "-k" | "--top-k" | "-o" | "--output" | "-t" | "--type")
}

/// Byte offset where a description starts (two or more spaces after the command).
pub fn find_description_start(line: &str) -> Option<usize> {
    let start = line.find("  ")?;
    let rest = &line[start..];
    let desc = rest.len() - rest.trim_start().len();
    if start + desc >= line.len() {
        return None;
    }
    Some(start)
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
