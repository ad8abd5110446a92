// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Hidden password entry.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::error::{Error, Result};

/// Effect of one key press on the password buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Submit,
    Cancel,
}

/// Apply a key press to `buffer`.
pub fn apply_key(buffer: &mut String, key: KeyEvent) -> KeyOutcome {
    if key.kind == KeyEventKind::Release {
        return KeyOutcome::Continue;
    }
    match key.code {
        KeyCode::Enter => KeyOutcome::Submit,
        KeyCode::Esc => KeyOutcome::Cancel,
        KeyCode::Char('c') | KeyCode::Char('d')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            KeyOutcome::Cancel
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            buffer.clear();
            KeyOutcome::Continue
        }
        KeyCode::Backspace => {
            buffer.pop();
            KeyOutcome::Continue
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}

/// Prompt on stderr and read a password without echo.
pub fn read_password(prompt: &str) -> Result<String> {
    if !io::stdin().is_terminal() {
        return Err(Error::TtyRequired);
    }
    let mut stderr = io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;

    terminal::enable_raw_mode()?;
    let mut buffer = String::new();
    let outcome = loop {
        let evt = match event::read() {
            Ok(evt) => evt,
            Err(e) => {
                let _ = terminal::disable_raw_mode();
                return Err(Error::Io(e));
            }
        };
        if let Event::Key(key) = evt {
            match apply_key(&mut buffer, key) {
                KeyOutcome::Continue => {}
                done => break done,
            }
        }
    };
    let _ = terminal::disable_raw_mode();
    let _ = writeln!(stderr);

    match outcome {
        KeyOutcome::Submit => Ok(buffer),
        _ => Err(Error::Cancelled),
    }
}

/// Read one line from stdin, without its line ending.
pub fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
