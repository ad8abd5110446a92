// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use ragq_core::{PassSummary, UploadStatus, UploadSummary};

use crate::api::{HealthReport, RemoteFile, SearchHit};

/// Characters of an upload id shown in listings.
pub const SHORT_ID_LEN: usize = 8;

/// Maximum snippet length in search output.
const SNIPPET_WIDTH: usize = 96;

/// Leading characters of an id, enough to pass to `ragq queue remove`.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Human-readable byte count: `512 B`, `1.5 KB`, `2.0 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Format a single queue entry line.
///
/// Failed entries get an indented second line with the error.
pub fn format_upload_line(entry: &UploadSummary) -> String {
    let mut line = format!(
        "- [{}] ({}) {}: {} ({})",
        entry.file_type,
        entry.status,
        short_id(&entry.id),
        entry.file_name,
        format_size(entry.size)
    );
    if entry.retry_count > 0 && entry.status != UploadStatus::Completed {
        let noun = if entry.retry_count == 1 { "attempt" } else { "attempts" };
        line.push_str(&format!(" [{} {}]", entry.retry_count, noun));
    }
    if let (UploadStatus::Failed, Some(message)) = (entry.status, &entry.error_message) {
        line.push_str(&format!("\n    error: {}", message));
    }
    line
}

/// Format the queue listing, one entry per line.
pub fn format_queue(entries: &[UploadSummary]) -> String {
    if entries.is_empty() {
        return "Upload queue is empty.".to_string();
    }
    entries
        .iter()
        .map(format_upload_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Count entries per status, in display order.
pub fn format_queue_counts(entries: &[UploadSummary]) -> String {
    let count = |status: UploadStatus| entries.iter().filter(|e| e.status == status).count();
    format!(
        "{} uploading, {} queued, {} failed, {} completed",
        count(UploadStatus::Uploading),
        count(UploadStatus::Queued),
        count(UploadStatus::Failed),
        count(UploadStatus::Completed)
    )
}

/// One-line report of a processing pass.
pub fn format_pass_summary(summary: &PassSummary) -> String {
    let mut line = format!(
        "Processed queue: {} completed, {} failed",
        summary.completed, summary.failed
    );
    if summary.requeued > 0 {
        line.push_str(&format!(", {} requeued", summary.requeued));
    }
    if summary.halted_unauthorized {
        line.push_str("\n  hint: session expired; run 'ragq login' then 'ragq queue process'");
    } else if summary.cancelled {
        line.push_str("\n  hint: the cancelled upload is still queued; run 'ragq queue process' to resume");
    }
    line
}

fn truncate(text: &str, width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return flat;
    }
    let cut: String = flat.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Format ranked search hits with optional page and snippet.
pub fn format_search_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No matches.".to_string();
    }
    let mut lines = Vec::new();
    for (rank, hit) in hits.iter().enumerate() {
        let mut line = format!("{}. {} (score {:.3})", rank + 1, hit.file_name, hit.score);
        if let Some(page) = hit.page {
            line.push_str(&format!(" p.{}", page));
        }
        lines.push(line);
        if let Some(snippet) = &hit.snippet {
            lines.push(format!("    {}", truncate(snippet, SNIPPET_WIDTH)));
        }
    }
    lines.join("\n")
}

/// Format stored assets, with owners when present.
pub fn format_files(files: &[RemoteFile]) -> String {
    if files.is_empty() {
        return "No files.".to_string();
    }
    files
        .iter()
        .map(|f| {
            let mut line = format!("- [{}] {} ({})", f.file_type, f.file_name, format_size(f.size));
            if let Some(owner) = &f.owner {
                line.push_str(&format!(" @{}", owner));
            }
            if let Some(at) = f.uploaded_at {
                line.push_str(&format!(" {}", at.format("%Y-%m-%d %H:%M")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format overall health and each component.
pub fn format_health(report: &HealthReport) -> String {
    let mut lines = vec![format!("status: {}", report.status)];
    for (name, component) in &report.components {
        let mut line = format!("  {}: {}", name, component.status);
        if let Some(detail) = &component.detail {
            line.push_str(&format!(" ({})", detail));
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
