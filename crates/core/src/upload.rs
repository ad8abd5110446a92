// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Upload queue entry types.
//!
//! A [`QueuedUpload`] is the unit of work: one file, its payload, and the
//! state the processor has driven it to. [`UploadSummary`] is the same entry
//! without the payload, used for listings and progress reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Kind of asset, which selects the transmission endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// PDF documents, indexed for text retrieval.
    Document,
    /// Images, indexed for visual similarity search.
    Image,
}

impl FileType {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Document => "document",
            FileType::Image => "image",
        }
    }

    /// Infers the file type from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Option<FileType> {
        let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(FileType::Document),
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tif" | "tiff" => {
                Some(FileType::Image)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "document" | "doc" | "pdf" => Ok(FileType::Document),
            "image" | "img" => Ok(FileType::Image),
            _ => Err(Error::InvalidFileType(s.to_string())),
        }
    }
}

/// Processing state of a queued upload.
///
/// ```text
/// queued ──► uploading ──► completed
///   ▲            │
///   └────────────┤ (cancelled, unauthorized)
///                ▼
///              failed ──(manual retry)──► queued
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Waiting for the processor.
    Queued,
    /// Currently being transmitted. At most one entry is in this state.
    Uploading,
    /// Accepted by the backend. Terminal.
    Completed,
    /// Gave up; only a manual retry moves it back to `Queued`.
    Failed,
}

impl UploadStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Queued => "queued",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Completed => "completed",
            UploadStatus::Failed => "failed",
        }
    }

    /// Returns true for states the processor still has to act on.
    pub fn is_pending(&self) -> bool {
        matches!(self, UploadStatus::Queued | UploadStatus::Uploading)
    }

    /// Sort rank for listings: active entries first, then failed, then completed.
    pub fn display_rank(&self) -> u8 {
        match self {
            UploadStatus::Uploading => 0,
            UploadStatus::Queued => 1,
            UploadStatus::Failed => 2,
            UploadStatus::Completed => 3,
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UploadStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "queued" => Ok(UploadStatus::Queued),
            "uploading" => Ok(UploadStatus::Uploading),
            "completed" => Ok(UploadStatus::Completed),
            "failed" => Ok(UploadStatus::Failed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// A file handed to the queue, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpload {
    pub file_name: String,
    pub content_type: String,
    pub payload: Vec<u8>,
}

impl NewUpload {
    /// Creates an upload, inferring the MIME type from the file name.
    pub fn new(file_name: impl Into<String>, payload: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        NewUpload { file_name, content_type, payload }
    }

    /// Reads a file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let payload = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        Ok(NewUpload::new(file_name, payload))
    }
}

/// A persisted upload entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUpload {
    /// Unique id generated at enqueue time.
    pub id: String,
    pub file_name: String,
    pub file_type: FileType,
    pub content_type: String,
    /// Raw file content, owned by the entry until it reaches a terminal state.
    pub payload: Vec<u8>,
    pub status: UploadStatus,
    /// Number of transmission attempts made.
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    /// Last failure diagnostic; only set when `status` is `Failed`.
    pub error_message: Option<String>,
}

impl QueuedUpload {
    /// Returns the entry without its payload.
    pub fn summary(&self) -> UploadSummary {
        UploadSummary {
            id: self.id.clone(),
            file_name: self.file_name.clone(),
            file_type: self.file_type,
            content_type: self.content_type.clone(),
            size: self.payload.len() as u64,
            status: self.status,
            retry_count: self.retry_count,
            created_at: self.created_at,
            error_message: self.error_message.clone(),
        }
    }
}

/// A queue entry without its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub id: String,
    pub file_name: String,
    pub file_type: FileType,
    pub content_type: String,
    /// Payload size in bytes.
    pub size: u64,
    pub status: UploadStatus,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Sorts entries for display: by status rank, then oldest first.
pub fn sort_for_display(entries: &mut [UploadSummary]) {
    entries.sort_by(|a, b| {
        a.status
            .display_rank()
            .cmp(&b.status.display_rank())
            .then(a.created_at.cmp(&b.created_at))
    });
}

/// Returns the MIME type for a file name, by extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
