//! Backup archive format and builder.
//!
//! An archive is a single JSON document holding every managed markdown file
//! and the raw text of the two JSON configuration documents. It is built
//! fresh for each backup and never persisted by this crate.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::fs::reader::{read_json_document, read_markdown_dir};
use crate::fs::ContentLayout;
use crate::utils::{Result, SyncError};

/// Backup archive, serialized with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupArchive {
    /// Snapshot time, ISO-8601. Absent in hand-written archives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub posts: Vec<ArchiveEntry>,
    pub categories: Vec<ArchiveEntry>,
    /// Raw settings JSON text, kept opaque.
    pub settings: String,
    /// Raw profile JSON text, kept opaque.
    pub profile: String,
}

/// A single markdown file in an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    pub file_name: String,
    pub content: String,
}

impl BackupArchive {
    /// Parse an archive from a request body or file.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| SyncError::MalformedInput(e.to_string()))
    }

    /// Load an archive file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested download name: `<prefix>-backup-<YYYY-MM-DD>.json`.
    pub fn suggested_file_name(&self, prefix: &str) -> String {
        let date = self
            .created_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%d");
        format!("{}-backup-{}.json", prefix, date)
    }

    /// Reject file names that would escape their managed directory.
    pub fn validate(&self) -> Result<()> {
        for (collection, entries) in [("posts", &self.posts), ("categories", &self.categories)] {
            for (index, entry) in entries.iter().enumerate() {
                if !is_plain_file_name(&entry.file_name) {
                    return Err(SyncError::MalformedInput(format!(
                        "{}[{}] has an invalid fileName: {:?}",
                        collection, index, entry.file_name
                    )));
                }
            }
        }
        Ok(())
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Current time in the archive timestamp format.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Snapshot the content tree under `layout` into a new archive.
///
/// Missing directories and documents read as empty; any other I/O error
/// aborts the whole build.
pub fn build_archive(layout: &ContentLayout) -> Result<BackupArchive> {
    let posts = read_markdown_dir(&layout.posts_dir())?;
    let categories = read_markdown_dir(&layout.categories_dir())?;
    let settings = read_json_document(&layout.settings_file())?;
    let profile = read_json_document(&layout.profile_file())?;

    info!(
        "Built archive from {}: {} posts, {} categories",
        layout.root().display(),
        posts.len(),
        categories.len()
    );

    Ok(BackupArchive {
        created_at: Some(timestamp_now()),
        posts,
        categories,
        settings,
        profile,
    })
}
