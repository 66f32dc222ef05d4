//! Content store reader.
//!
//! Reads markdown entries and JSON documents from the content tree. A missing
//! directory or document is not an error: it reads as empty. Every other I/O
//! failure propagates.

use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::archive::ArchiveEntry;

/// Extension of the files collected from content directories.
const MARKDOWN_EXTENSION: &str = ".md";

/// Text returned for a JSON document that does not exist.
pub const EMPTY_JSON: &str = "{}";

/// Read every markdown file directly inside `dir`, sorted by file name.
///
/// # Returns
/// * `Ok(vec![])` - If `dir` does not exist
/// * `Ok(entries)` - One entry per `*.md` regular file
/// * `Err(io::Error)` - Any other read failure
pub fn read_markdown_dir(dir: &Path) -> std::io::Result<Vec<ArchiveEntry>> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut entries = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 && is_not_found(&e) => {
                warn!("Directory not found: {}", dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if !file_name.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }

        let content = std::fs::read_to_string(entry.path())?;
        entries.push(ArchiveEntry {
            file_name: file_name.to_string(),
            content,
        });
    }

    debug!("Read {} markdown files from {}", entries.len(), dir.display());
    Ok(entries)
}

/// Read a JSON document as raw text, or `"{}"` if it does not exist.
pub fn read_json_document(path: &Path) -> std::io::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("File not found: {}", path.display());
            Ok(EMPTY_JSON.to_string())
        }
        Err(e) => Err(e),
    }
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .map(|io| io.kind() == ErrorKind::NotFound)
        .unwrap_or(false)
}
