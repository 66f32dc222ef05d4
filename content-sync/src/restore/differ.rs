//! Repository tree differ.
//!
//! Restores use a full-replace strategy for the managed prefixes: every blob
//! that currently exists under them is marked for deletion and the archive's
//! files are written back on top. A file added to the repository under a
//! managed prefix since the archive was taken does not survive a restore.

use crate::archive::BackupArchive;
use crate::fs::layout::{CATEGORIES_PREFIX, MANAGED_PREFIXES, POSTS_PREFIX, PROFILE_PATH, SETTINGS_PATH};
use crate::github::{EntryKind, PendingTreeChange, RemoteTreeEntry};

/// Deletion markers for every existing blob under `prefixes`, in listing order.
pub fn deletion_markers(tree: &[RemoteTreeEntry], prefixes: &[&str]) -> Vec<PendingTreeChange> {
    tree.iter()
        .filter(|entry| entry.kind == EntryKind::Blob)
        .filter(|entry| prefixes.iter().any(|prefix| entry.path.starts_with(prefix)))
        .map(|entry| PendingTreeChange::delete(entry.path.clone()))
        .collect()
}

/// Full list of tree entries for restoring `archive` over `tree`.
///
/// Order: deletions, settings, profile, posts, categories.
pub fn build_tree_changes(tree: &[RemoteTreeEntry], archive: &BackupArchive) -> Vec<PendingTreeChange> {
    let mut changes = deletion_markers(tree, &MANAGED_PREFIXES);
    changes.reserve(2 + archive.posts.len() + archive.categories.len());

    changes.push(PendingTreeChange::write(SETTINGS_PATH, archive.settings.clone()));
    changes.push(PendingTreeChange::write(PROFILE_PATH, archive.profile.clone()));

    for post in &archive.posts {
        changes.push(PendingTreeChange::write(
            format!("{}{}", POSTS_PREFIX, post.file_name),
            post.content.clone(),
        ));
    }
    for category in &archive.categories {
        changes.push(PendingTreeChange::write(
            format!("{}{}", CATEGORIES_PREFIX, category.file_name),
            category.content.clone(),
        ));
    }

    changes
}
