//! Git data API of the hosting service.
//!
//! The restore pipeline talks to the remote repository only through the
//! [`GitHost`] trait; [`client::GitHubClient`] is the HTTP implementation.

pub mod client;

use async_trait::async_trait;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::utils::UpstreamError;

pub use client::GitHubClient;

/// Mode of every file written by a restore (regular, non-executable).
pub const FILE_MODE: &str = "100644";

/// Object kind of an entry in a remote tree listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodule reference.
    Commit,
    #[serde(other)]
    Other,
}

/// One entry of a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub sha: String,
}

/// Recursive listing of a commit's root tree.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTree {
    /// Sha of the root tree itself.
    pub sha: String,
    pub tree: Vec<RemoteTreeEntry>,
    /// Set by the host when the listing was cut short.
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobChange {
    Delete,
    Write(String),
}

/// One entry of a tree-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTreeChange {
    pub path: String,
    pub change: BlobChange,
}

impl PendingTreeChange {
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            change: BlobChange::Delete,
        }
    }

    pub fn write(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            change: BlobChange::Write(content.into()),
        }
    }

    pub fn is_delete(&self) -> bool {
        self.change == BlobChange::Delete
    }
}

// Wire form: `{path, mode, type, sha: null}` or `{path, mode, type, content}`.
impl Serialize for PendingTreeChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PendingTreeChange", 4)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("mode", FILE_MODE)?;
        state.serialize_field("type", "blob")?;
        match &self.change {
            BlobChange::Delete => state.serialize_field("sha", &None::<&str>)?,
            BlobChange::Write(content) => state.serialize_field("content", content)?,
        }
        state.end()
    }
}

/// The five remote operations a restore performs, in order.
#[async_trait]
pub trait GitHost: Send + Sync {
    /// Sha of the commit the branch currently points at.
    async fn branch_head(&self, branch: &str) -> Result<String, UpstreamError>;

    /// Recursive listing of the tree of `commit_sha`.
    async fn fetch_tree(&self, commit_sha: &str) -> Result<RemoteTree, UpstreamError>;

    /// Create a tree from `changes` applied on top of `base_tree`; returns its sha.
    async fn create_tree(
        &self,
        base_tree: &str,
        changes: &[PendingTreeChange],
    ) -> Result<String, UpstreamError>;

    /// Create a commit of `tree_sha` with a single parent; returns its sha.
    async fn create_commit(
        &self,
        message: &str,
        tree_sha: &str,
        parent_sha: &str,
    ) -> Result<String, UpstreamError>;

    /// Move `branch` to `commit_sha`. Non-forced: the host rejects a
    /// non-fast-forward update.
    async fn update_ref(&self, branch: &str, commit_sha: &str) -> Result<(), UpstreamError>;
}
