//! Content Sync Library
//!
//! Snapshots blog content into a portable JSON archive and restores such an
//! archive into a GitHub repository as a single commit.

pub mod archive;
pub mod config;
pub mod fs;
pub mod github;
pub mod restore;
pub mod utils;

// Re-export commonly used types
pub use archive::{build_archive, ArchiveEntry, BackupArchive};
pub use config::{Config, GitHubConfig, RepoTarget};
pub use fs::ContentLayout;
pub use github::{GitHost, GitHubClient};
pub use restore::{restore_archive, RestoreError, RestoreOutcome, RestoreStage};
pub use utils::errors::{SyncError, UpstreamError};
pub type Result<T> = std::result::Result<T, SyncError>;
