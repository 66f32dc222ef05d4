//! Restore of an archive into a remote repository.

pub mod differ;
pub mod error;
pub mod pipeline;

pub use error::{RestoreError, RestoreStage};
pub use pipeline::{RestoreOutcome, RestorePipeline, RestoreState};

use crate::archive::BackupArchive;
use crate::github::GitHost;
use crate::utils::Result;

/// Validate `archive` and commit it onto `branch` as a single new commit.
pub async fn restore_archive<H: GitHost + ?Sized>(
    host: &H,
    branch: &str,
    archive: &BackupArchive,
) -> Result<RestoreOutcome> {
    archive.validate()?;
    let outcome = RestorePipeline::new(host, branch, archive).run().await?;
    Ok(outcome)
}
