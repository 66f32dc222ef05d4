use std::fmt;
use thiserror::Error;

use crate::utils::UpstreamError;

/// Remote stages of a restore, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStage {
    BranchResolution,
    TreeFetch,
    TreeCreation,
    CommitCreation,
    RefUpdate,
}

impl fmt::Display for RestoreStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RestoreStage::BranchResolution => "branch resolution",
            RestoreStage::TreeFetch => "tree fetch",
            RestoreStage::TreeCreation => "tree creation",
            RestoreStage::CommitCreation => "commit creation",
            RestoreStage::RefUpdate => "ref update",
        };
        f.write_str(name)
    }
}

/// Failure of one remote stage, carrying the host's raw error detail.
#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("Failed to resolve branch head: {0}")]
    BranchResolution(#[source] UpstreamError),

    #[error("Failed to fetch file tree: {0}")]
    TreeFetch(#[source] UpstreamError),

    #[error("Failed to create new tree: {0}")]
    TreeCreation(#[source] UpstreamError),

    #[error("Failed to create commit: {0}")]
    CommitCreation(#[source] UpstreamError),

    #[error("Failed to update branch ref: {0}")]
    RefUpdate(#[source] UpstreamError),
}

impl RestoreError {
    pub fn stage(&self) -> RestoreStage {
        match self {
            RestoreError::BranchResolution(_) => RestoreStage::BranchResolution,
            RestoreError::TreeFetch(_) => RestoreStage::TreeFetch,
            RestoreError::TreeCreation(_) => RestoreStage::TreeCreation,
            RestoreError::CommitCreation(_) => RestoreStage::CommitCreation,
            RestoreError::RefUpdate(_) => RestoreStage::RefUpdate,
        }
    }

    pub fn upstream(&self) -> &UpstreamError {
        match self {
            RestoreError::BranchResolution(e)
            | RestoreError::TreeFetch(e)
            | RestoreError::TreeCreation(e)
            | RestoreError::CommitCreation(e)
            | RestoreError::RefUpdate(e) => e,
        }
    }
}
