//! Restore commit pipeline.
//!
//! A restore is a single new commit on top of the branch head, produced by a
//! linear chain of states. Each transition performs at most one remote call
//! and either advances or fails the whole run with the stage that broke.
//! Nothing is rolled back: a failure after tree or commit creation leaves
//! unreferenced objects on the host, but the branch ref only moves in the
//! final transition.

use tracing::{debug, info, warn};

use super::differ::build_tree_changes;
use super::error::RestoreError;
use crate::archive::{timestamp_now, BackupArchive};
use crate::github::{GitHost, PendingTreeChange, RemoteTree};

/// Pipeline states, in order.
#[derive(Debug)]
pub enum RestoreState {
    Start,
    HeadResolved {
        head: String,
    },
    TreeFetched {
        head: String,
        tree: RemoteTree,
    },
    TreeBuilt {
        head: String,
        base_tree: String,
        changes: Vec<PendingTreeChange>,
    },
    TreeCreated {
        head: String,
        tree: String,
        summary: ChangeSummary,
    },
    CommitCreated {
        commit: String,
        tree: String,
        summary: ChangeSummary,
    },
    Done(RestoreOutcome),
}

/// Counts of the entries sent in the tree-creation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub deleted: usize,
    pub written: usize,
}

impl ChangeSummary {
    fn of(changes: &[PendingTreeChange]) -> Self {
        let deleted = changes.iter().filter(|c| c.is_delete()).count();
        Self {
            deleted,
            written: changes.len() - deleted,
        }
    }
}

/// Result of a successful restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub commit_sha: String,
    pub tree_sha: String,
    pub deleted: usize,
    pub written: usize,
}

/// Drives one restore of `archive` onto `branch`.
pub struct RestorePipeline<'a, H: GitHost + ?Sized> {
    host: &'a H,
    branch: &'a str,
    archive: &'a BackupArchive,
}

impl<'a, H: GitHost + ?Sized> RestorePipeline<'a, H> {
    pub fn new(host: &'a H, branch: &'a str, archive: &'a BackupArchive) -> Self {
        Self {
            host,
            branch,
            archive,
        }
    }

    /// Perform a single transition.
    pub async fn advance(&self, state: RestoreState) -> Result<RestoreState, RestoreError> {
        let next = match state {
            RestoreState::Start => {
                let head = self
                    .host
                    .branch_head(self.branch)
                    .await
                    .map_err(RestoreError::BranchResolution)?;
                debug!("Branch {} is at {}", self.branch, head);
                RestoreState::HeadResolved { head }
            }
            RestoreState::HeadResolved { head } => {
                let tree = self
                    .host
                    .fetch_tree(&head)
                    .await
                    .map_err(RestoreError::TreeFetch)?;
                if tree.truncated {
                    warn!(
                        "Tree listing for {} is truncated; some stale content may survive the restore",
                        head
                    );
                }
                RestoreState::TreeFetched { head, tree }
            }
            RestoreState::TreeFetched { head, tree } => {
                let changes = build_tree_changes(&tree.tree, self.archive);
                RestoreState::TreeBuilt {
                    head,
                    base_tree: tree.sha,
                    changes,
                }
            }
            RestoreState::TreeBuilt {
                head,
                base_tree,
                changes,
            } => {
                let summary = ChangeSummary::of(&changes);
                let tree = self
                    .host
                    .create_tree(&base_tree, &changes)
                    .await
                    .map_err(RestoreError::TreeCreation)?;
                debug!(
                    "Created tree {} ({} deleted, {} written)",
                    tree, summary.deleted, summary.written
                );
                RestoreState::TreeCreated { head, tree, summary }
            }
            RestoreState::TreeCreated { head, tree, summary } => {
                let message = commit_message(self.archive);
                let commit = self
                    .host
                    .create_commit(&message, &tree, &head)
                    .await
                    .map_err(RestoreError::CommitCreation)?;
                RestoreState::CommitCreated {
                    commit,
                    tree,
                    summary,
                }
            }
            RestoreState::CommitCreated {
                commit,
                tree,
                summary,
            } => {
                self.host
                    .update_ref(self.branch, &commit)
                    .await
                    .map_err(RestoreError::RefUpdate)?;
                RestoreState::Done(RestoreOutcome {
                    commit_sha: commit,
                    tree_sha: tree,
                    deleted: summary.deleted,
                    written: summary.written,
                })
            }
            done @ RestoreState::Done(_) => done,
        };
        Ok(next)
    }

    /// Run every transition until the branch has moved.
    pub async fn run(&self) -> Result<RestoreOutcome, RestoreError> {
        let mut state = RestoreState::Start;
        loop {
            state = match self.advance(state).await {
                Ok(RestoreState::Done(outcome)) => {
                    info!(
                        "Restored onto {} at {} ({} deleted, {} written)",
                        self.branch, outcome.commit_sha, outcome.deleted, outcome.written
                    );
                    return Ok(outcome);
                }
                Ok(next) => next,
                Err(e) => {
                    warn!("Restore failed during {}: {}", e.stage(), e);
                    return Err(e);
                }
            };
        }
    }
}

/// `Restore from backup created at <createdAt | now>`
pub fn commit_message(archive: &BackupArchive) -> String {
    let created_at = archive
        .created_at
        .as_deref()
        .filter(|ts| !ts.is_empty())
        .map(str::to_string)
        .unwrap_or_else(timestamp_now);
    format!("Restore from backup created at {}", created_at)
}
