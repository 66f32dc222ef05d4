//! Utility modules for content sync.

pub mod errors;
pub mod logger;

pub use errors::{Result, SyncError, UpstreamError};
