//! File synchronization for staging areas.
//!
//! - **Staleness:** [`is_stale`] compares modification times
//! - **Mirroring:** [`copy_file`] / [`copy_tree`] skip up-to-date targets
//! - **Removal:** [`remove_tree`] / [`remove_subdirs`] honor exclusions
//! - **Archives:** [`zip_directory`] writes deflate zips with relative entry names
//!
//! Exclusions are regular expressions matched against the bare entry name,
//! never the full path. A matching directory is pruned with its whole subtree.

pub mod compress;
pub mod error;
pub mod exclude;
pub mod remove;
pub mod sync;

pub use compress::zip_directory;
pub use error::{FsyncError, Result};
pub use exclude::{ExcludeSet, MatchMode};
pub use remove::{remove_subdirs, remove_tree};
pub use sync::{copy_file, copy_tree, extension, is_stale, SyncStats};
