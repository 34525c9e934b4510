//! Shared plumbing for the platforge build orchestrator.
//!
//! Every other crate in the workspace depends on this one for:
//! - **Failure taxonomy:** the four classes every error maps onto
//! - **Platform identifiers:** the dash-separated `os-arch-variant` key
//! - **External tools:** a `ToolRunner` seam over process spawning
//! - **Content hashing:** SHA-256 digests of produced archives

pub mod error;
pub mod failure;
pub mod hash;
pub mod platform_id;
pub mod process;

pub use error::{PlatformIdError, ProcessError};
pub use failure::{Classify, FailureClass};
pub use hash::ContentHash;
pub use platform_id::PlatformId;
pub use process::{RecordingRunner, SystemRunner, ToolInvocation, ToolRunner, ToolStatus};
