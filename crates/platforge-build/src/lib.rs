//! The platforge build orchestrator.
//!
//! Each target goes through a linear pipeline that stops at the first
//! failure:
//!
//! resolve -> clean -> generate -> compile -> publish -> package
//!
//! Nothing is retried and completed steps are not rolled back, so a failed
//! compile leaves the generated sources in the staging directory.

pub mod error;
pub mod generator;
pub mod layout;
pub mod pipeline;
pub mod props;
pub mod report;
pub mod target;

pub use error::{BuildError, Result, TargetError};
pub use generator::Generator;
pub use layout::Layout;
pub use pipeline::{clean_target, Orchestrator, Step};
pub use report::{BuildReport, StepTiming};
pub use target::{ArchiveOptions, BuildOptions, SocketFamily, TargetSpec};
