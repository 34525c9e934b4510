//! Compiler backends for platforge.
//!
//! A [`CompilerBackend`] turns a [`BuildRequest`] into one external compiler
//! invocation. Backends are looked up by name in a [`BackendRegistry`] that is
//! populated once at startup; toolchain settings arrive through an immutable
//! [`ToolchainEnv`].

pub mod backend;
pub mod backends;
pub mod error;
pub mod request;
pub mod sources;
pub mod toolchain;

pub use backend::{BackendRegistry, CompilerBackend};
pub use error::{CompileError, Result};
pub use request::{BuildRequest, Definitions};
pub use sources::resolve_sources;
pub use toolchain::ToolchainEnv;
