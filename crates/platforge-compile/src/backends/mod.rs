//! Built-in compiler backends.

mod gcc;
mod msvc;
mod tcc;

pub use gcc::GccBackend;
pub use msvc::MsvcBackend;
pub use tcc::TccBackend;
