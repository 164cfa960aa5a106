//! Shared utilities

pub mod diagnostic;
pub mod fs;
pub mod hash;

pub use diagnostic::Diagnostic;
