pub mod analysis;
pub mod api;
pub mod ast;
pub mod cli;
pub mod diagnostic;
pub mod instrument;

// Re-export public API — `solguard::harden_source()` etc.
pub use api::*;
pub use diagnostic::{Diagnostic, Severity};
