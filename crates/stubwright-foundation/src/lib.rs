//! Foundation Layer - error handling and edit-plan protocol types
//!
//! This crate provides the building blocks shared by every stubwright crate:
//! - `error`: the `StubError` type and its machine-readable codes
//! - `planning`: text edits, edit plans and their application results

pub mod error;
pub mod planning;

// Re-export commonly used types for convenience
pub use error::*;
pub use planning::*;
