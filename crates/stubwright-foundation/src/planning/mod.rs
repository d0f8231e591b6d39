//! Unified planning module for all plan-related types.

pub mod edit;
pub mod result;

pub use edit::*;
pub use result::*;
