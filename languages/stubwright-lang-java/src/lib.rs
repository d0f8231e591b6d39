//! Java test-stub augmentation
//!
//! Parses a Java test file into an owned [`SourceTree`], augments freshly
//! generated test methods according to a [`FrameworkKind`], and renders the
//! changes back into text the caller can save.
//!
//! ```no_run
//! use stubwright_lang_java::{AugmentRequest, EditResult, FrameworkKind, LinkTarget, Session};
//!
//! let source = std::fs::read_to_string("CircleTest.java").unwrap();
//! let request = AugmentRequest::single(
//!     "testArea",
//!     LinkTarget::method("Circle", "area", vec![]),
//!     FrameworkKind::Annotated,
//! );
//! if let EditResult::Changed(file) = Session::run_source(&source, &request).unwrap() {
//!     std::fs::write("CircleTest.java", file.text).unwrap();
//! }
//! ```

pub mod augmenter;
pub mod commit;
pub mod constants;
pub mod framework;
pub mod javadoc;
pub mod list;
pub mod locator;
mod parser;
pub mod session;
pub mod tree;

pub use augmenter::{augment, augment_batch, augment_named, Augmentation, BatchOutcome};
pub use commit::{apply_edit_plan, commit, render_edits, ChangedFile, EditResult, NavigationTarget, Position};
pub use framework::{apply_imports, FrameworkKind, FrameworkPolicy};
pub use javadoc::{link_for_class, link_for_method, strip_type_arguments, LinkTarget};
pub use locator::{find_method, locate_method};
pub use session::{AugmentRequest, Session, TargetSelection};
pub use tree::SourceTree;
