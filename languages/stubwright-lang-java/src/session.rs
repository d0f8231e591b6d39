//! Entry point running one augmentation request end to end

use crate::augmenter::{augment_batch, augment_named, Augmentation};
use crate::commit::{commit, EditResult};
use crate::framework::{apply_imports, FrameworkKind};
use crate::javadoc::LinkTarget;
use crate::tree::SourceTree;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use stubwright_foundation::StubResult;
use tracing::info;

/// Held for the whole of every run; at most one augmentation proceeds at a time
static AUGMENT_LOCK: Mutex<()> = Mutex::new(());

/// Which declarations a request augments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum TargetSelection {
    /// One named test method, documented with a link to `link`
    Single { method: String, link: LinkTarget },
    /// Every method of the primary type starting with `prefix`, linked to the class
    #[serde(rename_all = "camelCase")]
    Batch {
        prefix: String,
        class_under_test: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentRequest {
    pub selection: TargetSelection,
    pub framework: FrameworkKind,
}

impl AugmentRequest {
    pub fn single(method: impl Into<String>, link: LinkTarget, framework: FrameworkKind) -> Self {
        Self {
            selection: TargetSelection::Single {
                method: method.into(),
                link,
            },
            framework,
        }
    }

    pub fn batch(
        prefix: impl Into<String>,
        class_under_test: impl Into<String>,
        framework: FrameworkKind,
    ) -> Self {
        Self {
            selection: TargetSelection::Batch {
                prefix: prefix.into(),
                class_under_test: class_under_test.into(),
            },
            framework,
        }
    }

    /// Build a request from a configured framework identifier
    pub fn from_identifier(selection: TargetSelection, identifier: &str) -> StubResult<Self> {
        Ok(Self {
            selection,
            framework: FrameworkKind::from_identifier(identifier)?,
        })
    }
}

pub struct Session;

impl Session {
    /// Augment the requested declarations of `tree` and render the result
    /// against `original`.
    ///
    /// `tree` must have been parsed from `original`; any divergence surfaces
    /// as a diff application error and no text is returned.
    pub fn run(
        original: &str,
        tree: &mut SourceTree,
        request: &AugmentRequest,
    ) -> StubResult<EditResult> {
        let _guard = AUGMENT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let policy = request.framework.policy();

        info!(framework = %request.framework, selection = ?request.selection, "Augmentation requested");

        let (changed, navigate_to) = match &request.selection {
            TargetSelection::Single { method, link } => {
                match augment_named(tree, method, &policy, link)? {
                    Augmentation::Changed => (vec![method.clone()], Some(method.clone())),
                    Augmentation::Unchanged => (Vec::new(), None),
                }
            }
            TargetSelection::Batch {
                prefix,
                class_under_test,
            } => {
                let outcome = augment_batch(tree, prefix, &policy, class_under_test)?;
                (outcome.changed, outcome.jump_to)
            }
        };

        let Some(navigate_to) = navigate_to else {
            info!("No declaration changed");
            return Ok(EditResult::NoChanges);
        };

        let added = apply_imports(tree, &policy);
        info!(added, navigate_to = %navigate_to, "Applied framework imports");

        commit(original, tree, changed, &navigate_to)
    }

    /// Parse `original` and run the request against it
    pub fn run_source(original: &str, request: &AugmentRequest) -> StubResult<EditResult> {
        let mut tree = SourceTree::parse(original)?;
        Self::run(original, &mut tree, request)
    }
}
