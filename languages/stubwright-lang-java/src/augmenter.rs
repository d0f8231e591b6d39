//! Test method augmentation
//!
//! A freshly generated stub is recognized by its empty throws clause. The
//! augmenter makes it declare the broad exception, documents it with a link
//! to the code under test and, for the grouping framework, replaces its
//! annotations with a grouped test marker.

use crate::constants::{TAG_THROWS, THROWS_DESCRIPTION};
use crate::framework::FrameworkPolicy;
use crate::javadoc::{DocFragment, Javadoc, LinkTarget, TagElement};
use crate::list::insert_first;
use crate::locator::locate_method;
use crate::tree::{MethodDeclaration, Modifier, SourceTree};
use serde::Serialize;
use stubwright_foundation::StubResult;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Augmentation {
    Changed,
    /// The declaration already had a throws clause and was left alone
    Unchanged,
}

/// Augment a single method declaration.
///
/// A declaration with a non-empty throws clause is treated as already
/// processed and is not touched. Otherwise the broad exception is appended,
/// the documentation block is replaced wholesale, and the annotation rewrite
/// of the policy (if any) is applied.
pub fn augment(
    declaration: &mut MethodDeclaration,
    policy: &FrameworkPolicy,
    link: &LinkTarget,
) -> Augmentation {
    if !declaration.thrown_exceptions().is_empty() {
        debug!(
            method = declaration.name(),
            thrown = ?declaration.thrown_exceptions(),
            "Declaration already processed, skipping"
        );
        return Augmentation::Unchanged;
    }

    info!(
        method = declaration.name(),
        framework = %policy.kind,
        "Modifying test method"
    );

    declaration
        .thrown_exceptions_mut()
        .push(policy.broad_exception.to_string());

    let mut doc = Javadoc::new();
    doc.push_tag(TagElement::description(link.description()));
    doc.push_tag(TagElement::named(
        TAG_THROWS,
        vec![
            DocFragment::Name(policy.broad_exception.to_string()),
            DocFragment::Text(THROWS_DESCRIPTION.to_string()),
        ],
    ));
    declaration.set_javadoc(Some(doc));

    if let Some(rewrite) = &policy.annotation_rewrite {
        let modifiers = declaration.modifiers_mut();
        let removed = modifiers.remove_annotations();
        insert_first(modifiers, Modifier::Annotation(rewrite.annotation()));
        debug!(
            method = declaration.name(),
            removed, "Replaced annotations with grouped test marker"
        );
    }

    Augmentation::Changed
}

/// Locate `name` in the tree and augment it
pub fn augment_named(
    tree: &mut SourceTree,
    name: &str,
    policy: &FrameworkPolicy,
    link: &LinkTarget,
) -> StubResult<Augmentation> {
    let declaration = locate_method(tree, name)?;
    Ok(augment(declaration, policy, link))
}

/// Outcome of augmenting every candidate of a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Changed declarations in processing order
    pub changed: Vec<String>,
    pub unchanged: Vec<String>,
    /// Declaration the caller should reveal: the last one changed
    pub jump_to: Option<String>,
}

/// Augment every method of the file's primary type whose name starts with
/// `prefix`, linking each to `class_under_test`.
///
/// Candidates are processed in document order and each one is looked up again
/// by name before it is augmented.
pub fn augment_batch(
    tree: &mut SourceTree,
    prefix: &str,
    policy: &FrameworkPolicy,
    class_under_test: &str,
) -> StubResult<BatchOutcome> {
    let candidates: Vec<String> = match tree.primary_type() {
        Some(primary) => primary
            .methods()
            .filter(|method| method.name().starts_with(prefix))
            .map(|method| method.name().to_string())
            .collect(),
        None => Vec::new(),
    };

    info!(
        prefix,
        candidates = candidates.len(),
        class_under_test,
        "Augmenting test methods in batch"
    );

    let link = LinkTarget::class(class_under_test);
    let mut outcome = BatchOutcome::default();
    for name in candidates {
        match augment_named(tree, &name, policy, &link)? {
            Augmentation::Changed => {
                outcome.jump_to = Some(name.clone());
                outcome.changed.push(name);
            }
            Augmentation::Unchanged => outcome.unchanged.push(name),
        }
    }
    Ok(outcome)
}
