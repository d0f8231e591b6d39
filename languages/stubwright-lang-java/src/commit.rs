//! Rendering of tree changes into text edits and their application
//!
//! Every tracked value of the tree whose current state differs from the
//! parsed one becomes one [`TextEdit`] over the region it was read from. The
//! edits are then applied in a single pass over the caller's copy of the
//! original text, which must still match what the tree was parsed from.

use crate::locator::find_method;
use crate::tree::{ImportAnchor, ImportDeclaration, MethodDeclaration, SourceTree};
use serde::Serialize;
use std::cmp::Reverse;
use stubwright_foundation::{
    line_column, ByteSpan, EditPlan, EditPlanResult, EditType, StubError, StubResult, TextEdit,
};
use tracing::{debug, info, warn};

const JAVADOC_PRIORITY: u32 = 100;
const MODIFIERS_PRIORITY: u32 = 90;
const THROWS_PRIORITY: u32 = 80;
const IMPORTS_PRIORITY: u32 = 70;

/// 0-based line and byte column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// The declaration the caller should reveal after saving
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationTarget {
    pub name: String,
    /// Start of the declaration's name in the new text
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFile {
    pub text: String,
    /// Changed declarations in processing order
    pub changed: Vec<String>,
    pub navigation: NavigationTarget,
    pub applied_edits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum EditResult {
    NoChanges,
    Changed(ChangedFile),
}

/// Build the edit plan turning the tree's source text into its current state
pub fn render_edits(tree: &SourceTree) -> StubResult<EditPlan> {
    let source = tree.source();
    let line_ending = tree.line_ending();
    let mut plan = EditPlan::new("augment_test_methods");

    if let Some(edit) = import_edit(tree)? {
        plan.edits.push(edit);
    }
    for method in tree.methods() {
        if method.is_modified() {
            plan.edits.extend(method_edits(source, line_ending, method));
            plan.metadata.impact_areas.push(method.name().to_string());
        }
    }

    for edit in &plan.edits {
        debug!(
            kind = ?edit.edit_type,
            start = edit.span.start,
            end = edit.span.end,
            new_text = %edit.new_text,
            "Rendered edit"
        );
    }
    Ok(plan)
}

fn method_edits(source: &str, line_ending: &str, method: &MethodDeclaration) -> Vec<TextEdit> {
    let layout = method.layout();
    let indent = &layout.indent;
    let mut edits = Vec::new();

    // a doc comment inside the modifier list moves in front of it
    let together = layout.javadoc_in_modifiers
        && (method.javadoc.is_modified() || method.modifiers.is_modified());

    if method.javadoc.is_modified() || together {
        let new_text = match method.javadoc() {
            Some(doc) => format!("{}{}{}", doc.render(indent, line_ending), line_ending, indent),
            None => String::new(),
        };
        edits.push(TextEdit::replace(
            source,
            EditType::Documentation,
            layout.javadoc_region,
            new_text,
            JAVADOC_PRIORITY,
            format!("Document '{}'", method.name()),
        ));
    }

    if method.modifiers.is_modified() || together {
        edits.push(TextEdit::replace(
            source,
            EditType::Modifiers,
            layout.modifiers_region,
            method.modifiers().render(indent, line_ending),
            MODIFIERS_PRIORITY,
            format!("Rewrite modifiers of '{}'", method.name()),
        ));
    }

    if method.thrown.is_modified() {
        let thrown = method.thrown_exceptions();
        let new_text = if thrown.is_empty() {
            String::new()
        } else {
            format!(" throws {}", thrown.join(", "))
        };
        edits.push(TextEdit::replace(
            source,
            EditType::Throws,
            layout.throws_region,
            new_text,
            THROWS_PRIORITY,
            format!("Declare thrown exceptions of '{}'", method.name()),
        ));
    }

    edits
}

fn import_edit(tree: &SourceTree) -> StubResult<Option<TextEdit>> {
    if !tree.imports.is_modified() {
        return Ok(None);
    }

    let original = tree.imports.original();
    let current = tree.imports.get();
    let added: &[ImportDeclaration] = current
        .strip_prefix(original.as_slice())
        .ok_or_else(|| StubError::diff_application("Existing imports were reordered or removed"))?;
    let rendered: Vec<String> = added.iter().map(ImportDeclaration::render).collect();
    let eol = tree.line_ending();

    let (offset, new_text) = match tree.import_anchor {
        ImportAnchor::AfterLastImport(end) => (
            end,
            rendered
                .iter()
                .map(|line| format!("{}{}", eol, line))
                .collect::<String>(),
        ),
        ImportAnchor::AfterPackage(end) => (end, format!("{eol}{eol}{}", rendered.join(eol))),
        ImportAnchor::FileStart => (0, format!("{}{eol}{eol}", rendered.join(eol))),
    };

    Ok(Some(TextEdit::replace(
        tree.source(),
        EditType::AddImport,
        ByteSpan::at(offset),
        new_text,
        IMPORTS_PRIORITY,
        format!("Add {} import(s)", added.len()),
    )))
}

/// Apply a plan to `original` in one forward pass.
///
/// Fails when an edit lies outside the text, splits a character, overlaps an
/// earlier edit, or expects text that `original` does not contain at its span.
pub fn apply_edit_plan(original: &str, plan: &EditPlan) -> StubResult<EditPlanResult> {
    let mut edits: Vec<&TextEdit> = plan.edits.iter().collect();
    edits.sort_by_key(|edit| (edit.span.start, edit.span.end, Reverse(edit.priority)));

    let mut output = String::with_capacity(original.len());
    let mut cursor = 0;
    let mut characters_added = 0;
    let mut characters_removed = 0;

    for edit in &edits {
        let span = edit.span;
        let current = if span.start <= span.end && span.end <= original.len() {
            original.get(span.start..span.end)
        } else {
            None
        };
        let Some(current) = current else {
            warn!(start = span.start, end = span.end, len = original.len(), "Edit span invalid");
            return Err(StubError::diff_application(format!(
                "{} targets bytes {}..{} of a {}-byte text",
                edit.description,
                span.start,
                span.end,
                original.len()
            )));
        };
        if span.start < cursor {
            warn!(start = span.start, cursor, "Overlapping edits");
            return Err(StubError::diff_application(format!(
                "{} overlaps a previous edit",
                edit.description
            )));
        }
        if current != edit.original_text {
            warn!(
                expected = %edit.original_text,
                found = %current,
                "Original text does not match the parsed source"
            );
            return Err(StubError::diff_application(format!(
                "{}: text at line {} changed since it was parsed",
                edit.description,
                edit.location.start_line + 1
            )));
        }

        output.push_str(&original[cursor..span.start]);
        output.push_str(&edit.new_text);
        cursor = span.end;
        characters_added += edit.new_text.chars().count();
        characters_removed += current.chars().count();
    }
    output.push_str(&original[cursor..]);

    Ok(EditPlanResult {
        transformed_source: output,
        applied_count: edits.len(),
        characters_added,
        characters_removed,
        plan_metadata: plan.metadata.clone(),
    })
}

/// Render the tree's changes, apply them to `original` and locate `navigate_to`
/// in the resulting text.
pub fn commit(
    original: &str,
    tree: &SourceTree,
    changed: Vec<String>,
    navigate_to: &str,
) -> StubResult<EditResult> {
    // insertions carry no original text, so divergence is checked up front
    if original != tree.source() {
        warn!(
            expected_len = tree.source().len(),
            found_len = original.len(),
            "Supplied text differs from the parsed source"
        );
        return Err(StubError::diff_application(
            "supplied text differs from the text the tree was parsed from",
        ));
    }

    let plan = render_edits(tree)?;
    if plan.is_empty() {
        return Ok(EditResult::NoChanges);
    }

    let result = apply_edit_plan(original, &plan)?;
    let position = locate_in(&result.transformed_source, navigate_to);
    info!(
        intent = %result.plan_metadata.intent_name,
        declarations = ?result.plan_metadata.impact_areas,
        applied = result.applied_count,
        added = result.characters_added,
        removed = result.characters_removed,
        navigate_to,
        "Committed edits"
    );

    Ok(EditResult::Changed(ChangedFile {
        text: result.transformed_source,
        changed,
        navigation: NavigationTarget {
            name: navigate_to.to_string(),
            position,
        },
        applied_edits: result.applied_count,
    }))
}

fn locate_in(text: &str, name: &str) -> Option<Position> {
    let mut tree = match SourceTree::parse(text) {
        Ok(tree) => tree,
        Err(e) => {
            warn!(error = %e, "Augmented text no longer parses");
            return None;
        }
    };
    let method = find_method(&mut tree, name)?;
    let (line, column) = line_column(text, method.layout().name_span.start);
    Some(Position { line, column })
}
