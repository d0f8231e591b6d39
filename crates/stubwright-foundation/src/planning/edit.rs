//! Contains all edit plan types.

use serde::{Deserialize, Serialize};

/// Edit plan for a single source text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditPlan {
    /// List of individual edits to apply, all relative to the original text
    pub edits: Vec<TextEdit>,
    /// Plan metadata
    pub metadata: EditPlanMetadata,
}

impl EditPlan {
    /// Create an empty plan for the given intent
    pub fn new(intent_name: impl Into<String>) -> Self {
        Self {
            edits: Vec::new(),
            metadata: EditPlanMetadata {
                intent_name: intent_name.into(),
                impact_areas: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Individual text edit operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    /// Edit type classification
    pub edit_type: EditType,
    /// Byte range in the original text
    pub span: ByteSpan,
    /// Line/column location of `span`, for reporting
    pub location: EditLocation,
    /// Original text to be replaced
    pub original_text: String,
    /// New text to insert
    pub new_text: String,
    /// Ordering among edits starting at the same offset (higher numbers first)
    pub priority: u32,
    /// Description of what this edit does
    pub description: String,
}

impl TextEdit {
    /// Build an edit replacing `span` of `source` with `new_text`
    ///
    /// `span` must lie on char boundaries of `source`; the caller obtains it
    /// from the parse of that same text.
    pub fn replace(
        source: &str,
        edit_type: EditType,
        span: ByteSpan,
        new_text: impl Into<String>,
        priority: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            edit_type,
            span,
            location: EditLocation::from_span(source, span),
            original_text: source
                .get(span.start..span.end)
                .unwrap_or_default()
                .to_string(),
            new_text: new_text.into(),
            priority,
            description: description.into(),
        }
    }

    pub fn is_insert(&self) -> bool {
        self.span.is_empty()
    }
}

/// Types of edits that can be performed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum EditType {
    /// Add new import
    AddImport,
    /// Replace or insert a documentation comment
    Documentation,
    /// Rewrite a modifier/annotation list
    Modifiers,
    /// Rewrite a thrown-exception clause
    Throws,
    /// Add new code
    Insert,
    /// Replace code
    Replace,
}

/// Half-open byte range `[start, end)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Location of an edit in the source file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EditLocation {
    /// Start line (0-based)
    pub start_line: u32,
    /// Start column (0-based, in bytes)
    pub start_column: u32,
    /// End line (0-based)
    pub end_line: u32,
    /// End column (0-based, in bytes)
    pub end_column: u32,
}

impl EditLocation {
    /// Compute the line/column location of a byte span
    pub fn from_span(source: &str, span: ByteSpan) -> Self {
        let (start_line, start_column) = line_column(source, span.start);
        let (end_line, end_column) = line_column(source, span.end);
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

/// 0-based line and byte column of `offset` in `source`
///
/// Offsets past the end are clamped to the end of the text.
pub fn line_column(source: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|b| **b == b'\n').count();
    let line_start = before
        .iter()
        .rposition(|b| *b == b'\n')
        .map(|idx| idx + 1)
        .unwrap_or(0);
    (line as u32, (offset - line_start) as u32)
}

/// Edit plan metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditPlanMetadata {
    /// Intent that generated this plan
    pub intent_name: String,
    /// Declarations the plan touches, in rendering order
    pub impact_areas: Vec<String>,
}
