//! Contains all plan result types.
use crate::planning::edit::EditPlanMetadata;
use serde::Serialize;

/// Result of applying an edit plan to a text
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPlanResult {
    /// Text after every edit was applied
    pub transformed_source: String,
    /// Number of edits applied
    pub applied_count: usize,
    /// Characters added across all edits
    pub characters_added: usize,
    /// Characters removed across all edits
    pub characters_removed: usize,
    /// Original plan metadata
    pub plan_metadata: EditPlanMetadata,
}
