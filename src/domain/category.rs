use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a node in the strict category tree.
///
/// Pricing only ever walks the tree upward via `parent_id`; a category with
/// `parent_id = None` is a root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier of the category.
    pub id: i32,
    /// Single parent in the tree, `None` for a root.
    pub parent_id: Option<i32>,
    /// Human-readable name of the category.
    pub name: String,
    /// Timestamp for when the category record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the category record.
    pub updated_at: NaiveDateTime,
}
