use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning category, when the product is filed under one.
    pub category_id: Option<i32>,
    /// Human-readable name of the product.
    pub name: String,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}
