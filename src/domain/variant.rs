use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a purchasable product variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Unique identifier of the variant.
    pub id: i32,
    /// Owning product identifier.
    pub product_id: i32,
    /// Optional stock keeping unit identifier.
    pub sku: Option<String>,
    /// Undiscounted unit price in the smallest currency unit (for example cents).
    pub price_cents: i64,
    /// Units currently in stock.
    pub stock: i32,
    /// Timestamp for when the variant record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the variant record.
    pub updated_at: NaiveDateTime,
}
