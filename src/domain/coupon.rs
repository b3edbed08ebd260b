use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::discount::DiscountValue;

/// Domain representation of a single cart-level coupon code.
///
/// Redemption history is read-only input to pricing; recording a new
/// redemption belongs to the order placement collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique identifier of the coupon.
    pub id: i32,
    /// Unique, user-facing code.
    pub code: String,
    /// How the deduction is computed.
    #[serde(flatten)]
    pub value: DiscountValue,
    /// Start of the active window, inclusive.
    pub starts_at: NaiveDateTime,
    /// End of the active window, inclusive.
    pub ends_at: NaiveDateTime,
    /// Administrative kill switch.
    pub is_active: bool,
    /// Minimum post-item-discount cart value required, in minor units.
    pub min_cart_value_cents: Option<i64>,
    /// Global cap on redemptions across all users.
    pub max_redemptions: Option<i64>,
    /// Per-user redemption cap; guest carts are ineligible when set.
    pub max_redemptions_per_user: Option<i64>,
    /// Whether the coupon may coexist with item-level discounts.
    pub is_stackable: bool,
    /// Timestamp for when the coupon record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the coupon record.
    pub updated_at: NaiveDateTime,
}
