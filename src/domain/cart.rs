use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a shopping cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Unique identifier of the cart.
    pub id: i32,
    /// Owning user; `None` for a guest cart.
    pub user_id: Option<i32>,
    /// Coupon attached by a cart mutation collaborator, if any.
    pub applied_coupon_id: Option<i32>,
    /// Lines currently in the cart.
    pub items: Vec<CartItem>,
    /// Timestamp for when the cart record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the cart record.
    pub updated_at: NaiveDateTime,
}

/// One line of a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique identifier of the line.
    pub id: i32,
    /// Owning cart identifier.
    pub cart_id: i32,
    /// Variant the line refers to; may dangle if the variant was deleted.
    pub variant_id: i32,
    /// Product the variant belonged to when the line was added.
    pub product_id: i32,
    /// Number of units.
    pub quantity: i32,
}
