use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::cart::{Cart as DomainCart, CartItem as DomainCartItem};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::carts)]
pub struct Cart {
    pub id: i32,
    pub user_id: Option<i32>,
    pub applied_coupon_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Cart {
    pub fn into_domain(self, items: Vec<CartItem>) -> DomainCart {
        DomainCart {
            id: self.id,
            user_id: self.user_id,
            applied_coupon_id: self.applied_coupon_id,
            items: items.into_iter().map(DomainCartItem::from).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::carts)]
pub struct NewCart {
    pub user_id: Option<i32>,
    pub applied_coupon_id: Option<i32>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Cart))]
#[diesel(table_name = crate::schema::cart_items)]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub variant_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CartItem> for DomainCartItem {
    fn from(value: CartItem) -> Self {
        Self {
            id: value.id,
            cart_id: value.cart_id,
            variant_id: value.variant_id,
            product_id: value.product_id,
            quantity: value.quantity,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem {
    pub cart_id: i32,
    pub variant_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}
