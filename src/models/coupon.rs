use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::coupon::Coupon as DomainCoupon;
use crate::domain::discount::DiscountValue;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct Coupon {
    pub id: i32,
    pub code: String,
    pub kind: String,
    pub value_cents: i64,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub min_cart_value_cents: Option<i64>,
    pub max_redemptions: Option<i64>,
    pub max_redemptions_per_user: Option<i64>,
    pub is_stackable: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Coupon {
    /// `None` when the stored kind string is not recognised.
    pub fn into_domain(self) -> Option<DomainCoupon> {
        let value = DiscountValue::from_parts(&self.kind, self.value_cents)?;
        Some(DomainCoupon {
            id: self.id,
            code: self.code,
            value,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
            min_cart_value_cents: self.min_cart_value_cents,
            max_redemptions: self.max_redemptions,
            max_redemptions_per_user: self.max_redemptions_per_user,
            is_stackable: self.is_stackable,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct NewCoupon<'a> {
    pub code: &'a str,
    pub kind: &'a str,
    pub value_cents: i64,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub min_cart_value_cents: Option<i64>,
    pub max_redemptions: Option<i64>,
    pub max_redemptions_per_user: Option<i64>,
    pub is_stackable: bool,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::coupon_redemptions)]
pub struct CouponRedemption {
    pub id: i32,
    pub coupon_id: i32,
    pub user_id: Option<i32>,
    pub order_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::coupon_redemptions)]
pub struct NewCouponRedemption {
    pub coupon_id: i32,
    pub user_id: Option<i32>,
    pub order_id: i32,
}
