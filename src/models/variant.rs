use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::variant::Variant as DomainVariant;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::variants)]
pub struct Variant {
    pub id: i32,
    pub product_id: i32,
    pub sku: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::variants)]
pub struct NewVariant<'a> {
    pub product_id: i32,
    pub sku: Option<&'a str>,
    pub price_cents: i64,
    pub stock: i32,
}

impl From<Variant> for DomainVariant {
    fn from(value: Variant) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            sku: value.sku,
            price_cents: value.price_cents,
            stock: value.stock,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
