use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::discount::{
    Discount as DomainDiscount, DiscountScope, DiscountValue, NewDiscount as DomainNewDiscount,
    SCOPE_CATEGORY, SCOPE_COLLECTION, SCOPE_PRODUCT, SCOPE_SITE_WIDE, SCOPE_VARIANT,
    UpdateDiscount as DomainUpdateDiscount,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::discounts)]
pub struct Discount {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub value_cents: i64,
    pub scope: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub priority: i32,
    pub is_stackable: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Discount {
    /// Combine the row with the target ids loaded from its scope's join
    /// table. `None` when the stored kind or scope string is not recognised.
    pub fn into_domain(self, target_ids: Vec<i32>) -> Option<DomainDiscount> {
        let value = DiscountValue::from_parts(&self.kind, self.value_cents)?;
        let scope = match self.scope.as_str() {
            SCOPE_SITE_WIDE => DiscountScope::SiteWide,
            SCOPE_PRODUCT => DiscountScope::Products { ids: target_ids },
            SCOPE_VARIANT => DiscountScope::Variants { ids: target_ids },
            SCOPE_CATEGORY => DiscountScope::Categories { ids: target_ids },
            SCOPE_COLLECTION => DiscountScope::Collections { ids: target_ids },
            _ => return None,
        };
        Some(DomainDiscount {
            id: self.id,
            name: self.name,
            description: self.description,
            value,
            scope,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
            priority: self.priority,
            is_stackable: self.is_stackable,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::discounts)]
pub struct NewDiscount<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub kind: &'a str,
    pub value_cents: i64,
    pub scope: &'a str,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub priority: i32,
    pub is_stackable: bool,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a DomainNewDiscount> for NewDiscount<'a> {
    fn from(value: &'a DomainNewDiscount) -> Self {
        let (kind, value_cents) = value.value.as_parts();
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            kind,
            value_cents,
            scope: value.scope.as_str(),
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            is_active: value.is_active,
            priority: value.priority,
            is_stackable: value.is_stackable,
            updated_at: value.updated_at,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::discounts)]
pub struct UpdateDiscount<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub kind: Option<&'a str>,
    pub value_cents: Option<i64>,
    pub scope: Option<&'a str>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
    pub priority: Option<i32>,
    pub is_stackable: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a DomainUpdateDiscount> for UpdateDiscount<'a> {
    fn from(value: &'a DomainUpdateDiscount) -> Self {
        let (kind, value_cents) = match &value.value {
            Some(v) => {
                let (kind, cents) = v.as_parts();
                (Some(kind), Some(cents))
            }
            None => (None, None),
        };
        Self {
            name: value.name.as_deref(),
            description: value.description.as_ref().map(|d| d.as_deref()),
            kind,
            value_cents,
            scope: value.scope.as_ref().map(DiscountScope::as_str),
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            is_active: value.is_active,
            priority: value.priority,
            is_stackable: value.is_stackable,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::discount_products)]
pub struct NewDiscountProduct {
    pub discount_id: i32,
    pub product_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::discount_variants)]
pub struct NewDiscountVariant {
    pub discount_id: i32,
    pub variant_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::discount_categories)]
pub struct NewDiscountCategory {
    pub discount_id: i32,
    pub category_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::discount_collections)]
pub struct NewDiscountCollection {
    pub discount_id: i32,
    pub collection_id: i32,
}
