use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::discount::{
    Discount as DomainDiscount, DiscountScope, DiscountTarget, NewDiscount as DomainNewDiscount,
    SCOPE_CATEGORY, SCOPE_COLLECTION, SCOPE_PRODUCT, SCOPE_SITE_WIDE, SCOPE_VARIANT,
    UpdateDiscount as DomainUpdateDiscount,
};
use crate::models::discount::{
    Discount as DbDiscount, NewDiscount as DbNewDiscount, NewDiscountCategory,
    NewDiscountCollection, NewDiscountProduct, NewDiscountVariant,
    UpdateDiscount as DbUpdateDiscount,
};
use crate::repository::{
    DieselRepository, DiscountReader, DiscountWriter, RepositoryError, RepositoryResult,
};

impl DiscountReader for DieselRepository {
    fn get_discount_by_id(&self, id: i32) -> RepositoryResult<Option<DomainDiscount>> {
        use crate::schema::discounts;

        let mut conn = self.conn()?;
        let row = discounts::table
            .filter(discounts::id.eq(id))
            .first::<DbDiscount>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut targets = load_target_ids(&mut conn, &row.scope, &[row.id])?;
        let ids = targets.remove(&row.id).unwrap_or_default();
        into_domain(row, ids).map(Some)
    }

    fn list_discounts(&self) -> RepositoryResult<Vec<DomainDiscount>> {
        use crate::schema::discounts;

        let mut conn = self.conn()?;
        let rows = discounts::table
            .order(discounts::created_at.desc())
            .load::<DbDiscount>(&mut conn)?;

        // One batched target query per scope kind present in the result.
        let mut by_scope: HashMap<String, Vec<i32>> = HashMap::new();
        for row in &rows {
            by_scope.entry(row.scope.clone()).or_default().push(row.id);
        }

        let mut targets: HashMap<i32, Vec<i32>> = HashMap::new();
        for (scope, ids) in by_scope {
            targets.extend(load_target_ids(&mut conn, &scope, &ids)?);
        }

        rows.into_iter()
            .map(|row| {
                let ids = targets.remove(&row.id).unwrap_or_default();
                into_domain(row, ids)
            })
            .collect()
    }

    fn list_active_discounts(
        &self,
        target: &DiscountTarget,
        now: NaiveDateTime,
    ) -> RepositoryResult<Vec<DomainDiscount>> {
        use crate::schema::{
            discount_categories, discount_collections, discount_products, discount_variants,
            discounts,
        };

        let mut conn = self.conn()?;

        // `id desc` breaks created_at ties deterministically in favour of the
        // most recently inserted row.
        let ordering = (
            discounts::priority.desc(),
            discounts::created_at.desc(),
            discounts::id.desc(),
        );

        let rows = match target {
            DiscountTarget::SiteWide => discounts::table
                .filter(discounts::scope.eq(SCOPE_SITE_WIDE))
                .filter(discounts::is_active.eq(true))
                .filter(discounts::starts_at.le(now))
                .filter(discounts::ends_at.ge(now))
                .order(ordering)
                .load::<DbDiscount>(&mut conn)?,
            DiscountTarget::Product(product_id) => discounts::table
                .inner_join(discount_products::table)
                .filter(discount_products::product_id.eq(*product_id))
                .filter(discounts::scope.eq(SCOPE_PRODUCT))
                .filter(discounts::is_active.eq(true))
                .filter(discounts::starts_at.le(now))
                .filter(discounts::ends_at.ge(now))
                .order(ordering)
                .select(DbDiscount::as_select())
                .load::<DbDiscount>(&mut conn)?,
            DiscountTarget::Variant(variant_id) => discounts::table
                .inner_join(discount_variants::table)
                .filter(discount_variants::variant_id.eq(*variant_id))
                .filter(discounts::scope.eq(SCOPE_VARIANT))
                .filter(discounts::is_active.eq(true))
                .filter(discounts::starts_at.le(now))
                .filter(discounts::ends_at.ge(now))
                .order(ordering)
                .select(DbDiscount::as_select())
                .load::<DbDiscount>(&mut conn)?,
            DiscountTarget::Category(category_id) => discounts::table
                .inner_join(discount_categories::table)
                .filter(discount_categories::category_id.eq(*category_id))
                .filter(discounts::scope.eq(SCOPE_CATEGORY))
                .filter(discounts::is_active.eq(true))
                .filter(discounts::starts_at.le(now))
                .filter(discounts::ends_at.ge(now))
                .order(ordering)
                .select(DbDiscount::as_select())
                .load::<DbDiscount>(&mut conn)?,
            DiscountTarget::Collection(collection_id) => discounts::table
                .inner_join(discount_collections::table)
                .filter(discount_collections::collection_id.eq(*collection_id))
                .filter(discounts::scope.eq(SCOPE_COLLECTION))
                .filter(discounts::is_active.eq(true))
                .filter(discounts::starts_at.le(now))
                .filter(discounts::ends_at.ge(now))
                .order(ordering)
                .select(DbDiscount::as_select())
                .load::<DbDiscount>(&mut conn)?,
        };

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let scope = rows[0].scope.clone();
        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let mut targets = load_target_ids(&mut conn, &scope, &ids)?;

        rows.into_iter()
            .map(|row| {
                let ids = targets.remove(&row.id).unwrap_or_default();
                into_domain(row, ids)
            })
            .collect()
    }
}

impl DiscountWriter for DieselRepository {
    fn create_discount(&self, new_discount: &DomainNewDiscount) -> RepositoryResult<DomainDiscount> {
        use crate::schema::discounts;

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let db_new = DbNewDiscount::from(new_discount);
            let row = diesel::insert_into(discounts::table)
                .values(&db_new)
                .get_result::<DbDiscount>(conn)?;

            replace_targets(conn, row.id, &new_discount.scope)?;

            into_domain(row, new_discount.scope.target_ids().to_vec())
        })
    }

    fn update_discount(
        &self,
        discount_id: i32,
        updates: &DomainUpdateDiscount,
    ) -> RepositoryResult<DomainDiscount> {
        use crate::schema::discounts;

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let db_updates = DbUpdateDiscount::from(updates);
            let row = diesel::update(discounts::table.find(discount_id))
                .set(&db_updates)
                .get_result::<DbDiscount>(conn)?;

            let ids = match &updates.scope {
                Some(scope) => {
                    replace_targets(conn, row.id, scope)?;
                    scope.target_ids().to_vec()
                }
                None => load_target_ids(conn, &row.scope, &[row.id])?
                    .remove(&row.id)
                    .unwrap_or_default(),
            };

            into_domain(row, ids)
        })
    }

    fn delete_discount(&self, discount_id: i32) -> RepositoryResult<()> {
        use crate::schema::discounts;

        let mut conn = self.conn()?;
        let deleted =
            diesel::delete(discounts::table.find(discount_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn into_domain(row: DbDiscount, target_ids: Vec<i32>) -> RepositoryResult<DomainDiscount> {
    let id = row.id;
    row.into_domain(target_ids)
        .ok_or_else(|| RepositoryError::Corrupt(format!("discount {id} has an unknown kind or scope")))
}

/// Load target ids for the given discounts from the join table matching
/// `scope`. SITE_WIDE (and unknown scopes) have no join table.
fn load_target_ids(
    conn: &mut SqliteConnection,
    scope: &str,
    discount_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<i32>>> {
    use crate::schema::{
        discount_categories, discount_collections, discount_products, discount_variants,
    };

    if discount_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let pairs: Vec<(i32, i32)> = match scope {
        SCOPE_PRODUCT => discount_products::table
            .filter(discount_products::discount_id.eq_any(discount_ids))
            .order(discount_products::id.asc())
            .select((discount_products::discount_id, discount_products::product_id))
            .load(conn)?,
        SCOPE_VARIANT => discount_variants::table
            .filter(discount_variants::discount_id.eq_any(discount_ids))
            .order(discount_variants::id.asc())
            .select((discount_variants::discount_id, discount_variants::variant_id))
            .load(conn)?,
        SCOPE_CATEGORY => discount_categories::table
            .filter(discount_categories::discount_id.eq_any(discount_ids))
            .order(discount_categories::id.asc())
            .select((discount_categories::discount_id, discount_categories::category_id))
            .load(conn)?,
        SCOPE_COLLECTION => discount_collections::table
            .filter(discount_collections::discount_id.eq_any(discount_ids))
            .order(discount_collections::id.asc())
            .select((
                discount_collections::discount_id,
                discount_collections::collection_id,
            ))
            .load(conn)?,
        _ => Vec::new(),
    };

    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    for (discount_id, target_id) in pairs {
        map.entry(discount_id).or_default().push(target_id);
    }

    Ok(map)
}

/// Clear all four target tables for the discount and insert the rows for its
/// (new) scope. Runs inside the caller's transaction.
fn replace_targets(
    conn: &mut SqliteConnection,
    discount_id: i32,
    scope: &DiscountScope,
) -> RepositoryResult<()> {
    use crate::schema::{
        discount_categories, discount_collections, discount_products, discount_variants,
    };

    diesel::delete(
        discount_products::table.filter(discount_products::discount_id.eq(discount_id)),
    )
    .execute(conn)?;
    diesel::delete(
        discount_variants::table.filter(discount_variants::discount_id.eq(discount_id)),
    )
    .execute(conn)?;
    diesel::delete(
        discount_categories::table.filter(discount_categories::discount_id.eq(discount_id)),
    )
    .execute(conn)?;
    diesel::delete(
        discount_collections::table.filter(discount_collections::discount_id.eq(discount_id)),
    )
    .execute(conn)?;

    match scope {
        DiscountScope::SiteWide => {}
        DiscountScope::Products { ids } => {
            let rows: Vec<NewDiscountProduct> = ids
                .iter()
                .map(|&product_id| NewDiscountProduct {
                    discount_id,
                    product_id,
                })
                .collect();
            diesel::insert_into(discount_products::table)
                .values(&rows)
                .execute(conn)?;
        }
        DiscountScope::Variants { ids } => {
            let rows: Vec<NewDiscountVariant> = ids
                .iter()
                .map(|&variant_id| NewDiscountVariant {
                    discount_id,
                    variant_id,
                })
                .collect();
            diesel::insert_into(discount_variants::table)
                .values(&rows)
                .execute(conn)?;
        }
        DiscountScope::Categories { ids } => {
            let rows: Vec<NewDiscountCategory> = ids
                .iter()
                .map(|&category_id| NewDiscountCategory {
                    discount_id,
                    category_id,
                })
                .collect();
            diesel::insert_into(discount_categories::table)
                .values(&rows)
                .execute(conn)?;
        }
        DiscountScope::Collections { ids } => {
            let rows: Vec<NewDiscountCollection> = ids
                .iter()
                .map(|&collection_id| NewDiscountCollection {
                    discount_id,
                    collection_id,
                })
                .collect();
            diesel::insert_into(discount_collections::table)
                .values(&rows)
                .execute(conn)?;
        }
    }

    Ok(())
}
