use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::cart::Cart;
use crate::domain::category::Category;
use crate::domain::coupon::Coupon;
use crate::domain::discount::{Discount, DiscountTarget, NewDiscount, UpdateDiscount};
use crate::domain::product::Product;
use crate::domain::variant::Variant;

pub mod errors;

mod cart;
mod catalog;
mod coupon;
mod discount;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only access to variant snapshots.
pub trait VariantReader {
    fn get_variant_by_id(&self, id: i32) -> RepositoryResult<Option<Variant>>;
}

/// Read-only access to product snapshots.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
}

/// Read-only access to the category tree.
pub trait CategoryReader {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
}

/// Read-only operations over discount records.
pub trait DiscountReader {
    fn get_discount_by_id(&self, id: i32) -> RepositoryResult<Option<Discount>>;
    fn list_discounts(&self) -> RepositoryResult<Vec<Discount>>;
    /// Discounts for one cascade tier: active, inside their date window and
    /// exactly matching `target`, sorted by priority desc then recency desc.
    fn list_active_discounts(
        &self,
        target: &DiscountTarget,
        now: NaiveDateTime,
    ) -> RepositoryResult<Vec<Discount>>;
}

/// Write operations over discount records.
pub trait DiscountWriter {
    fn create_discount(&self, new_discount: &NewDiscount) -> RepositoryResult<Discount>;
    fn update_discount(
        &self,
        discount_id: i32,
        updates: &UpdateDiscount,
    ) -> RepositoryResult<Discount>;
    fn delete_discount(&self, discount_id: i32) -> RepositoryResult<()>;
}

/// Read-only access to cart snapshots, items included.
pub trait CartReader {
    fn get_cart_by_id(&self, id: i32) -> RepositoryResult<Option<Cart>>;
}

/// Read-only access to coupons and their redemption history.
pub trait CouponReader {
    fn get_coupon_by_id(&self, id: i32) -> RepositoryResult<Option<Coupon>>;
    fn get_coupon_by_code(&self, code: &str) -> RepositoryResult<Option<Coupon>>;
    fn count_redemptions(&self, coupon_id: i32) -> RepositoryResult<i64>;
    fn count_user_redemptions(&self, coupon_id: i32, user_id: i32) -> RepositoryResult<i64>;
}
