use chrono::NaiveDateTime;
use mockall::mock;

use super::{
    CartReader, CategoryReader, CouponReader, DiscountReader, DiscountWriter, ProductReader,
    VariantReader,
};
use crate::domain::{
    cart::Cart,
    category::Category,
    coupon::Coupon,
    discount::{Discount, DiscountTarget, NewDiscount, UpdateDiscount},
    product::Product,
    variant::Variant,
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub VariantReader {}

    impl VariantReader for VariantReader {
        fn get_variant_by_id(&self, id: i32) -> RepositoryResult<Option<Variant>>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    }
}

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
    }
}

mock! {
    pub DiscountReader {}

    impl DiscountReader for DiscountReader {
        fn get_discount_by_id(&self, id: i32) -> RepositoryResult<Option<Discount>>;
        fn list_discounts(&self) -> RepositoryResult<Vec<Discount>>;
        fn list_active_discounts(&self, target: &DiscountTarget, now: NaiveDateTime) -> RepositoryResult<Vec<Discount>>;
    }
}

mock! {
    pub DiscountWriter {}

    impl DiscountWriter for DiscountWriter {
        fn create_discount(&self, new_discount: &NewDiscount) -> RepositoryResult<Discount>;
        fn update_discount(&self, discount_id: i32, updates: &UpdateDiscount) -> RepositoryResult<Discount>;
        fn delete_discount(&self, discount_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub CartReader {}

    impl CartReader for CartReader {
        fn get_cart_by_id(&self, id: i32) -> RepositoryResult<Option<Cart>>;
    }
}

mock! {
    pub CouponReader {}

    impl CouponReader for CouponReader {
        fn get_coupon_by_id(&self, id: i32) -> RepositoryResult<Option<Coupon>>;
        fn get_coupon_by_code(&self, code: &str) -> RepositoryResult<Option<Coupon>>;
        fn count_redemptions(&self, coupon_id: i32) -> RepositoryResult<i64>;
        fn count_user_redemptions(&self, coupon_id: i32, user_id: i32) -> RepositoryResult<i64>;
    }
}
