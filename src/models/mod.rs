pub mod cart;
pub mod category;
pub mod coupon;
pub mod discount;
pub mod product;
pub mod variant;
