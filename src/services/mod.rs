use thiserror::Error;

use crate::domain::discount::ScopeError;
use crate::repository::errors::RepositoryError;

pub mod cascade;
pub mod coupons;
pub mod discounts;
pub mod pricing;

/// Errors surfaced by the service layer.
///
/// A discount or coupon that simply does not apply is never an error; it is
/// reflected only by absence from the pricing result.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("variant {0} not found")]
    VariantNotFound(i32),
    #[error("cart {0} not found")]
    CartNotFound(i32),
    #[error("discount {0} not found")]
    DiscountNotFound(i32),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
