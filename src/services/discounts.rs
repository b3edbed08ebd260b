//! Administration of discount records: create, update, delete and the
//! scope/target validation both flows share.

use chrono::NaiveDateTime;

use crate::domain::discount::{
    Discount, DiscountScope, DiscountValue, NewDiscount, ScopeAssignment, ScopeError, ScopePatch,
    UpdateDiscount,
};
use crate::repository::{DiscountReader, DiscountWriter, RepositoryError};
use crate::services::{ServiceError, ServiceResult};

/// A fully specified discount as submitted by an admin, scope still unvalidated.
#[derive(Debug, Clone)]
pub struct DiscountDraft {
    pub name: String,
    pub description: Option<String>,
    pub value: DiscountValue,
    pub assignment: ScopeAssignment,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub priority: i32,
    pub is_stackable: bool,
}

/// A partial update to a discount; absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct DiscountChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub value: Option<DiscountValue>,
    pub scope: ScopePatch,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
    pub priority: Option<i32>,
    pub is_stackable: Option<bool>,
}

/// Validate a scope assignment without persisting anything.
pub fn validate_scope(assignment: &ScopeAssignment) -> Result<DiscountScope, ScopeError> {
    assignment.resolve()
}

pub fn list_discounts<R>(repo: &R) -> ServiceResult<Vec<Discount>>
where
    R: DiscountReader + ?Sized,
{
    Ok(repo.list_discounts()?)
}

pub fn get_discount<R>(repo: &R, discount_id: i32) -> ServiceResult<Discount>
where
    R: DiscountReader + ?Sized,
{
    repo.get_discount_by_id(discount_id)?
        .ok_or(ServiceError::DiscountNotFound(discount_id))
}

/// Validate the draft's scope assignment and persist the discount together
/// with its target rows.
pub fn create_discount<R>(repo: &R, draft: DiscountDraft) -> ServiceResult<Discount>
where
    R: DiscountWriter + ?Sized,
{
    let scope = draft.assignment.resolve()?;

    let mut new_discount = NewDiscount::new(
        draft.name,
        draft.value,
        scope,
        draft.starts_at,
        draft.ends_at,
    )
    .with_priority(draft.priority);
    new_discount.description = draft.description;
    new_discount.is_active = draft.is_active;
    new_discount.is_stackable = draft.is_stackable;

    let created = repo.create_discount(&new_discount)?;
    log::info!(
        "created discount {} ({}) with scope {}",
        created.id,
        created.name,
        created.scope.as_str()
    );
    Ok(created)
}

/// Apply a partial update.
///
/// When the patch touches the scope or any target-id set, the stored
/// assignment is merged with the patch first and the merged view validated as
/// a whole, so a partial change can never leave scope and targets
/// inconsistent.
pub fn update_discount<R>(
    repo: &R,
    discount_id: i32,
    changes: DiscountChanges,
) -> ServiceResult<Discount>
where
    R: DiscountReader + DiscountWriter + ?Sized,
{
    let scope = if changes.scope.is_empty() {
        None
    } else {
        let existing = repo
            .get_discount_by_id(discount_id)?
            .ok_or(ServiceError::DiscountNotFound(discount_id))?;
        Some(existing.scope.assignment().overlay(changes.scope).resolve()?)
    };

    let mut updates = UpdateDiscount::new();
    updates.name = changes.name;
    updates.description = changes.description;
    updates.value = changes.value;
    updates.scope = scope;
    updates.starts_at = changes.starts_at;
    updates.ends_at = changes.ends_at;
    updates.is_active = changes.is_active;
    updates.priority = changes.priority;
    updates.is_stackable = changes.is_stackable;

    match repo.update_discount(discount_id, &updates) {
        Ok(discount) => Ok(discount),
        Err(RepositoryError::NotFound) => Err(ServiceError::DiscountNotFound(discount_id)),
        Err(err) => Err(err.into()),
    }
}

pub fn delete_discount<R>(repo: &R, discount_id: i32) -> ServiceResult<()>
where
    R: DiscountWriter + ?Sized,
{
    match repo.delete_discount(discount_id) {
        Ok(()) => {
            log::info!("deleted discount {discount_id}");
            Ok(())
        }
        Err(RepositoryError::NotFound) => Err(ServiceError::DiscountNotFound(discount_id)),
        Err(err) => Err(err.into()),
    }
}
