//! Pricing entry points: one variant or one whole cart.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::domain::pricing::{AppliedDiscount, PricingLineItem, PricingResult};
use crate::repository::{
    CartReader, CategoryReader, CouponReader, DiscountReader, ProductReader, VariantReader,
};
use crate::services::cascade::{PricingCache, run_cascade};
use crate::services::coupons::coupon_overlay;
use crate::services::{ServiceError, ServiceResult};

/// Price a single variant through the full discount cascade.
///
/// `line_items` is empty for a bare-variant query, and no coupon is
/// considered; coupons only exist at the cart level.
pub fn resolve_variant_pricing<R>(
    repo: &R,
    variant_id: i32,
    now: NaiveDateTime,
) -> ServiceResult<PricingResult>
where
    R: VariantReader + ProductReader + CategoryReader + DiscountReader + ?Sized,
{
    let variant = repo
        .get_variant_by_id(variant_id)?
        .ok_or(ServiceError::VariantNotFound(variant_id))?;
    let product = repo
        .get_product_by_id(variant.product_id)?
        .ok_or(ServiceError::VariantNotFound(variant_id))?;

    let mut cache = PricingCache::new();
    // No variant/collection link exists in the current data model.
    let (discounted, applied) = run_cascade(repo, &mut cache, &variant, &product, &[], now)?;

    Ok(PricingResult::new(
        variant.price_cents,
        discounted,
        Vec::new(),
        applied,
        None,
    ))
}

/// Price a whole cart: every line runs the cascade independently from an
/// unlocked state (sharing one request cache), totals are accumulated, fired
/// discounts deduplicated, and the coupon overlay applied once at the end.
///
/// Lines whose variant or product can no longer be resolved are skipped
/// silently rather than failing the whole cart.
pub fn resolve_cart_pricing<R>(
    repo: &R,
    cart_id: i32,
    now: NaiveDateTime,
) -> ServiceResult<PricingResult>
where
    R: CartReader
        + VariantReader
        + ProductReader
        + CategoryReader
        + DiscountReader
        + CouponReader
        + ?Sized,
{
    let cart = repo
        .get_cart_by_id(cart_id)?
        .ok_or(ServiceError::CartNotFound(cart_id))?;

    let mut cache = PricingCache::new();
    let mut original_cents = 0i64;
    let mut discounted_cents = 0i64;
    let mut line_items: Vec<PricingLineItem> = Vec::new();
    let mut fired: Vec<AppliedDiscount> = Vec::new();

    for item in &cart.items {
        let Some(variant) = repo.get_variant_by_id(item.variant_id)? else {
            log::debug!(
                "cart {}: skipping line {} with missing variant {}",
                cart.id,
                item.id,
                item.variant_id
            );
            continue;
        };
        let Some(product) = repo.get_product_by_id(variant.product_id)? else {
            log::debug!(
                "cart {}: skipping line {} with missing product {}",
                cart.id,
                item.id,
                variant.product_id
            );
            continue;
        };

        let (unit_discounted, applied) =
            run_cascade(repo, &mut cache, &variant, &product, &[], now)?;

        let quantity = i64::from(item.quantity);
        let line_total = unit_discounted * quantity;
        original_cents += variant.price_cents * quantity;
        discounted_cents += line_total;
        line_items.push(PricingLineItem {
            item_id: item.id,
            original_unit_cents: variant.price_cents,
            discounted_unit_cents: unit_discounted,
            quantity: item.quantity,
            line_total_cents: line_total,
        });
        fired.extend(applied);
    }

    let applied_discounts = dedupe_applied(fired);
    let (discounted_cents, applied_coupon) =
        coupon_overlay(repo, &cart, discounted_cents, &applied_discounts, now)?;

    Ok(PricingResult::new(
        original_cents,
        discounted_cents,
        line_items,
        applied_discounts,
        applied_coupon,
    ))
}

/// Deduplicate fired discounts by id, keeping the first position and the last
/// amount. The surviving amount is whatever the last line produced, so it is
/// not a cart-wide total for that discount.
fn dedupe_applied(fired: Vec<AppliedDiscount>) -> Vec<AppliedDiscount> {
    let mut index_by_id: HashMap<i32, usize> = HashMap::new();
    let mut deduped: Vec<AppliedDiscount> = Vec::new();

    for entry in fired {
        match index_by_id.get(&entry.id) {
            Some(&index) => deduped[index] = entry,
            None => {
                index_by_id.insert(entry.id, deduped.len());
                deduped.push(entry);
            }
        }
    }

    deduped
}
