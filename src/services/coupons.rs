//! Cart-level coupon overlay, applied once after the item cascade.

use chrono::NaiveDateTime;

use crate::domain::cart::Cart;
use crate::domain::coupon::Coupon;
use crate::domain::pricing::{AppliedCoupon, AppliedDiscount};
use crate::repository::CouponReader;
use crate::services::ServiceResult;

/// Apply the cart's coupon, if any, on top of the post-cascade price.
///
/// Every failed eligibility check is silent: the price from the item cascade
/// stands and no coupon is reported. A coupon id pointing at a deleted coupon
/// is treated the same way.
pub fn coupon_overlay<R>(
    repo: &R,
    cart: &Cart,
    discounted_cents: i64,
    applied_discounts: &[AppliedDiscount],
    now: NaiveDateTime,
) -> ServiceResult<(i64, Option<AppliedCoupon>)>
where
    R: CouponReader + ?Sized,
{
    let Some(coupon_id) = cart.applied_coupon_id else {
        return Ok((discounted_cents, None));
    };

    let Some(coupon) = repo.get_coupon_by_id(coupon_id)? else {
        log::warn!("cart {} references missing coupon {coupon_id}", cart.id);
        return Ok((discounted_cents, None));
    };

    if !is_eligible(repo, &coupon, cart, discounted_cents, applied_discounts, now)? {
        return Ok((discounted_cents, None));
    }

    let amount = coupon.value.amount_cents(discounted_cents);
    let price = (discounted_cents - amount).max(0);
    let applied = AppliedCoupon {
        id: coupon.id,
        code: coupon.code,
        value: coupon.value,
        amount_cents: amount,
    };

    Ok((price, Some(applied)))
}

fn is_eligible<R>(
    repo: &R,
    coupon: &Coupon,
    cart: &Cart,
    discounted_cents: i64,
    applied_discounts: &[AppliedDiscount],
    now: NaiveDateTime,
) -> ServiceResult<bool>
where
    R: CouponReader + ?Sized,
{
    if !coupon.is_active || now < coupon.starts_at || now > coupon.ends_at {
        return Ok(false);
    }

    // The minimum is checked against the post-item-discount price, not the
    // original cart value.
    if let Some(min) = coupon.min_cart_value_cents {
        if discounted_cents < min {
            return Ok(false);
        }
    }

    if let Some(cap) = coupon.max_redemptions {
        if repo.count_redemptions(coupon.id)? >= cap {
            return Ok(false);
        }
    }

    if let Some(cap) = coupon.max_redemptions_per_user {
        // Guest carts cannot be counted per user, so they are ineligible.
        let Some(user_id) = cart.user_id else {
            return Ok(false);
        };
        if repo.count_user_redemptions(coupon.id, user_id)? >= cap {
            return Ok(false);
        }
    }

    // The coupon's own stackability only matters once it has to coexist with
    // item-level discounts.
    if !applied_discounts.is_empty()
        && !(coupon.is_stackable && applied_discounts.iter().all(|d| d.is_stackable))
    {
        return Ok(false);
    }

    Ok(true)
}
