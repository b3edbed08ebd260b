use serde::{Deserialize, Serialize};

use crate::domain::discount::DiscountValue;

/// A discount that fired during the cascade, together with the deduction it
/// produced at the price it was applied against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub id: i32,
    pub name: String,
    #[serde(flatten)]
    pub value: DiscountValue,
    /// Deduction in minor units at the moment the discount applied.
    ///
    /// On carts the list is deduplicated by id and the amount from the last
    /// line that fired the discount wins, so this is not a cart-wide total.
    pub amount_cents: i64,
    /// Carried so the coupon overlay can check its stacking rule.
    pub is_stackable: bool,
}

/// The coupon deduction applied once at the cart level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    pub id: i32,
    pub code: String,
    #[serde(flatten)]
    pub value: DiscountValue,
    pub amount_cents: i64,
}

/// Pricing breakdown of a single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingLineItem {
    pub item_id: i32,
    pub original_unit_cents: i64,
    pub discounted_unit_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

/// Final, discount-adjusted price of a variant or cart. Never persisted; all
/// money fields are integers in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub original_cents: i64,
    pub discounted_cents: i64,
    /// Empty for a bare-variant query.
    pub line_items: Vec<PricingLineItem>,
    /// Deduplicated by discount id.
    pub applied_discounts: Vec<AppliedDiscount>,
    pub applied_coupon: Option<AppliedCoupon>,
    pub total_savings_cents: i64,
    /// Integer percent of the original price saved, rounded half away from zero.
    pub total_percentage_savings: i64,
}

impl PricingResult {
    /// Assemble a result, deriving the savings fields from the totals.
    pub fn new(
        original_cents: i64,
        discounted_cents: i64,
        line_items: Vec<PricingLineItem>,
        applied_discounts: Vec<AppliedDiscount>,
        applied_coupon: Option<AppliedCoupon>,
    ) -> Self {
        let total_savings_cents = (original_cents - discounted_cents).max(0);
        let total_percentage_savings = percentage_of(total_savings_cents, original_cents);
        Self {
            original_cents,
            discounted_cents,
            line_items,
            applied_discounts,
            applied_coupon,
            total_savings_cents,
            total_percentage_savings,
        }
    }
}

/// `part / whole` as an integer percent, rounded half away from zero.
/// Zero when `whole` is not positive.
fn percentage_of(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        return 0;
    }
    (part * 200 + whole) / (whole * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn savings_fields_are_derived() {
        let result = PricingResult::new(10_000, 8_500, Vec::new(), Vec::new(), None);
        assert_eq!(result.total_savings_cents, 1_500);
        assert_eq!(result.total_percentage_savings, 15);
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        assert_eq!(percentage_of(1, 8), 13); // 12.5%
        assert_eq!(percentage_of(1, 3), 33);
        assert_eq!(percentage_of(2, 3), 67);
    }

    #[test]
    fn zero_original_price_yields_zero_percent() {
        let result = PricingResult::new(0, 0, Vec::new(), Vec::new(), None);
        assert_eq!(result.total_savings_cents, 0);
        assert_eq!(result.total_percentage_savings, 0);
    }

    #[test]
    fn savings_never_negative() {
        let result = PricingResult::new(100, 150, Vec::new(), Vec::new(), None);
        assert_eq!(result.total_savings_cents, 0);
        assert_eq!(result.total_percentage_savings, 0);
    }
}
