use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scope names accepted on the wire and stored in the `discounts.scope` column.
pub const SCOPE_SITE_WIDE: &str = "SITE_WIDE";
pub const SCOPE_PRODUCT: &str = "PRODUCT";
pub const SCOPE_VARIANT: &str = "VARIANT";
pub const SCOPE_CATEGORY: &str = "CATEGORY";
pub const SCOPE_COLLECTION: &str = "COLLECTION";

/// The value of a discount or coupon, tagged by how it is applied.
///
/// `Percentage` holds an integer percent; `Fixed` holds an amount in minor
/// currency units. Money is always integer cents, never floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DiscountValue {
    #[serde(rename = "PERCENTAGE")]
    Percentage(i64),
    #[serde(rename = "FIXED")]
    Fixed(i64),
}

impl DiscountValue {
    /// Parse the `(kind, value)` pair stored in the database.
    pub fn from_parts(kind: &str, value_cents: i64) -> Option<Self> {
        match kind {
            "PERCENTAGE" => Some(Self::Percentage(value_cents)),
            "FIXED" => Some(Self::Fixed(value_cents)),
            _ => None,
        }
    }

    /// The `(kind, value)` pair persisted to the database.
    pub fn as_parts(&self) -> (&'static str, i64) {
        match self {
            Self::Percentage(value) => ("PERCENTAGE", *value),
            Self::Fixed(value) => ("FIXED", *value),
        }
    }

    /// Deduction in minor units against `price_cents`.
    ///
    /// Percentages round half away from zero in pure integer arithmetic;
    /// fixed values are taken verbatim, not scaled by the price.
    pub fn amount_cents(&self, price_cents: i64) -> i64 {
        match self {
            Self::Percentage(percent) => (price_cents * percent + 50) / 100,
            Self::Fixed(value) => *value,
        }
    }
}

/// The class of catalog entity a discount targets, carrying only the target
/// ids that are valid for that scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope")]
pub enum DiscountScope {
    #[serde(rename = "SITE_WIDE")]
    SiteWide,
    #[serde(rename = "PRODUCT")]
    Products { ids: Vec<i32> },
    #[serde(rename = "VARIANT")]
    Variants { ids: Vec<i32> },
    #[serde(rename = "CATEGORY")]
    Categories { ids: Vec<i32> },
    #[serde(rename = "COLLECTION")]
    Collections { ids: Vec<i32> },
}

impl DiscountScope {
    /// Scope name as stored in the `discounts.scope` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SiteWide => SCOPE_SITE_WIDE,
            Self::Products { .. } => SCOPE_PRODUCT,
            Self::Variants { .. } => SCOPE_VARIANT,
            Self::Categories { .. } => SCOPE_CATEGORY,
            Self::Collections { .. } => SCOPE_COLLECTION,
        }
    }

    /// Target ids for the scope's join table; empty for `SiteWide`.
    pub fn target_ids(&self) -> &[i32] {
        match self {
            Self::SiteWide => &[],
            Self::Products { ids }
            | Self::Variants { ids }
            | Self::Categories { ids }
            | Self::Collections { ids } => ids,
        }
    }

    /// Expand back into the raw field-per-scope form used for merging patches.
    pub fn assignment(&self) -> ScopeAssignment {
        let mut assignment = ScopeAssignment::new(self.as_str());
        let ids = self.target_ids().to_vec();
        match self {
            Self::SiteWide => {}
            Self::Products { .. } => assignment.product_ids = ids,
            Self::Variants { .. } => assignment.variant_ids = ids,
            Self::Categories { .. } => assignment.category_ids = ids,
            Self::Collections { .. } => assignment.collection_ids = ids,
        }
        assignment
    }
}

/// Reasons a scope/target assignment can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("unknown discount scope `{0}`")]
    InvalidScope(String),
    #[error("target ids do not match scope `{0}`")]
    InvalidAssignment(String),
}

impl ScopeError {
    /// Stable error code surfaced to admin transports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidScope(_) => "INVALID_SCOPE",
            Self::InvalidAssignment(_) => "INVALID_SCOPE_ASSIGNMENT",
        }
    }
}

/// Untyped scope + target-id sets, as supplied by an admin payload or
/// reconstructed from a stored discount. `resolve` is the single place the
/// scope/target invariant is enforced; the cascade trusts its output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeAssignment {
    pub scope: String,
    #[serde(default)]
    pub product_ids: Vec<i32>,
    #[serde(default)]
    pub variant_ids: Vec<i32>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    #[serde(default)]
    pub collection_ids: Vec<i32>,
}

impl ScopeAssignment {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Default::default()
        }
    }

    /// Overlay this assignment with the fields present in `patch`, producing
    /// the merged candidate a partial update must be validated against.
    pub fn overlay(mut self, patch: ScopePatch) -> Self {
        if let Some(scope) = patch.scope {
            self.scope = scope;
        }
        if let Some(ids) = patch.product_ids {
            self.product_ids = ids;
        }
        if let Some(ids) = patch.variant_ids {
            self.variant_ids = ids;
        }
        if let Some(ids) = patch.category_ids {
            self.category_ids = ids;
        }
        if let Some(ids) = patch.collection_ids {
            self.collection_ids = ids;
        }
        self
    }

    /// Validate the assignment and produce the typed scope.
    ///
    /// Exactly the target set matching `scope` may be non-empty; `SITE_WIDE`
    /// requires all four to be empty.
    pub fn resolve(&self) -> Result<DiscountScope, ScopeError> {
        let counts = [
            self.product_ids.len(),
            self.variant_ids.len(),
            self.category_ids.len(),
            self.collection_ids.len(),
        ];
        let only = |index: usize| counts.iter().enumerate().all(|(i, &n)| i == index || n == 0);
        let mismatch = || ScopeError::InvalidAssignment(self.scope.clone());

        match self.scope.as_str() {
            SCOPE_SITE_WIDE => {
                if counts.iter().all(|&n| n == 0) {
                    Ok(DiscountScope::SiteWide)
                } else {
                    Err(mismatch())
                }
            }
            SCOPE_PRODUCT => {
                if !self.product_ids.is_empty() && only(0) {
                    Ok(DiscountScope::Products {
                        ids: self.product_ids.clone(),
                    })
                } else {
                    Err(mismatch())
                }
            }
            SCOPE_VARIANT => {
                if !self.variant_ids.is_empty() && only(1) {
                    Ok(DiscountScope::Variants {
                        ids: self.variant_ids.clone(),
                    })
                } else {
                    Err(mismatch())
                }
            }
            SCOPE_CATEGORY => {
                if !self.category_ids.is_empty() && only(2) {
                    Ok(DiscountScope::Categories {
                        ids: self.category_ids.clone(),
                    })
                } else {
                    Err(mismatch())
                }
            }
            SCOPE_COLLECTION => {
                if !self.collection_ids.is_empty() && only(3) {
                    Ok(DiscountScope::Collections {
                        ids: self.collection_ids.clone(),
                    })
                } else {
                    Err(mismatch())
                }
            }
            other => Err(ScopeError::InvalidScope(other.to_string())),
        }
    }
}

/// Partial scope change carried by a discount update payload.
#[derive(Debug, Clone, Default)]
pub struct ScopePatch {
    pub scope: Option<String>,
    pub product_ids: Option<Vec<i32>>,
    pub variant_ids: Option<Vec<i32>>,
    pub category_ids: Option<Vec<i32>>,
    pub collection_ids: Option<Vec<i32>>,
}

impl ScopePatch {
    /// Whether the patch touches the scope or any target-id field at all.
    pub fn is_empty(&self) -> bool {
        self.scope.is_none()
            && self.product_ids.is_none()
            && self.variant_ids.is_none()
            && self.category_ids.is_none()
            && self.collection_ids.is_none()
    }
}

/// Domain representation of a time-boxed promotional rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    /// Unique identifier of the discount.
    pub id: i32,
    /// Human-readable name shown in pricing results.
    pub name: String,
    /// Optional longer description for admin screens.
    pub description: Option<String>,
    /// How the deduction is computed.
    #[serde(flatten)]
    pub value: DiscountValue,
    /// Which catalog entities the discount targets.
    #[serde(flatten)]
    pub scope: DiscountScope,
    /// Start of the active window, inclusive.
    pub starts_at: NaiveDateTime,
    /// End of the active window, inclusive.
    pub ends_at: NaiveDateTime,
    /// Administrative kill switch.
    pub is_active: bool,
    /// Higher priority applies earlier within a tier.
    pub priority: i32,
    /// Whether later discounts may still apply after this one fires.
    pub is_stackable: bool,
    /// Timestamp for when the discount record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the discount record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new discount.
#[derive(Debug, Clone)]
pub struct NewDiscount {
    pub name: String,
    pub description: Option<String>,
    pub value: DiscountValue,
    pub scope: DiscountScope,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub priority: i32,
    pub is_stackable: bool,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewDiscount {
    /// Build a new discount payload with the supplied details and current timestamp.
    pub fn new(
        name: impl Into<String>,
        value: DiscountValue,
        scope: DiscountScope,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            value,
            scope,
            starts_at,
            ends_at,
            is_active: true,
            priority: 0,
            is_stackable: true,
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Attach a descriptive text to the payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the application priority within the discount's tier.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Mark the discount as exclusive once it fires.
    pub fn non_stackable(mut self) -> Self {
        self.is_stackable = false;
        self
    }
}

/// Patch data applied when updating an existing discount.
///
/// The `scope` field is already validated against the merged view of the
/// existing record; `None` leaves the stored scope and targets untouched.
#[derive(Debug, Clone)]
pub struct UpdateDiscount {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub value: Option<DiscountValue>,
    pub scope: Option<DiscountScope>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
    pub priority: Option<i32>,
    pub is_stackable: Option<bool>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateDiscount {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateDiscount {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
            value: None,
            scope: None,
            starts_at: None,
            ends_at: None,
            is_active: None,
            priority: None,
            is_stackable: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the description, using `None` to clear an existing value.
    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|value| value.into()));
        self
    }

    pub fn value(mut self, value: DiscountValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Replace the scope and target assignment with a validated one.
    pub fn scope(mut self, scope: DiscountScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn stackable(mut self, is_stackable: bool) -> Self {
        self.is_stackable = Some(is_stackable);
        self
    }
}

/// Key identifying one tier's discount fetch during a pricing call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiscountTarget {
    SiteWide,
    Product(i32),
    Variant(i32),
    Category(i32),
    Collection(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(scope: &str) -> ScopeAssignment {
        ScopeAssignment::new(scope)
    }

    #[test]
    fn site_wide_requires_empty_targets() {
        assert_eq!(
            assignment(SCOPE_SITE_WIDE).resolve(),
            Ok(DiscountScope::SiteWide)
        );

        let mut tainted = assignment(SCOPE_SITE_WIDE);
        tainted.category_ids = vec![4];
        let err = tainted.resolve().unwrap_err();
        assert_eq!(err.code(), "INVALID_SCOPE_ASSIGNMENT");
    }

    #[test]
    fn product_scope_requires_product_ids_only() {
        let mut ok = assignment(SCOPE_PRODUCT);
        ok.product_ids = vec![1];
        assert_eq!(
            ok.resolve(),
            Ok(DiscountScope::Products { ids: vec![1] })
        );

        // Empty matching set is a mismatch.
        let err = assignment(SCOPE_PRODUCT).resolve().unwrap_err();
        assert!(matches!(err, ScopeError::InvalidAssignment(_)));

        // A foreign target set is a mismatch even alongside a valid one.
        let mut mixed = assignment(SCOPE_PRODUCT);
        mixed.product_ids = vec![1];
        mixed.variant_ids = vec![9];
        assert!(matches!(
            mixed.resolve(),
            Err(ScopeError::InvalidAssignment(_))
        ));
    }

    #[test]
    fn variant_category_collection_scopes_resolve() {
        let mut variants = assignment(SCOPE_VARIANT);
        variants.variant_ids = vec![7, 8];
        assert_eq!(
            variants.resolve(),
            Ok(DiscountScope::Variants { ids: vec![7, 8] })
        );

        let mut categories = assignment(SCOPE_CATEGORY);
        categories.category_ids = vec![3];
        assert_eq!(
            categories.resolve(),
            Ok(DiscountScope::Categories { ids: vec![3] })
        );

        let mut collections = assignment(SCOPE_COLLECTION);
        collections.collection_ids = vec![5];
        assert_eq!(
            collections.resolve(),
            Ok(DiscountScope::Collections { ids: vec![5] })
        );
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let err = assignment("BRAND").resolve().unwrap_err();
        assert_eq!(err, ScopeError::InvalidScope("BRAND".to_string()));
        assert_eq!(err.code(), "INVALID_SCOPE");
    }

    #[test]
    fn overlay_merges_patch_fields_over_existing() {
        let existing = DiscountScope::Products { ids: vec![1, 2] }.assignment();

        // Patch switches scope without clearing product ids: merged view invalid.
        let patch = ScopePatch {
            scope: Some(SCOPE_VARIANT.to_string()),
            ..Default::default()
        };
        let merged = existing.clone().overlay(patch);
        assert!(matches!(
            merged.resolve(),
            Err(ScopeError::InvalidAssignment(_))
        ));

        // Patch that also swaps the target sets is consistent.
        let patch = ScopePatch {
            scope: Some(SCOPE_VARIANT.to_string()),
            product_ids: Some(Vec::new()),
            variant_ids: Some(vec![40]),
            ..Default::default()
        };
        let merged = existing.overlay(patch);
        assert_eq!(
            merged.resolve(),
            Ok(DiscountScope::Variants { ids: vec![40] })
        );
    }

    #[test]
    fn percentage_amount_rounds_half_away_from_zero() {
        assert_eq!(DiscountValue::Percentage(10).amount_cents(10_000), 1_000);
        assert_eq!(DiscountValue::Percentage(15).amount_cents(10), 2); // 1.5 -> 2
        assert_eq!(DiscountValue::Percentage(33).amount_cents(100), 33);
        assert_eq!(DiscountValue::Percentage(0).amount_cents(10_000), 0);
    }

    #[test]
    fn fixed_amount_is_verbatim() {
        assert_eq!(DiscountValue::Fixed(500).amount_cents(10_000), 500);
        assert_eq!(DiscountValue::Fixed(500).amount_cents(100), 500);
    }

    #[test]
    fn percentage_amount_is_monotonic_in_price() {
        let value = DiscountValue::Percentage(7);
        let mut last = 0;
        for price in 0..2_000 {
            let amount = value.amount_cents(price);
            assert!(amount >= last);
            last = amount;
        }
    }
}
