use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::discount::{DiscountValue, ScopeAssignment, ScopePatch};
use crate::services::discounts::{DiscountChanges, DiscountDraft};

/// Maximum allowed length for a discount name.
const NAME_MAX_LEN: u64 = 128;

/// Result type returned by the discount form helpers.
pub type DiscountFormResult<T> = Result<T, DiscountFormError>;

/// Errors that can occur while processing discount payloads.
#[derive(Debug, Error)]
pub enum DiscountFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The value kind is neither `PERCENTAGE` nor `FIXED`.
    #[error("unknown value kind `{0}`")]
    UnknownValueKind(String),
    /// A percentage outside the 0..=100 range.
    #[error("percentage {0} is out of range")]
    PercentOutOfRange(i64),
    /// A fixed deduction below zero.
    #[error("fixed amount {0} cannot be negative")]
    NegativeFixedAmount(i64),
    /// The active window ends before it starts.
    #[error("active window ends before it starts")]
    InvalidWindow,
    /// An update supplied only one half of the `kind`/`value_cents` pair.
    #[error("`kind` and `value_cents` must be supplied together")]
    IncompleteValue,
}

fn parse_value(kind: &str, value_cents: i64) -> DiscountFormResult<DiscountValue> {
    let value = DiscountValue::from_parts(kind, value_cents)
        .ok_or_else(|| DiscountFormError::UnknownValueKind(kind.to_string()))?;
    match value {
        DiscountValue::Percentage(percent) if !(0..=100).contains(&percent) => {
            Err(DiscountFormError::PercentOutOfRange(percent))
        }
        DiscountValue::Fixed(amount) if amount < 0 => {
            Err(DiscountFormError::NegativeFixedAmount(amount))
        }
        value => Ok(value),
    }
}

fn default_true() -> bool {
    true
}

/// JSON payload for creating a discount.
///
/// Scope and target-id consistency is not checked here; that is the service
/// layer's job, so transports all share one set of scope error codes.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDiscountForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub description: Option<String>,
    /// `PERCENTAGE` or `FIXED`.
    pub kind: String,
    pub value_cents: i64,
    /// `SITE_WIDE`, `PRODUCT`, `VARIANT`, `CATEGORY` or `COLLECTION`.
    pub scope: String,
    #[serde(default)]
    pub product_ids: Vec<i32>,
    #[serde(default)]
    pub variant_ids: Vec<i32>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    #[serde(default)]
    pub collection_ids: Vec<i32>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_stackable: bool,
}

impl CreateDiscountForm {
    /// Validates the payload into a service-layer draft.
    pub fn into_draft(self) -> DiscountFormResult<DiscountDraft> {
        self.validate()?;

        if self.ends_at < self.starts_at {
            return Err(DiscountFormError::InvalidWindow);
        }
        let value = parse_value(&self.kind, self.value_cents)?;

        let mut assignment = ScopeAssignment::new(self.scope);
        assignment.product_ids = self.product_ids;
        assignment.variant_ids = self.variant_ids;
        assignment.category_ids = self.category_ids;
        assignment.collection_ids = self.collection_ids;

        Ok(DiscountDraft {
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            value,
            assignment,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
            priority: self.priority,
            is_stackable: self.is_stackable,
        })
    }
}

/// Distinguishes an absent JSON field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// JSON payload for partially updating a discount. Absent fields keep their
/// stored values; `description: null` clears the description.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDiscountForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub kind: Option<String>,
    pub value_cents: Option<i64>,
    pub scope: Option<String>,
    pub product_ids: Option<Vec<i32>>,
    pub variant_ids: Option<Vec<i32>>,
    pub category_ids: Option<Vec<i32>>,
    pub collection_ids: Option<Vec<i32>>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
    pub priority: Option<i32>,
    pub is_stackable: Option<bool>,
}

impl UpdateDiscountForm {
    /// Validates the payload into a service-layer change set.
    ///
    /// `kind` and `value_cents` must travel together so the pair can be
    /// range-checked as one value.
    pub fn into_changes(self) -> DiscountFormResult<DiscountChanges> {
        self.validate()?;

        if let (Some(starts_at), Some(ends_at)) = (self.starts_at, self.ends_at)
            && ends_at < starts_at
        {
            return Err(DiscountFormError::InvalidWindow);
        }

        let value = match (self.kind, self.value_cents) {
            (Some(kind), Some(value_cents)) => Some(parse_value(&kind, value_cents)?),
            (None, None) => None,
            _ => return Err(DiscountFormError::IncompleteValue),
        };

        Ok(DiscountChanges {
            name: self.name.map(|name| name.trim().to_string()),
            description: self.description.map(|description| {
                description
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty())
            }),
            value,
            scope: ScopePatch {
                scope: self.scope,
                product_ids: self.product_ids,
                variant_ids: self.variant_ids,
                category_ids: self.category_ids,
                collection_ids: self.collection_ids,
            },
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
            priority: self.priority,
            is_stackable: self.is_stackable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form(json: serde_json::Value) -> CreateDiscountForm {
        serde_json::from_value(json).expect("deserialize")
    }

    #[test]
    fn create_form_builds_a_draft() {
        let form = create_form(serde_json::json!({
            "name": "  Spring sale  ",
            "kind": "PERCENTAGE",
            "value_cents": 10,
            "scope": "PRODUCT",
            "product_ids": [1, 2],
            "starts_at": "2024-03-01T00:00:00",
            "ends_at": "2024-05-31T00:00:00",
        }));

        let draft = form.into_draft().expect("draft");
        assert_eq!(draft.name, "Spring sale");
        assert_eq!(draft.value, DiscountValue::Percentage(10));
        assert_eq!(draft.assignment.scope, "PRODUCT");
        assert_eq!(draft.assignment.product_ids, vec![1, 2]);
        assert!(draft.is_active);
        assert!(draft.is_stackable);
        assert_eq!(draft.priority, 0);
    }

    #[test]
    fn create_form_rejects_bad_values() {
        let base = serde_json::json!({
            "name": "sale",
            "scope": "SITE_WIDE",
            "starts_at": "2024-03-01T00:00:00",
            "ends_at": "2024-05-31T00:00:00",
        });

        let mut over = base.clone();
        over["kind"] = "PERCENTAGE".into();
        over["value_cents"] = 150.into();
        assert!(matches!(
            create_form(over).into_draft(),
            Err(DiscountFormError::PercentOutOfRange(150))
        ));

        let mut negative = base.clone();
        negative["kind"] = "FIXED".into();
        negative["value_cents"] = (-5).into();
        assert!(matches!(
            create_form(negative).into_draft(),
            Err(DiscountFormError::NegativeFixedAmount(-5))
        ));

        let mut unknown = base.clone();
        unknown["kind"] = "BOGOF".into();
        unknown["value_cents"] = 1.into();
        assert!(matches!(
            create_form(unknown).into_draft(),
            Err(DiscountFormError::UnknownValueKind(_))
        ));

        let mut window = base;
        window["kind"] = "FIXED".into();
        window["value_cents"] = 100.into();
        window["starts_at"] = "2024-06-01T00:00:00".into();
        window["ends_at"] = "2024-05-31T00:00:00".into();
        assert!(matches!(
            create_form(window).into_draft(),
            Err(DiscountFormError::InvalidWindow)
        ));
    }

    #[test]
    fn update_form_distinguishes_absent_from_null_description() {
        let absent: UpdateDiscountForm =
            serde_json::from_value(serde_json::json!({})).expect("deserialize");
        assert_eq!(absent.into_changes().expect("changes").description, None);

        let cleared: UpdateDiscountForm =
            serde_json::from_value(serde_json::json!({"description": null}))
                .expect("deserialize");
        assert_eq!(
            cleared.into_changes().expect("changes").description,
            Some(None)
        );

        let replaced: UpdateDiscountForm =
            serde_json::from_value(serde_json::json!({"description": "new text"}))
                .expect("deserialize");
        assert_eq!(
            replaced.into_changes().expect("changes").description,
            Some(Some("new text".to_string()))
        );
    }

    #[test]
    fn update_form_passes_scope_fields_through_as_a_patch() {
        let form: UpdateDiscountForm = serde_json::from_value(serde_json::json!({
            "scope": "VARIANT",
            "variant_ids": [40],
            "product_ids": [],
        }))
        .expect("deserialize");

        let changes = form.into_changes().expect("changes");
        assert_eq!(changes.scope.scope.as_deref(), Some("VARIANT"));
        assert_eq!(changes.scope.variant_ids, Some(vec![40]));
        assert_eq!(changes.scope.product_ids, Some(Vec::new()));
        assert_eq!(changes.scope.category_ids, None);
    }

    #[test]
    fn update_form_requires_kind_and_value_together() {
        let only_kind: UpdateDiscountForm =
            serde_json::from_value(serde_json::json!({"kind": "FIXED"})).expect("deserialize");
        assert!(only_kind.into_changes().is_err());

        let only_value: UpdateDiscountForm =
            serde_json::from_value(serde_json::json!({"value_cents": 500}))
                .expect("deserialize");
        assert!(only_value.into_changes().is_err());
    }
}
