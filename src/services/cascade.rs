//! The discount cascade: ordered application of scoped discounts against a
//! progressively-reduced unit price.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::domain::discount::{Discount, DiscountTarget};
use crate::domain::pricing::AppliedDiscount;
use crate::domain::product::Product;
use crate::domain::variant::Variant;
use crate::repository::{CategoryReader, DiscountReader};
use crate::services::ServiceResult;

/// Request-scoped memoization for one pricing call.
///
/// Constructed fresh at the start of every `resolve_*_pricing` call and
/// threaded through by the caller; never a module-level singleton, so
/// concurrent requests cannot observe each other's cached data. A cart prices
/// many lines and must not refetch identical tiers (two lines in the same
/// category share one category-tier fetch).
#[derive(Debug, Default)]
pub struct PricingCache {
    chains: HashMap<i32, Vec<i32>>,
    tiers: HashMap<DiscountTarget, Vec<Discount>>,
}

impl PricingCache {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolve the ancestry chain for `leaf_id`, root-first and leaf-last.
///
/// Walks upward via `parent_id`, prepending each visited category, and stops
/// at a null parent or a dangling reference. A repeated id ends the walk as
/// well, keeping it finite on corrupt parent data. Memoized per call in
/// `cache`, keyed by the leaf id.
pub fn category_chain<R>(
    repo: &R,
    cache: &mut PricingCache,
    leaf_id: i32,
) -> ServiceResult<Vec<i32>>
where
    R: CategoryReader + ?Sized,
{
    if let Some(chain) = cache.chains.get(&leaf_id) {
        return Ok(chain.clone());
    }

    let mut chain: Vec<i32> = Vec::new();
    let mut cursor = Some(leaf_id);
    while let Some(id) = cursor {
        if chain.contains(&id) {
            break;
        }
        let Some(category) = repo.get_category_by_id(id)? else {
            break;
        };
        chain.insert(0, id);
        cursor = category.parent_id;
    }

    cache.chains.insert(leaf_id, chain.clone());
    Ok(chain)
}

/// Apply one tier's already-sorted discounts to `price`, appending fired
/// discounts to `applied`.
///
/// A locked cascade contributes nothing. A discount whose computed amount is
/// zero or negative is invisible: it neither changes the price nor appears in
/// `applied` nor sets the lock. A non-stackable discount with positive effect
/// locks the cascade, suppressing the rest of this tier and every later one.
pub fn apply_tier(
    mut price: i64,
    discounts: &[Discount],
    locked: &mut bool,
    applied: &mut Vec<AppliedDiscount>,
) -> i64 {
    if *locked {
        return price;
    }

    for discount in discounts {
        let amount = discount.value.amount_cents(price);
        if amount <= 0 {
            continue;
        }

        price = (price - amount).max(0);
        applied.push(AppliedDiscount {
            id: discount.id,
            name: discount.name.clone(),
            value: discount.value,
            amount_cents: amount,
            is_stackable: discount.is_stackable,
        });

        if !discount.is_stackable {
            *locked = true;
            break;
        }
    }

    price
}

/// Run the full cascade for one variant, starting unlocked.
///
/// Tier order is fixed: VARIANT, PRODUCT, CATEGORY ancestry root-to-leaf (the
/// broadest category discount is tried before the most specific one), one
/// tier per collection id, then SITE_WIDE. Returns the discounted unit price
/// and the discounts that fired, in application order.
pub fn run_cascade<R>(
    repo: &R,
    cache: &mut PricingCache,
    variant: &Variant,
    product: &Product,
    collection_ids: &[i32],
    now: NaiveDateTime,
) -> ServiceResult<(i64, Vec<AppliedDiscount>)>
where
    R: CategoryReader + DiscountReader + ?Sized,
{
    let mut targets: Vec<DiscountTarget> = vec![
        DiscountTarget::Variant(variant.id),
        DiscountTarget::Product(product.id),
    ];
    if let Some(category_id) = product.category_id {
        for id in category_chain(repo, cache, category_id)? {
            targets.push(DiscountTarget::Category(id));
        }
    }
    for &id in collection_ids {
        targets.push(DiscountTarget::Collection(id));
    }
    targets.push(DiscountTarget::SiteWide);

    let mut price = variant.price_cents;
    let mut locked = false;
    let mut applied: Vec<AppliedDiscount> = Vec::new();

    for target in targets {
        if locked {
            break;
        }
        if !cache.tiers.contains_key(&target) {
            let discounts = repo.list_active_discounts(&target, now)?;
            cache.tiers.insert(target.clone(), discounts);
        }
        let discounts = &cache.tiers[&target];
        price = apply_tier(price, discounts, &mut locked, &mut applied);
    }

    Ok((price, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::discount::{DiscountScope, DiscountValue};
    use crate::domain::product::Product;
    use crate::domain::variant::Variant;
    use crate::repository::mock::{MockCategoryReader, MockDiscountReader};
    use crate::repository::RepositoryResult;

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn discount(id: i32, value: DiscountValue, is_stackable: bool) -> Discount {
        Discount {
            id,
            name: format!("discount-{id}"),
            description: None,
            value,
            scope: DiscountScope::SiteWide,
            starts_at: datetime(),
            ends_at: datetime(),
            is_active: true,
            priority: 0,
            is_stackable,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn category(id: i32, parent_id: Option<i32>) -> crate::domain::category::Category {
        crate::domain::category::Category {
            id,
            parent_id,
            name: format!("category-{id}"),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    #[test]
    fn tier_applies_in_order_against_reduced_price() {
        let discounts = vec![
            discount(1, DiscountValue::Percentage(10), true),
            discount(2, DiscountValue::Percentage(10), true),
        ];
        let mut locked = false;
        let mut applied = Vec::new();

        let price = apply_tier(10_000, &discounts, &mut locked, &mut applied);

        assert_eq!(price, 8_100); // 10000 -> 9000 -> 8100
        assert!(!locked);
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].amount_cents, 1_000);
        assert_eq!(applied[1].amount_cents, 900);
    }

    #[test]
    fn locked_tier_contributes_nothing() {
        let discounts = vec![discount(1, DiscountValue::Fixed(500), true)];
        let mut locked = true;
        let mut applied = Vec::new();

        let price = apply_tier(10_000, &discounts, &mut locked, &mut applied);

        assert_eq!(price, 10_000);
        assert!(locked);
        assert!(applied.is_empty());
    }

    #[test]
    fn non_stackable_hit_locks_and_stops_the_tier() {
        let discounts = vec![
            discount(1, DiscountValue::Fixed(500), false),
            discount(2, DiscountValue::Fixed(500), true),
        ];
        let mut locked = false;
        let mut applied = Vec::new();

        let price = apply_tier(10_000, &discounts, &mut locked, &mut applied);

        assert_eq!(price, 9_500);
        assert!(locked);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].id, 1);
    }

    #[test]
    fn zero_amount_discount_is_invisible_even_when_non_stackable() {
        let discounts = vec![
            discount(1, DiscountValue::Percentage(0), false),
            discount(2, DiscountValue::Fixed(300), true),
        ];
        let mut locked = false;
        let mut applied = Vec::new();

        let price = apply_tier(10_000, &discounts, &mut locked, &mut applied);

        assert_eq!(price, 9_700);
        assert!(!locked);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].id, 2);
    }

    #[test]
    fn price_is_floored_at_zero() {
        let discounts = vec![discount(1, DiscountValue::Fixed(2_000), true)];
        let mut locked = false;
        let mut applied = Vec::new();

        let price = apply_tier(1_500, &discounts, &mut locked, &mut applied);

        assert_eq!(price, 0);
        assert_eq!(applied[0].amount_cents, 2_000);
    }

    #[test]
    fn chain_is_root_first_leaf_last() {
        let mut repo = MockCategoryReader::new();
        repo.expect_get_category_by_id()
            .returning(|id| match id {
                3 => Ok(Some(category(3, Some(2)))),
                2 => Ok(Some(category(2, Some(1)))),
                1 => Ok(Some(category(1, None))),
                _ => Ok(None),
            });

        let mut cache = PricingCache::new();
        let chain = category_chain(&repo, &mut cache, 3).expect("chain");

        assert_eq!(chain, vec![1, 2, 3]);
    }

    #[test]
    fn dangling_parent_ends_the_walk() {
        let mut repo = MockCategoryReader::new();
        repo.expect_get_category_by_id()
            .returning(|id| match id {
                5 => Ok(Some(category(5, Some(99)))),
                _ => Ok(None),
            });

        let mut cache = PricingCache::new();
        let chain = category_chain(&repo, &mut cache, 5).expect("chain");

        assert_eq!(chain, vec![5]);
    }

    #[test]
    fn missing_leaf_yields_empty_chain() {
        let mut repo = MockCategoryReader::new();
        repo.expect_get_category_by_id().returning(|_| Ok(None));

        let mut cache = PricingCache::new();
        let chain = category_chain(&repo, &mut cache, 42).expect("chain");

        assert!(chain.is_empty());
    }

    #[test]
    fn parent_cycle_terminates() {
        let mut repo = MockCategoryReader::new();
        repo.expect_get_category_by_id()
            .returning(|id| match id {
                1 => Ok(Some(category(1, Some(2)))),
                2 => Ok(Some(category(2, Some(1)))),
                _ => Ok(None),
            });

        let mut cache = PricingCache::new();
        let chain = category_chain(&repo, &mut cache, 1).expect("chain");

        assert_eq!(chain, vec![2, 1]);
    }

    struct FakeRepo {
        category_reader: MockCategoryReader,
        discount_reader: MockDiscountReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                category_reader: MockCategoryReader::new(),
                discount_reader: MockDiscountReader::new(),
            }
        }
    }

    impl CategoryReader for FakeRepo {
        fn get_category_by_id(
            &self,
            id: i32,
        ) -> RepositoryResult<Option<crate::domain::category::Category>> {
            self.category_reader.get_category_by_id(id)
        }
    }

    impl DiscountReader for FakeRepo {
        fn get_discount_by_id(&self, id: i32) -> RepositoryResult<Option<Discount>> {
            self.discount_reader.get_discount_by_id(id)
        }

        fn list_discounts(&self) -> RepositoryResult<Vec<Discount>> {
            self.discount_reader.list_discounts()
        }

        fn list_active_discounts(
            &self,
            target: &DiscountTarget,
            now: NaiveDateTime,
        ) -> RepositoryResult<Vec<Discount>> {
            self.discount_reader.list_active_discounts(target, now)
        }
    }

    fn variant(id: i32, product_id: i32, price_cents: i64) -> Variant {
        Variant {
            id,
            product_id,
            sku: None,
            price_cents,
            stock: 10,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn product(id: i32, category_id: Option<i32>) -> Product {
        Product {
            id,
            category_id,
            name: format!("product-{id}"),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    #[test]
    fn collection_tier_runs_after_categories_and_before_site_wide() {
        let mut repo = FakeRepo::new();
        repo.category_reader
            .expect_get_category_by_id()
            .returning(|id| match id {
                3 => Ok(Some(category(3, None))),
                _ => Ok(None),
            });
        repo.discount_reader
            .expect_list_active_discounts()
            .returning(|target, _| match target {
                DiscountTarget::Category(3) => Ok(vec![discount(
                    23,
                    DiscountValue::Percentage(10),
                    true,
                )]),
                DiscountTarget::Collection(9) => {
                    Ok(vec![discount(29, DiscountValue::Fixed(500), true)])
                }
                DiscountTarget::SiteWide => {
                    Ok(vec![discount(30, DiscountValue::Fixed(250), true)])
                }
                _ => Ok(Vec::new()),
            });

        let mut cache = PricingCache::new();
        let (price, applied) = run_cascade(
            &repo,
            &mut cache,
            &variant(1, 7, 10_000),
            &product(7, Some(3)),
            &[9],
            datetime(),
        )
        .expect("cascade");

        // Category fires against 10000, the collection against 9000, then
        // the site-wide deduction last.
        let ids: Vec<i32> = applied.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![23, 29, 30]);
        assert_eq!(applied[0].amount_cents, 1_000);
        assert_eq!(price, 8_250);
    }

    #[test]
    fn non_stackable_collection_hit_suppresses_site_wide() {
        let mut repo = FakeRepo::new();
        repo.discount_reader
            .expect_list_active_discounts()
            .returning(|target, _| match target {
                DiscountTarget::Collection(9) => {
                    Ok(vec![discount(29, DiscountValue::Fixed(500), false)])
                }
                DiscountTarget::SiteWide => {
                    panic!("site-wide tier fetched after the collection tier locked")
                }
                _ => Ok(Vec::new()),
            });

        let mut cache = PricingCache::new();
        let (price, applied) = run_cascade(
            &repo,
            &mut cache,
            &variant(1, 7, 10_000),
            &product(7, None),
            &[9],
            datetime(),
        )
        .expect("cascade");

        assert_eq!(price, 9_500);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].id, 29);
    }

    #[test]
    fn collections_run_in_the_order_given() {
        let mut repo = FakeRepo::new();
        repo.discount_reader
            .expect_list_active_discounts()
            .returning(|target, _| match target {
                DiscountTarget::Collection(4) => {
                    Ok(vec![discount(14, DiscountValue::Percentage(10), true)])
                }
                DiscountTarget::Collection(5) => {
                    Ok(vec![discount(15, DiscountValue::Percentage(10), true)])
                }
                _ => Ok(Vec::new()),
            });

        let mut cache = PricingCache::new();
        let (price, applied) = run_cascade(
            &repo,
            &mut cache,
            &variant(1, 7, 10_000),
            &product(7, None),
            &[4, 5],
            datetime(),
        )
        .expect("cascade");

        let ids: Vec<i32> = applied.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![14, 15]);
        assert_eq!(applied[1].amount_cents, 900);
        assert_eq!(price, 8_100);
    }

    #[test]
    fn chain_is_memoized_per_cache() {
        let mut repo = MockCategoryReader::new();
        repo.expect_get_category_by_id()
            .times(2) // ids 2 and 1, fetched once each
            .returning(|id| match id {
                2 => Ok(Some(category(2, Some(1)))),
                1 => Ok(Some(category(1, None))),
                _ => Ok(None),
            });

        let mut cache = PricingCache::new();
        let first = category_chain(&repo, &mut cache, 2).expect("chain");
        let second = category_chain(&repo, &mut cache, 2).expect("chain");

        assert_eq!(first, vec![1, 2]);
        assert_eq!(first, second);
    }
}
