//! In-memory inventory store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use spantry_core::{DomainError, DomainResult, Entity, ItemId, Violation, Violations};

use crate::item::{Category, Item, ItemDraft, Location};
use crate::validation::{field, validate};

/// In-memory inventory: the single source of truth for which items exist.
///
/// Every mutation goes through the validation engine and commits under the
/// write lock, so readers see either the old value or the new one. Callers
/// only ever receive copies.
#[derive(Debug, Default)]
pub struct InventoryStore {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously committed items.
    ///
    /// Each item is re-validated; revisions are kept as persisted.
    pub fn restore(items: impl IntoIterator<Item = Item>) -> DomainResult<Self> {
        let mut map = HashMap::new();
        for item in items {
            let revision = item.revision().max(1);
            let admitted = admit(item.to_draft())?.with_revision(revision);
            let id = *admitted.id();
            if map.insert(id, admitted).is_some() {
                return Err(DomainError::conflict(format!("duplicate item {id} in restored state")));
            }
        }
        Ok(Self {
            items: RwLock::new(map),
        })
    }

    /// Validate and insert a new item.
    pub fn add(&self, candidate: ItemDraft) -> DomainResult<Item> {
        let item = admit(candidate)?.with_revision(1);
        let id = *item.id();

        let mut items = self.write()?;
        if items.contains_key(&id) {
            return Err(DomainError::conflict(format!("item {id} already exists")));
        }
        items.insert(id, item.clone());
        Ok(item)
    }

    /// Validate the full replacement for `id` and swap it in.
    ///
    /// A candidate carrying a different id is reported together with any
    /// other broken rule.
    pub fn update(&self, id: ItemId, candidate: ItemDraft) -> DomainResult<Item> {
        let mut violations = Violations::new();
        if candidate.id() != id {
            violations.push(Violation::new(
                field::ID,
                "immutable",
                format!("candidate id {} does not match item {id}", candidate.id()),
            ));
        }
        violations.extend(validate(&candidate));
        if !violations.is_empty() {
            return Err(DomainError::Validation(violations));
        }
        let item = candidate.into_item()?;

        let mut items = self.write()?;
        let current = items
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("no item with id {id}")))?;
        let revision = current
            .revision()
            .checked_add(1)
            .ok_or_else(|| DomainError::invariant(format!("revision of item {id} is exhausted")))?;
        let item = item.with_revision(revision);
        *current = item.clone();
        Ok(item)
    }

    /// Delete and return the item.
    pub fn remove(&self, id: ItemId) -> DomainResult<Item> {
        self.write()?
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(format!("no item with id {id}")))
    }

    pub fn get(&self, id: ItemId) -> DomainResult<Item> {
        self.read()?
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("no item with id {id}")))
    }

    /// Point-in-time copy of every item. Order carries no meaning.
    pub fn list(&self) -> DomainResult<Vec<Item>> {
        Ok(self.read()?.values().cloned().collect())
    }

    /// Point-in-time copy of items matching `predicate`.
    pub fn snapshot_where(&self, predicate: impl Fn(&Item) -> bool) -> DomainResult<Vec<Item>> {
        Ok(self
            .read()?
            .values()
            .filter(|item| predicate(item))
            .cloned()
            .collect())
    }

    pub fn find_by_location(&self, location: Location) -> DomainResult<Vec<Item>> {
        self.snapshot_where(|item| item.location() == Some(location))
    }

    pub fn find_by_category(&self, category: Category) -> DomainResult<Vec<Item>> {
        self.snapshot_where(|item| item.category() == Some(category))
    }

    pub fn len(&self) -> DomainResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Re-check every committed item against the current rule set.
    ///
    /// Any failure is an internal-consistency fault.
    pub fn verify_integrity(&self) -> DomainResult<()> {
        let items = self.read()?;
        for (key, item) in items.iter() {
            if key != item.id() {
                return Err(DomainError::invariant(format!(
                    "item {} stored under key {key}",
                    item.id()
                )));
            }
            let violations = validate(&item.to_draft());
            if !violations.is_empty() {
                return Err(DomainError::invariant(format!(
                    "committed item {key} is invalid: {violations}"
                )));
            }
        }
        Ok(())
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, HashMap<ItemId, Item>>> {
        self.items
            .read()
            .map_err(|_| DomainError::invariant("inventory lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, HashMap<ItemId, Item>>> {
        self.items
            .write()
            .map_err(|_| DomainError::invariant("inventory lock poisoned"))
    }
}

/// Validate and convert a candidate.
///
/// The candidate is owned, so the value that passed validation is exactly the
/// value that gets committed.
fn admit(candidate: ItemDraft) -> DomainResult<Item> {
    let violations = validate(&candidate);
    if !violations.is_empty() {
        return Err(DomainError::Validation(violations));
    }
    candidate.into_item()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::item::Unit;

    fn rice() -> ItemDraft {
        Item::draft("Rice", 2.0).unit(Unit::Count)
    }

    #[test]
    fn add_then_get_returns_the_same_fields() {
        let store = InventoryStore::new();
        let candidate = rice().category("grains").location("pantry").expires("2024-05-01");
        let id = candidate.id();

        let added = store.add(candidate).unwrap();
        let fetched = store.get(id).unwrap();

        assert_eq!(*added.id(), id);
        assert!(fetched.same_contents(&added));
        assert_eq!(fetched.name(), "Rice");
        assert_eq!(fetched.quantity(), 2.0);
        assert_eq!(fetched.unit(), Unit::Count);
        assert_eq!(fetched.revision(), 1);
    }

    #[test]
    fn add_rejects_invalid_candidates_with_all_violations() {
        let store = InventoryStore::new();
        let err = store.add(Item::draft(" ", -1.0)).unwrap_err();

        let violations = err.violations().unwrap();
        assert!(violations.contains(field::NAME, "required"));
        assert!(violations.contains(field::QUANTITY, "non_negative"));
        assert!(violations.contains(field::UNIT, "required"));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn add_with_duplicate_id_conflicts_and_keeps_the_original() {
        let store = InventoryStore::new();
        let first = rice();
        let id = first.id();
        store.add(first).unwrap();

        let dup = ItemDraft::with_id(id, "Beans", 9.0).unit("count");
        let err = store.add(dup).unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.get(id).unwrap().name(), "Rice");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn update_replaces_the_whole_value_and_bumps_revision() {
        let store = InventoryStore::new();
        let existing = store.add(rice().location("pantry")).unwrap();

        store
            .update(*existing.id(), existing.to_draft().quantity(5.0))
            .unwrap();
        let after = store.get(*existing.id()).unwrap();

        assert_eq!(after.quantity(), 5.0);
        assert_eq!(after.name(), existing.name());
        assert_eq!(after.unit(), existing.unit());
        assert_eq!(after.location(), existing.location());
        assert_eq!(after.expiration_date(), existing.expiration_date());
        assert_eq!(after.revision(), 2);
    }

    #[test]
    fn update_rejects_negative_quantity_without_clamping() {
        let store = InventoryStore::new();
        let existing = store.add(rice()).unwrap();

        let err = store
            .update(*existing.id(), existing.to_draft().quantity(-1.0))
            .unwrap_err();

        assert!(err.violations().unwrap().contains(field::QUANTITY, "non_negative"));
        assert_eq!(store.get(*existing.id()).unwrap().quantity(), 2.0);
    }

    #[test]
    fn update_of_missing_item_is_not_found() {
        let store = InventoryStore::new();
        let candidate = rice();
        let err = store.update(candidate.id(), candidate).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn update_cannot_change_the_id() {
        let store = InventoryStore::new();
        let existing = store.add(rice()).unwrap();

        let err = store.update(*existing.id(), rice()).unwrap_err();
        assert!(err.violations().unwrap().contains(field::ID, "immutable"));
    }

    #[test]
    fn update_reports_id_mismatch_alongside_rule_violations() {
        let store = InventoryStore::new();
        let existing = store.add(rice()).unwrap();

        let err = store
            .update(*existing.id(), rice().quantity(-1.0).name(""))
            .unwrap_err();

        let violations = err.violations().unwrap();
        assert!(violations.contains(field::ID, "immutable"));
        assert!(violations.contains(field::QUANTITY, "non_negative"));
        assert!(violations.contains(field::NAME, "required"));
    }

    #[test]
    fn invalid_update_of_missing_item_is_a_validation_error() {
        let store = InventoryStore::new();
        let candidate = rice().quantity(-1.0);

        let err = store.update(candidate.id(), candidate).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn exhausted_revision_is_an_invariant_fault_not_an_overflow() {
        let raw = serde_json::json!([{
            "id": "0190a0a0-0000-7000-8000-000000000002",
            "name": "Rice",
            "quantity": 1.0,
            "unit": "count",
            "revision": u64::MAX,
        }]);
        let items: Vec<Item> = serde_json::from_value(raw).unwrap();
        let store = InventoryStore::restore(items).unwrap();
        let existing = store.list().unwrap().remove(0);

        let err = store
            .update(*existing.id(), existing.to_draft().quantity(2.0))
            .unwrap_err();

        assert!(matches!(err, DomainError::InvariantViolation(_)));
        let kept = store.get(*existing.id()).unwrap();
        assert_eq!(kept.quantity(), 1.0);
        assert_eq!(kept.revision(), u64::MAX);
    }

    #[test]
    fn readers_never_observe_a_partially_applied_update() {
        let store = Arc::new(InventoryStore::new());
        let seed = store
            .add(Item::draft("A", 1.0).unit("count").location("pantry"))
            .unwrap();
        let id = *seed.id();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..500 {
                    let current = store.get(id).unwrap();
                    let next = if n % 2 == 0 {
                        current.to_draft().name("B").quantity(2.0).location("fridge")
                    } else {
                        current.to_draft().name("A").quantity(1.0).location("pantry")
                    };
                    store.update(id, next).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let seen = store.get(id).unwrap();
                        let listed = store.list().unwrap();
                        for item in std::iter::once(&seen).chain(listed.iter()) {
                            let consistent = match item.name() {
                                "A" => item.quantity() == 1.0 && item.location() == Some(Location::Pantry),
                                "B" => item.quantity() == 2.0 && item.location() == Some(Location::Fridge),
                                _ => false,
                            };
                            assert!(consistent, "torn read: {item:?}");
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(store.get(id).unwrap().revision(), 501);
    }

    #[test]
    fn remove_succeeds_once_then_not_found() {
        let store = InventoryStore::new();
        let added = store.add(rice()).unwrap();
        let id = *added.id();

        let removed = store.remove(id).unwrap();
        assert!(removed.same_contents(&added));
        assert!(matches!(store.remove(id), Err(DomainError::NotFound(_))));
        assert!(matches!(store.get(id), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn returned_values_are_copies() {
        let store = InventoryStore::new();
        let added = store.add(rice()).unwrap();

        let mut listed = store.list().unwrap();
        listed.clear();
        let _edited = added.to_draft().name("Changed");

        assert_eq!(store.get(*added.id()).unwrap().name(), "Rice");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn filters_by_location_and_category() {
        let store = InventoryStore::new();
        store.add(rice().location("pantry").category("grains")).unwrap();
        store
            .add(Item::draft("Milk", 1.0).unit("l").location("fridge").category("dairy"))
            .unwrap();
        store.add(Item::draft("Salt", 500.0).unit("g")).unwrap();

        let fridge = store.find_by_location(Location::Fridge).unwrap();
        assert_eq!(fridge.len(), 1);
        assert_eq!(fridge[0].name(), "Milk");

        let grains = store.find_by_category(Category::Grains).unwrap();
        assert_eq!(grains.len(), 1);
        assert_eq!(grains[0].name(), "Rice");

        assert!(store.find_by_location(Location::Freezer).unwrap().is_empty());
    }

    #[test]
    fn list_snapshot_does_not_observe_concurrent_adds() {
        let store = Arc::new(InventoryStore::new());
        for n in 0..10 {
            store
                .add(Item::draft(format!("item-{n}"), n as f64).unit("count"))
                .unwrap();
        }

        let snapshot = store.list().unwrap();
        let mut seen = 0;
        for (idx, _item) in snapshot.iter().enumerate() {
            if idx == 0 {
                let writer = Arc::clone(&store);
                thread::spawn(move || writer.add(Item::draft("late", 1.0).unit("count")).unwrap())
                    .join()
                    .unwrap();
            }
            seen += 1;
        }

        assert_eq!(seen, 10);
        assert_eq!(store.len().unwrap(), 11);
    }

    #[test]
    fn concurrent_adds_all_commit_and_stay_valid() {
        let store = Arc::new(InventoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for n in 0..25 {
                        store
                            .add(Item::draft(format!("t{t}-{n}"), n as f64).unit("count"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.len().unwrap(), 200);
        store.verify_integrity().unwrap();
    }

    #[test]
    fn verify_integrity_flags_a_corrupted_entry() {
        let store = InventoryStore::new();
        store.add(rice()).unwrap();
        assert!(store.verify_integrity().is_ok());

        // Bypasses `admit`, which is the only way such a value could exist.
        let corrupted = Item::draft("Ghost", -4.0)
            .unit("count")
            .into_item()
            .unwrap();
        store
            .items
            .write()
            .unwrap()
            .insert(*corrupted.id(), corrupted);

        let err = store.verify_integrity().unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn restore_revalidates_and_rejects_duplicates() {
        let source = InventoryStore::new();
        let a = source.add(rice()).unwrap();
        let a = source.update(*a.id(), a.to_draft().quantity(3.0)).unwrap();
        let b = source.add(Item::draft("Oil", 0.5).unit("l")).unwrap();

        let restored = InventoryStore::restore(vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(restored.len().unwrap(), 2);
        assert_eq!(restored.get(*a.id()).unwrap().revision(), 2);
        assert!(restored.get(*b.id()).unwrap().same_contents(&b));

        let err = InventoryStore::restore(vec![a.clone(), a]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn restore_rejects_invalid_persisted_items() {
        let raw = serde_json::json!([{
            "id": "0190a0a0-0000-7000-8000-000000000001",
            "name": "",
            "quantity": -2.0,
            "unit": "count",
        }]);
        let items: Vec<Item> = serde_json::from_value(raw).unwrap();

        let err = InventoryStore::restore(items).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn unit_symbol() -> impl Strategy<Value = &'static str> {
            prop::sample::select(vec!["count", "grams", "kg", "ml", "liters", "oz", "lb"])
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: negative quantities never enter the store, via add or update.
            #[test]
            fn negative_quantity_is_always_rejected(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                quantity in -1_000_000.0f64..-0.0001f64,
                unit in unit_symbol(),
            ) {
                let store = InventoryStore::new();
                let candidate = Item::draft(name.clone(), quantity).unit(unit);
                prop_assert!(validate(&candidate).contains(field::QUANTITY, "non_negative"));
                prop_assert!(store.add(candidate).is_err());

                let existing = store.add(Item::draft(name, 1.0).unit(unit)).unwrap();
                let err = store
                    .update(*existing.id(), existing.to_draft().quantity(quantity))
                    .unwrap_err();
                prop_assert!(matches!(err, DomainError::Validation(_)));
                let unchanged = store.get(*existing.id()).unwrap();
                prop_assert_eq!(unchanged.quantity(), 1.0);
            }

            /// Property: whatever was added comes back unchanged.
            #[test]
            fn add_then_get_preserves_fields(
                name in "[A-Za-z][A-Za-z0-9 ]{0,99}",
                count in 0u32..10_000,
                unit in unit_symbol(),
                days in prop::option::of(0i64..3650),
            ) {
                let store = InventoryStore::new();
                let mut candidate = Item::draft(name.clone(), f64::from(count)).unit(unit);
                if let Some(days) = days {
                    let date = base_date() + chrono::Duration::days(days);
                    candidate = candidate.expires_on(date);
                }
                let id = candidate.id();

                let added = store.add(candidate).unwrap();
                let fetched = store.get(id).unwrap();

                prop_assert!(fetched.same_contents(&added));
                prop_assert_eq!(fetched.name(), name.as_str());
                prop_assert_eq!(fetched.quantity(), f64::from(count));
            }

            /// Property: a duplicate id never overwrites the existing entry.
            #[test]
            fn duplicate_add_never_overwrites(
                first in "[A-Za-z]{1,20}",
                second in "[A-Za-z]{1,20}",
            ) {
                let store = InventoryStore::new();
                let original = Item::draft(first.clone(), 1.0).unit("count");
                let id = original.id();
                store.add(original).unwrap();

                let err = store
                    .add(ItemDraft::with_id(id, second, 2.0).unit("count"))
                    .unwrap_err();
                prop_assert!(matches!(err, DomainError::Conflict(_)));
                let kept = store.get(id).unwrap();
                prop_assert_eq!(kept.name(), first.as_str());
            }
        }

        fn base_date() -> chrono::NaiveDate {
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        }
    }
}
