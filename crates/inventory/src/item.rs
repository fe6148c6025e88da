use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use spantry_core::{DomainError, DomainResult, Entity, ItemId, ValueObject};

use crate::symbol::symbol_enum;

symbol_enum! {
    /// Measurement unit; decides whether a quantity is a count or a measure.
    pub enum Unit ("unit") {
        Count => ["count", "pcs", "each"],
        Grams => ["grams", "g"],
        Kilograms => ["kilograms", "kg"],
        Milliliters => ["milliliters", "ml"],
        Liters => ["liters", "l"],
        Ounces => ["ounces", "oz"],
        Pounds => ["pounds", "lb", "lbs"],
    }
}

impl Unit {
    /// Counted units only admit whole quantities.
    pub fn is_discrete(self) -> bool {
        matches!(self, Unit::Count)
    }
}

symbol_enum! {
    /// Grouping used for filtering.
    pub enum Category ("category") {
        Produce => ["produce"],
        Dairy => ["dairy"],
        Meat => ["meat"],
        Seafood => ["seafood"],
        Bakery => ["bakery"],
        Grains => ["grains"],
        Canned => ["canned"],
        Frozen => ["frozen"],
        Beverages => ["beverages"],
        Snacks => ["snacks"],
        Spices => ["spices"],
        Condiments => ["condiments"],
        Other => ["other"],
    }
}

symbol_enum! {
    /// Where an item is stored.
    pub enum Location ("location") {
        Pantry => ["pantry"],
        Fridge => ["fridge"],
        Freezer => ["freezer"],
        Cupboard => ["cupboard"],
        /// Items not requiring specific storage conditions.
        Counter => ["counter"],
        Other => ["other"],
    }
}

impl ValueObject for Unit {}
impl ValueObject for Category {}
impl ValueObject for Location {}

/// Calendar date format accepted for expiration dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A committed pantry entry.
///
/// Only the inventory store hands these out, always as copies. Equality is by
/// `id`: two values with the same id are the same item at different
/// revisions. Use [`Item::same_contents`] to compare fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: f64,
    unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiration_date: Option<NaiveDate>,
    #[serde(default)]
    revision: u64,
}

impl Item {
    /// Start a candidate for a brand-new item with a freshly assigned id.
    pub fn draft(name: impl Into<String>, quantity: f64) -> ItemDraft {
        ItemDraft::with_id(ItemId::new(), name, quantity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn expiration_date(&self) -> Option<NaiveDate> {
        self.expiration_date
    }

    /// Copy-with-changes: a candidate carrying this item's id and fields.
    ///
    /// Edits on the returned draft never touch this value or any store.
    pub fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            id: self.id,
            name: self.name.clone(),
            quantity: self.quantity,
            unit: Some(self.unit.as_str().to_string()),
            category: self.category.map(|c| c.as_str().to_string()),
            location: self.location.map(|l| l.as_str().to_string()),
            expiration_date: self
                .expiration_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
        }
    }

    /// Field-by-field comparison, ignoring revision.
    pub fn same_contents(&self, other: &Item) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.quantity == other.quantity
            && self.unit == other.unit
            && self.category == other.category
            && self.location == other.location
            && self.expiration_date == other.expiration_date
    }

    pub(crate) fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl core::hash::Hash for Item {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A candidate item: field values as parsed by a caller, not yet validated.
///
/// Symbols and dates stay textual here so the validation engine can report a
/// bad unit, category, location or date alongside every other problem instead
/// of failing at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    id: ItemId,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub expiration_date: Option<String>,
}

impl ItemDraft {
    /// Candidate with a caller-chosen id (tests, restores).
    pub fn with_id(id: ItemId, name: impl Into<String>, quantity: f64) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            unit: None,
            category: None,
            location: None,
            expiration_date: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn unit(mut self, unit: impl AsRef<str>) -> Self {
        self.unit = Some(unit.as_ref().to_string());
        self
    }

    pub fn category(mut self, category: impl AsRef<str>) -> Self {
        self.category = Some(category.as_ref().to_string());
        self
    }

    pub fn no_category(mut self) -> Self {
        self.category = None;
        self
    }

    pub fn location(mut self, location: impl AsRef<str>) -> Self {
        self.location = Some(location.as_ref().to_string());
        self
    }

    pub fn no_location(mut self) -> Self {
        self.location = None;
        self
    }

    /// Expiration date as `YYYY-MM-DD` text.
    pub fn expires(mut self, date: impl AsRef<str>) -> Self {
        self.expiration_date = Some(date.as_ref().to_string());
        self
    }

    pub fn expires_on(self, date: NaiveDate) -> Self {
        self.expires(date.format(DATE_FORMAT).to_string())
    }

    pub fn never_expires(mut self) -> Self {
        self.expiration_date = None;
        self
    }

    /// Convert a candidate that already passed validation.
    ///
    /// A parse failure here means the rule set and the parsers disagree, which
    /// is a defect rather than bad input.
    pub(crate) fn into_item(self) -> DomainResult<Item> {
        let unit = self
            .unit
            .as_deref()
            .ok_or_else(|| DomainError::invariant("validated candidate has no unit"))?
            .parse::<Unit>()
            .map_err(|e| DomainError::invariant(e.to_string()))?;
        let category = self
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| DomainError::invariant(e.to_string()))?;
        let location = self
            .location
            .as_deref()
            .map(str::parse::<Location>)
            .transpose()
            .map_err(|e| DomainError::invariant(e.to_string()))?;
        let expiration_date = self
            .expiration_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .map_err(|e| DomainError::invariant(e.to_string()))?;

        Ok(Item {
            id: self.id,
            name: self.name,
            // Folds -0.0 into 0.0.
            quantity: self.quantity + 0.0,
            unit,
            category,
            location,
            expiration_date,
            revision: 0,
        })
    }
}

/// Text that is not a calendar date in canonical `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a YYYY-MM-DD date")]
pub struct InvalidDate(pub String);

/// Parse a calendar date written exactly as `YYYY-MM-DD`.
///
/// chrono alone accepts signs, unpadded fields and wider years; only the
/// canonical spelling is admitted.
pub fn parse_date(s: &str) -> Result<NaiveDate, InvalidDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .filter(|d| d.format(DATE_FORMAT).to_string() == s)
        .ok_or_else(|| InvalidDate(s.to_string()))
}
