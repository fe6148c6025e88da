//! Validation engine: an ordered list of independent rules over a candidate.
//!
//! Every rule runs on every candidate; nothing short-circuits, so a caller gets
//! the full list of problems in one pass.

use spantry_core::{Violation, Violations};

use crate::item::{Category, ItemDraft, Location, Unit, parse_date};

/// Longest accepted item name, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Field keys reported in [`Violation::field`].
pub mod field {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const QUANTITY: &str = "quantity";
    pub const UNIT: &str = "unit";
    pub const CATEGORY: &str = "category";
    pub const LOCATION: &str = "location";
    pub const EXPIRATION_DATE: &str = "expiration_date";
}

/// One declarative constraint on one field.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub rule: &'static str,
    check: fn(&ItemDraft) -> Option<String>,
}

impl Rule {
    /// Run this rule alone; `None` when the candidate satisfies it.
    pub fn apply(&self, candidate: &ItemDraft) -> Option<Violation> {
        (self.check)(candidate).map(|message| Violation::new(self.field, self.rule, message))
    }
}

/// The fixed rule set, in reporting order.
pub const RULES: &[Rule] = &[
    Rule {
        field: field::NAME,
        rule: "required",
        check: name_present,
    },
    Rule {
        field: field::NAME,
        rule: "max_length",
        check: name_length,
    },
    Rule {
        field: field::QUANTITY,
        rule: "finite",
        check: quantity_finite,
    },
    Rule {
        field: field::QUANTITY,
        rule: "non_negative",
        check: quantity_non_negative,
    },
    Rule {
        field: field::UNIT,
        rule: "required",
        check: unit_present,
    },
    Rule {
        field: field::UNIT,
        rule: "one_of",
        check: unit_known,
    },
    Rule {
        field: field::QUANTITY,
        rule: "whole_number",
        check: quantity_whole_for_count,
    },
    Rule {
        field: field::CATEGORY,
        rule: "one_of",
        check: category_known,
    },
    Rule {
        field: field::LOCATION,
        rule: "one_of",
        check: location_known,
    },
    Rule {
        field: field::EXPIRATION_DATE,
        rule: "iso_date",
        check: expiration_date_valid,
    },
];

/// Check `candidate` against every rule.
///
/// Pure: the result depends only on the candidate. An empty list means valid.
/// A past expiration date is still valid; freshness is a query concern.
pub fn validate(candidate: &ItemDraft) -> Violations {
    RULES.iter().filter_map(|rule| rule.apply(candidate)).collect()
}

fn name_present(c: &ItemDraft) -> Option<String> {
    c.name
        .trim()
        .is_empty()
        .then(|| "item name cannot be blank".to_string())
}

fn name_length(c: &ItemDraft) -> Option<String> {
    let len = c.name.chars().count();
    (len > NAME_MAX_CHARS).then(|| {
        format!("item name must be at most {NAME_MAX_CHARS} characters (got {len})")
    })
}

fn quantity_finite(c: &ItemDraft) -> Option<String> {
    (!c.quantity.is_finite()).then(|| "quantity must be a finite number".to_string())
}

fn quantity_non_negative(c: &ItemDraft) -> Option<String> {
    (c.quantity < 0.0).then(|| format!("quantity cannot be negative (got {})", c.quantity))
}

fn unit_present(c: &ItemDraft) -> Option<String> {
    match c.unit.as_deref() {
        Some(u) if !u.trim().is_empty() => None,
        _ => Some("unit is required".to_string()),
    }
}

fn unit_known(c: &ItemDraft) -> Option<String> {
    let unit = c.unit.as_deref().filter(|u| !u.trim().is_empty())?;
    unit.parse::<Unit>().err().map(|e| e.to_string())
}

fn quantity_whole_for_count(c: &ItemDraft) -> Option<String> {
    let unit = c.unit.as_deref()?.parse::<Unit>().ok()?;
    if unit.is_discrete() && c.quantity.is_finite() && c.quantity.fract() != 0.0 {
        return Some(format!(
            "quantity must be a whole number when unit is {unit} (got {})",
            c.quantity
        ));
    }
    None
}

fn category_known(c: &ItemDraft) -> Option<String> {
    let category = c.category.as_deref()?;
    category.parse::<Category>().err().map(|e| e.to_string())
}

fn location_known(c: &ItemDraft) -> Option<String> {
    let location = c.location.as_deref()?;
    location.parse::<Location>().err().map(|e| e.to_string())
}

fn expiration_date_valid(c: &ItemDraft) -> Option<String> {
    let date = c.expiration_date.as_deref()?;
    parse_date(date)
        .err()
        .map(|_| format!("invalid expiration date '{date}' (expected YYYY-MM-DD)"))
}
