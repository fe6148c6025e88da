//! Pantry inventory domain.
//!
//! Validated item model, an in-memory store that funnels every mutation
//! through validation, and expiration-aware queries. Pure domain logic: no
//! IO, no logging, no clock.

mod symbol;

pub mod expiration;
pub mod item;
pub mod store;
pub mod validation;

pub use expiration::{ExpirationView, ExpirationWindow, find_expired, find_expiring_within};
pub use item::{Category, DATE_FORMAT, InvalidDate, Item, ItemDraft, Location, Unit, parse_date};
pub use store::InventoryStore;
pub use symbol::UnknownSymbol;
pub use validation::{NAME_MAX_CHARS, RULES, Rule, validate};
