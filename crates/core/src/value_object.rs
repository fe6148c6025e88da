//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new one.
///
/// - **Value Object**: `Violation { field: "name", .. }`, `Unit::Grams`
/// - **Entity**: `Item { id: ItemId(..), .. }`
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
