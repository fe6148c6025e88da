//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Two values with the same `id` are the same entity, possibly at different
/// revisions.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing revision of the entity's state.
    ///
    /// Zero means the value has never been committed anywhere.
    fn revision(&self) -> u64;

    /// Same entity, regardless of revision or field values.
    fn same_entity(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.id() == other.id()
    }
}
