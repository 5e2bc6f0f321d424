//! Aggregate root trait for domain models that own their consistency boundary.

/// Aggregate root marker + minimal interface.
///
/// Kept small so each domain decides how it models state transitions without
/// bringing in any infrastructure concerns.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per successfully applied mutation.
    fn version(&self) -> u64;
}
