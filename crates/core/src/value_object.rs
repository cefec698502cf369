/// Marker for values compared by content rather than identity.
///
/// Amounts and balances are value objects: the ledger never aliases one, it
/// copies it and builds the new value from the copy. `Account` is not; see
/// [`crate::Entity`].
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
