/// A stored document with a stable identity.
///
/// Accounts, transactions and users are entities: the document store keys
/// them by `id()`, and two records with the same id are the same record
/// regardless of their other fields.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
