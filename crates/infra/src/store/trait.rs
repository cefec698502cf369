use std::sync::Arc;

use thiserror::Error;

use bankers_core::Entity;

/// Document store operation error.
///
/// These are **infrastructure errors** (availability, key clashes, encoding),
/// as opposed to business outcomes, which services report on their own.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("duplicate document id: {0}")]
    Duplicate(String),

    #[error("document serialization failed: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Predicate over stored documents.
pub trait Filter<D>: Send + Sync {
    fn matches(&self, doc: &D) -> bool;
}

/// Mutation applied to a single matched document.
pub trait Update<D>: Send + Sync {
    fn apply(&self, doc: &mut D);
}

impl<D, F> Filter<D> for F
where
    F: Fn(&D) -> bool + Send + Sync,
{
    fn matches(&self, doc: &D) -> bool {
        self(doc)
    }
}

/// Collection of documents keyed by their entity id.
///
/// ## Atomicity
///
/// `update_one` is the only cross-caller synchronization primitive the
/// services rely on. Implementations must evaluate the filter and apply the
/// update as one indivisible step relative to every other caller: two
/// concurrent `update_one` calls whose filters both match the same document
/// before either runs must not both succeed if the first update makes the
/// second filter false.
///
/// ## Ordering
///
/// `find_many` returns documents in insertion order.
#[async_trait::async_trait]
pub trait DocumentStore<D>: Send + Sync
where
    D: Entity + Send + Sync + 'static,
{
    async fn find_one(&self, filter: &dyn Filter<D>) -> StoreResult<Option<D>>;

    async fn find_many(&self, filter: &dyn Filter<D>) -> StoreResult<Vec<D>>;

    /// Fails with `Duplicate` if a document with the same id exists.
    async fn insert_one(&self, doc: D) -> StoreResult<()>;

    /// Returns whether a document was removed.
    async fn delete_one(&self, filter: &dyn Filter<D>) -> StoreResult<bool>;

    /// Atomically apply `update` to the first document matching `filter`.
    ///
    /// Returns the document as it is after the update, or `None` if nothing
    /// matched.
    async fn update_one(
        &self,
        filter: &dyn Filter<D>,
        update: &dyn Update<D>,
    ) -> StoreResult<Option<D>>;
}

#[async_trait::async_trait]
impl<D, S> DocumentStore<D> for Arc<S>
where
    D: Entity + Send + Sync + 'static,
    S: DocumentStore<D> + ?Sized,
{
    async fn find_one(&self, filter: &dyn Filter<D>) -> StoreResult<Option<D>> {
        (**self).find_one(filter).await
    }

    async fn find_many(&self, filter: &dyn Filter<D>) -> StoreResult<Vec<D>> {
        (**self).find_many(filter).await
    }

    async fn insert_one(&self, doc: D) -> StoreResult<()> {
        (**self).insert_one(doc).await
    }

    async fn delete_one(&self, filter: &dyn Filter<D>) -> StoreResult<bool> {
        (**self).delete_one(filter).await
    }

    async fn update_one(
        &self,
        filter: &dyn Filter<D>,
        update: &dyn Update<D>,
    ) -> StoreResult<Option<D>> {
        (**self).update_one(filter, update).await
    }
}

/// Matches the document whose id equals the wrapped id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ById<I>(pub I);

impl<D> Filter<D> for ById<D::Id>
where
    D: Entity,
    D::Id: Send + Sync,
{
    fn matches(&self, doc: &D) -> bool {
        doc.id() == &self.0
    }
}

/// Matches every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct All;

impl<D> Filter<D> for All {
    fn matches(&self, _doc: &D) -> bool {
        true
    }
}
