use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use bankers_core::Entity;

use super::r#trait::{DocumentStore, Filter, StoreError, StoreResult, Update};

struct Slot {
    /// Insertion position, for stable `find_many` ordering.
    seq: u64,
    body: JsonValue,
}

struct Collection<K> {
    next_seq: u64,
    docs: HashMap<K, Slot>,
}

impl<K> Collection<K> {
    fn ordered(&self) -> Vec<(&K, &Slot)> {
        let mut slots: Vec<_> = self.docs.iter().collect();
        slots.sort_by_key(|(_, slot)| slot.seq);
        slots
    }
}

/// In-memory document store.
///
/// Documents are kept as JSON values, so every read hands out an independent
/// copy and encoding problems surface the same way they would against a real
/// document database. All operations take the collection lock once, which
/// makes `update_one` a true compare-and-swap.
///
/// Intended for tests/dev. Not optimized for performance.
pub struct InMemoryDocumentStore<D: Entity> {
    inner: RwLock<Collection<D::Id>>,
    _doc: PhantomData<fn() -> D>,
}

impl<D: Entity> InMemoryDocumentStore<D> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collection {
                next_seq: 0,
                docs: HashMap::new(),
            }),
            _doc: PhantomData,
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collection<D::Id>>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collection<D::Id>>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl<D: Entity> Default for InMemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Entity> std::fmt::Debug for InMemoryDocumentStore<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.inner.read().map(|c| c.docs.len()).ok();
        f.debug_struct("InMemoryDocumentStore")
            .field("documents", &len)
            .finish()
    }
}

fn encode<D: Serialize>(doc: &D) -> StoreResult<JsonValue> {
    serde_json::to_value(doc).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<D: DeserializeOwned>(body: &JsonValue) -> StoreResult<D> {
    D::deserialize(body).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[async_trait::async_trait]
impl<D> DocumentStore<D> for InMemoryDocumentStore<D>
where
    D: Entity + Serialize + DeserializeOwned + Send + Sync + 'static,
    D::Id: Send + Sync,
{
    async fn find_one(&self, filter: &dyn Filter<D>) -> StoreResult<Option<D>> {
        let collection = self.read()?;
        for (_, slot) in collection.ordered() {
            let doc: D = decode(&slot.body)?;
            if filter.matches(&doc) {
                return Ok(Some(doc));
            }
        }
        Ok(None)
    }

    async fn find_many(&self, filter: &dyn Filter<D>) -> StoreResult<Vec<D>> {
        let collection = self.read()?;
        let mut found = Vec::new();
        for (_, slot) in collection.ordered() {
            let doc: D = decode(&slot.body)?;
            if filter.matches(&doc) {
                found.push(doc);
            }
        }
        Ok(found)
    }

    async fn insert_one(&self, doc: D) -> StoreResult<()> {
        let body = encode(&doc)?;
        let mut collection = self.write()?;
        let id = doc.id().clone();
        if collection.docs.contains_key(&id) {
            return Err(StoreError::Duplicate(format!("{id:?}")));
        }
        let seq = collection.next_seq;
        collection.next_seq += 1;
        collection.docs.insert(id, Slot { seq, body });
        Ok(())
    }

    async fn delete_one(&self, filter: &dyn Filter<D>) -> StoreResult<bool> {
        let mut collection = self.write()?;
        let mut target = None;
        for (id, slot) in collection.ordered() {
            let doc: D = decode(&slot.body)?;
            if filter.matches(&doc) {
                target = Some(id.clone());
                break;
            }
        }
        Ok(match target {
            Some(id) => collection.docs.remove(&id).is_some(),
            None => false,
        })
    }

    async fn update_one(
        &self,
        filter: &dyn Filter<D>,
        update: &dyn Update<D>,
    ) -> StoreResult<Option<D>> {
        let mut collection = self.write()?;
        let mut target = None;
        for (id, slot) in collection.ordered() {
            let doc: D = decode(&slot.body)?;
            if filter.matches(&doc) {
                target = Some((id.clone(), doc));
                break;
            }
        }

        let Some((id, mut doc)) = target else {
            return Ok(None);
        };
        update.apply(&mut doc);
        let body = encode(&doc)?;
        if let Some(slot) = collection.docs.get_mut(&id) {
            slot.body = body;
        }
        Ok(Some(doc))
    }
}
