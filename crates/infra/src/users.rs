//! User directory: the identity check behind lock acquisition.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use bankers_core::{Entity, UserId};

use crate::store::{ById, DocumentStore, InMemoryDocumentStore, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.user_id
    }
}

/// Resolves user ids to known users.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn exists(&self, user_id: UserId) -> StoreResult<bool>;
}

#[async_trait::async_trait]
impl<U> UserDirectory for Arc<U>
where
    U: UserDirectory + ?Sized,
{
    async fn exists(&self, user_id: UserId) -> StoreResult<bool> {
        (**self).exists(user_id).await
    }
}

/// User directory backed by a document collection.
#[derive(Debug)]
pub struct StoredUserDirectory<S> {
    users: S,
}

impl<S> StoredUserDirectory<S>
where
    S: DocumentStore<User>,
{
    pub fn new(users: S) -> Self {
        Self { users }
    }

    pub async fn register(&self, user: User) -> StoreResult<()> {
        self.users.insert_one(user).await
    }

    pub async fn get(&self, user_id: UserId) -> StoreResult<Option<User>> {
        self.users.find_one(&ById(user_id)).await
    }
}

impl StoredUserDirectory<InMemoryDocumentStore<User>> {
    pub fn in_memory() -> Self {
        Self::new(InMemoryDocumentStore::new())
    }
}

#[async_trait::async_trait]
impl<S> UserDirectory for StoredUserDirectory<S>
where
    S: DocumentStore<User>,
{
    async fn exists(&self, user_id: UserId) -> StoreResult<bool> {
        Ok(self.get(user_id).await?.is_some())
    }
}
