//! Document store layer for Folio Core.
//!
//! The `DocumentStore` trait is the surface of a managed document database:
//! two collections, store-assigned ids, overwrite and merge writes, atomic
//! batches and a network switch. Three backends implement it:
//! - `SqliteDocumentStore`: the store the server owns
//! - `InMemoryDocumentStore`: development and tests
//! - `RemoteDocumentStore`: the admin client talking to the server over HTTP

mod document;
mod memory;
mod remote;
mod sqlite;

pub use document::*;
pub use memory::InMemoryDocumentStore;
pub use remote::RemoteDocumentStore;
pub use sqlite::SqliteDocumentStore;

#[cfg(test)]
pub(crate) use sqlite::test_store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::FolioResult;

/// Operations of a document database client.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch every document in a collection.
    async fn get_all(&self, collection: Collection) -> FolioResult<Vec<Document>>;

    /// Fetch one document, `None` when it does not exist.
    async fn get(&self, collection: Collection, id: &str) -> FolioResult<Option<Document>>;

    /// Insert a document under a store-assigned id.
    async fn add(&self, collection: Collection, fields: Fields) -> FolioResult<String>;

    /// Create or fully replace a document.
    async fn set(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()>;

    /// Merge fields into an existing document. Fails with not-found if missing.
    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()>;

    async fn delete(&self, collection: Collection, id: &str) -> FolioResult<()>;

    /// Apply every op or none of them.
    async fn commit_batch(&self, ops: Vec<BatchOp>) -> FolioResult<()>;

    /// Resume talking to the backend.
    async fn enable_network(&self) -> FolioResult<()>;

    /// Stop talking to the backend; operations fail as unavailable until re-enabled.
    async fn disable_network(&self) -> FolioResult<()>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> FolioResult<()> {
        Ok(())
    }

    /// Client-side id for a document that does not exist yet.
    fn new_document_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
