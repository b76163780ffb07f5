//! In-memory implementation of the document store.
//!
//! Keeps insertion order per collection so listings are stable. Used by the
//! server when `database.url` is `memory`, and by the sync tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{merge_fields, prepare_fields, BatchOp, Collection, Document, DocumentStore, Fields};
use crate::error::{FolioError, FolioResult};

type Collections = HashMap<Collection, Vec<Document>>;

pub struct InMemoryDocumentStore {
    inner: RwLock<Collections>,
    online: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            online: AtomicBool::new(true),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> FolioResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(FolioError::Unavailable(
                "network is disabled for this store".to_string(),
            ))
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(collection: Collection, id: &str) -> FolioError {
    FolioError::NotFound(format!("Document {}/{} not found", collection, id))
}

fn upsert(docs: &mut Vec<Document>, id: &str, fields: Fields) {
    match docs.iter_mut().find(|d| d.id == id) {
        Some(doc) => doc.fields = fields,
        None => docs.push(Document::new(id, fields)),
    }
}

/// Apply one op to a working copy. Validation happens here so a failing op
/// leaves the caller's original state untouched.
fn apply(state: &mut Collections, op: BatchOp) -> FolioResult<()> {
    let now = Utc::now();
    match op {
        BatchOp::Set {
            collection,
            id,
            fields,
        } => {
            let fields = prepare_fields(collection, &id, fields, now)?;
            upsert(state.entry(collection).or_default(), &id, fields);
        }
        BatchOp::Update {
            collection,
            id,
            fields,
        } => {
            let docs = state.entry(collection).or_default();
            let doc = docs
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| not_found(collection, &id))?;
            let mut merged = doc.fields.clone();
            merge_fields(&mut merged, fields);
            doc.fields = prepare_fields(collection, &id, merged, now)?;
        }
        BatchOp::Delete { collection, id } => {
            if let Some(docs) = state.get_mut(&collection) {
                docs.retain(|d| d.id != id);
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_all(&self, collection: Collection) -> FolioResult<Vec<Document>> {
        self.ensure_online()?;
        let guard = self.inner.read().await;
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &str) -> FolioResult<Option<Document>> {
        self.ensure_online()?;
        let guard = self.inner.read().await;
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn add(&self, collection: Collection, fields: Fields) -> FolioResult<String> {
        self.ensure_online()?;
        let id = self.new_document_id();
        let fields = prepare_fields(collection, &id, fields, Utc::now())?;
        let mut guard = self.inner.write().await;
        guard
            .entry(collection)
            .or_default()
            .push(Document::new(id.clone(), fields));
        Ok(id)
    }

    async fn set(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()> {
        self.ensure_online()?;
        let mut guard = self.inner.write().await;
        apply(
            &mut guard,
            BatchOp::Set {
                collection,
                id: id.to_string(),
                fields,
            },
        )
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()> {
        self.ensure_online()?;
        let mut guard = self.inner.write().await;
        apply(
            &mut guard,
            BatchOp::Update {
                collection,
                id: id.to_string(),
                fields,
            },
        )
    }

    async fn delete(&self, collection: Collection, id: &str) -> FolioResult<()> {
        self.ensure_online()?;
        let mut guard = self.inner.write().await;
        apply(
            &mut guard,
            BatchOp::Delete {
                collection,
                id: id.to_string(),
            },
        )
    }

    async fn commit_batch(&self, ops: Vec<BatchOp>) -> FolioResult<()> {
        self.ensure_online()?;
        let mut guard = self.inner.write().await;
        let mut working = guard.clone();
        for op in ops {
            apply(&mut working, op)?;
        }
        *guard = working;
        Ok(())
    }

    async fn enable_network(&self) -> FolioResult<()> {
        self.online.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disable_network(&self) -> FolioResult<()> {
        self.online.store(false, Ordering::SeqCst);
        Ok(())
    }
}
