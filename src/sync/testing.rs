//! Fault-injecting store wrapper for the sync tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{FolioError, FolioResult};
use crate::store::{BatchOp, Collection, Document, DocumentStore, Fields, InMemoryDocumentStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    GetAll(Collection),
    Add,
    Set,
    Update,
    Delete,
    CommitBatch,
}

/// Delegates to an in-memory store, failing the ops it is told to and
/// counting every call that reaches it.
pub struct FlakyStore {
    inner: Arc<InMemoryDocumentStore>,
    failing: Mutex<HashSet<Op>>,
    calls: Mutex<HashMap<Op, usize>>,
    network_calls: Mutex<Vec<bool>>,
    failing_enables: Mutex<usize>,
}

impl FlakyStore {
    pub fn new(inner: Arc<InMemoryDocumentStore>) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(HashMap::new()),
            network_calls: Mutex::new(Vec::new()),
            failing_enables: Mutex::new(0),
        }
    }

    pub fn inner(&self) -> &InMemoryDocumentStore {
        &self.inner
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Fail the next `count` calls to `enable_network`.
    pub fn fail_enables(&self, count: usize) {
        *self.failing_enables.lock().unwrap() = count;
    }

    pub fn go_offline(&self) {
        self.inner.set_online(false);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.calls.lock().unwrap().get(&op).copied().unwrap_or(0)
    }

    /// Total calls that reached the store, excluding network toggles.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// `enable_network` (true) and `disable_network` (false) calls in order.
    pub fn network_calls(&self) -> Vec<bool> {
        self.network_calls.lock().unwrap().clone()
    }

    fn enter(&self, op: Op) -> FolioResult<()> {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
        if self.failing.lock().unwrap().contains(&op) {
            return Err(FolioError::Unavailable(format!("injected failure: {:?}", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get_all(&self, collection: Collection) -> FolioResult<Vec<Document>> {
        self.enter(Op::GetAll(collection))?;
        self.inner.get_all(collection).await
    }

    async fn get(&self, collection: Collection, id: &str) -> FolioResult<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn add(&self, collection: Collection, fields: Fields) -> FolioResult<String> {
        self.enter(Op::Add)?;
        self.inner.add(collection, fields).await
    }

    async fn set(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()> {
        self.enter(Op::Set)?;
        self.inner.set(collection, id, fields).await
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()> {
        self.enter(Op::Update)?;
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> FolioResult<()> {
        self.enter(Op::Delete)?;
        self.inner.delete(collection, id).await
    }

    async fn commit_batch(&self, ops: Vec<BatchOp>) -> FolioResult<()> {
        self.enter(Op::CommitBatch)?;
        self.inner.commit_batch(ops).await
    }

    async fn enable_network(&self) -> FolioResult<()> {
        self.network_calls.lock().unwrap().push(true);
        {
            let mut remaining = self.failing_enables.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(FolioError::Unavailable("injected failure: enable_network".to_string()));
            }
        }
        self.inner.enable_network().await
    }

    async fn disable_network(&self) -> FolioResult<()> {
        self.network_calls.lock().unwrap().push(false);
        self.inner.disable_network().await
    }
}
