//! Ordered write strategies with a single aggregated outcome.
//!
//! A create tries a grouped batch write, then a plain add. An update tries a
//! field merge, then a full overwrite. The chain stops at the first strategy
//! that succeeds and reports every failure before it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FolioError, FolioResult};
use crate::store::{server_timestamp, BatchOp, Collection, DocumentStore, Fields};

/// One way of getting a write into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStrategy {
    /// Single-op atomic batch with a client-generated id.
    BatchWrite,
    /// Insert with a store-assigned id.
    AddDocument,
    /// Merge fields into the existing document.
    MergeUpdate,
    /// Replace the whole document.
    Overwrite,
}

impl std::fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteStrategy::BatchWrite => write!(f, "batch_write"),
            WriteStrategy::AddDocument => write!(f, "add_document"),
            WriteStrategy::MergeUpdate => write!(f, "merge_update"),
            WriteStrategy::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// What the overwrite fallback does when the stored copy changed since load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Overwrite regardless.
    #[default]
    LastWriteWins,
    /// Refuse the overwrite with a conflict error.
    RejectStale,
}

/// A write to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum WritePlan {
    Create {
        collection: Collection,
        fields: Fields,
    },
    Update {
        collection: Collection,
        id: String,
        fields: Fields,
        /// Creation time of the local copy, kept by overwrites.
        created_at: Option<DateTime<Utc>>,
        /// `updatedAt` the local copy was loaded with.
        loaded_updated_at: Option<DateTime<Utc>>,
    },
}

impl WritePlan {
    /// Plan a create; both timestamps are assigned by the store.
    pub fn create(collection: Collection, mut fields: Fields) -> Self {
        fields.insert("createdAt".to_string(), server_timestamp());
        fields.insert("updatedAt".to_string(), server_timestamp());
        WritePlan::Create { collection, fields }
    }

    pub fn update(
        collection: Collection,
        id: impl Into<String>,
        mut fields: Fields,
        created_at: Option<DateTime<Utc>>,
        loaded_updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        fields.insert("updatedAt".to_string(), server_timestamp());
        WritePlan::Update {
            collection,
            id: id.into(),
            fields,
            created_at,
            loaded_updated_at,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            WritePlan::Create { collection, .. } | WritePlan::Update { collection, .. } => {
                *collection
            }
        }
    }

    pub fn default_strategies(&self) -> Vec<WriteStrategy> {
        match self {
            WritePlan::Create { .. } => vec![WriteStrategy::BatchWrite, WriteStrategy::AddDocument],
            WritePlan::Update { .. } => vec![WriteStrategy::MergeUpdate, WriteStrategy::Overwrite],
        }
    }
}

/// A strategy that was tried and failed.
#[derive(Debug)]
pub struct Attempt {
    pub strategy: WriteStrategy,
    pub error: FolioError,
}

/// Aggregated result of running a chain.
#[derive(Debug)]
pub enum WriteOutcome {
    Succeeded {
        strategy: WriteStrategy,
        id: String,
        /// Strategies that failed before the successful one.
        failed: Vec<Attempt>,
    },
    Failed {
        attempts: Vec<Attempt>,
    },
}

impl WriteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Succeeded { .. })
    }

    /// Strategy that succeeded, if any.
    pub fn strategy(&self) -> Option<WriteStrategy> {
        match self {
            WriteOutcome::Succeeded { strategy, .. } => Some(*strategy),
            WriteOutcome::Failed { .. } => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            WriteOutcome::Succeeded { id, .. } => Some(id),
            WriteOutcome::Failed { .. } => None,
        }
    }

    /// Every strategy tried, in order.
    pub fn attempted(&self) -> Vec<WriteStrategy> {
        match self {
            WriteOutcome::Succeeded {
                strategy, failed, ..
            } => failed
                .iter()
                .map(|a| a.strategy)
                .chain(std::iter::once(*strategy))
                .collect(),
            WriteOutcome::Failed { attempts } => attempts.iter().map(|a| a.strategy).collect(),
        }
    }

    pub fn failures(&self) -> &[Attempt] {
        match self {
            WriteOutcome::Succeeded { failed, .. } => failed,
            WriteOutcome::Failed { attempts } => attempts,
        }
    }

    pub fn last_error(&self) -> Option<&FolioError> {
        self.failures().last().map(|a| &a.error)
    }

    /// True when the chain failed and every attempt failed for a transient reason.
    pub fn is_transient(&self) -> bool {
        match self {
            WriteOutcome::Succeeded { .. } => false,
            WriteOutcome::Failed { attempts } => {
                !attempts.is_empty() && attempts.iter().all(|a| a.error.is_transient())
            }
        }
    }
}

/// Runs strategies in order until one succeeds.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    strategies: Vec<WriteStrategy>,
    conflict_policy: ConflictPolicy,
}

impl FallbackChain {
    pub fn new(strategies: Vec<WriteStrategy>) -> Self {
        Self {
            strategies,
            conflict_policy: ConflictPolicy::default(),
        }
    }

    /// The default chain for a plan.
    pub fn for_plan(plan: &WritePlan) -> Self {
        Self::new(plan.default_strategies())
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    pub fn strategies(&self) -> &[WriteStrategy] {
        &self.strategies
    }

    pub async fn execute<S>(&self, store: &S, plan: &WritePlan) -> WriteOutcome
    where
        S: DocumentStore + ?Sized,
    {
        let mut attempts = Vec::new();

        for &strategy in &self.strategies {
            match apply(store, strategy, plan, self.conflict_policy).await {
                Ok(id) => {
                    tracing::debug!(
                        collection = %plan.collection(),
                        id = %id,
                        strategy = %strategy,
                        fallbacks = attempts.len(),
                        "Write succeeded"
                    );
                    return WriteOutcome::Succeeded {
                        strategy,
                        id,
                        failed: attempts,
                    };
                }
                Err(error) => {
                    tracing::warn!(
                        collection = %plan.collection(),
                        strategy = %strategy,
                        error = %error,
                        "Write strategy failed"
                    );
                    attempts.push(Attempt { strategy, error });
                }
            }
        }

        WriteOutcome::Failed { attempts }
    }
}

async fn apply<S>(
    store: &S,
    strategy: WriteStrategy,
    plan: &WritePlan,
    policy: ConflictPolicy,
) -> FolioResult<String>
where
    S: DocumentStore + ?Sized,
{
    match (strategy, plan) {
        (WriteStrategy::BatchWrite, WritePlan::Create { collection, fields }) => {
            let id = store.new_document_id();
            store
                .commit_batch(vec![BatchOp::Set {
                    collection: *collection,
                    id: id.clone(),
                    fields: fields.clone(),
                }])
                .await?;
            Ok(id)
        }
        (WriteStrategy::AddDocument, WritePlan::Create { collection, fields }) => {
            store.add(*collection, fields.clone()).await
        }
        (
            WriteStrategy::MergeUpdate,
            WritePlan::Update {
                collection,
                id,
                fields,
                ..
            },
        ) => {
            store.update(*collection, id, fields.clone()).await?;
            Ok(id.clone())
        }
        (
            WriteStrategy::Overwrite,
            WritePlan::Update {
                collection,
                id,
                fields,
                created_at,
                loaded_updated_at,
            },
        ) => {
            if policy == ConflictPolicy::RejectStale {
                check_not_stale(store, *collection, id, *loaded_updated_at).await?;
            }

            let mut replacement = fields.clone();
            let created = match created_at {
                Some(at) => Value::String(at.to_rfc3339()),
                None => server_timestamp(),
            };
            replacement.insert("createdAt".to_string(), created);
            store.set(*collection, id, replacement).await?;
            Ok(id.clone())
        }
        (strategy, WritePlan::Create { .. }) => Err(FolioError::BadRequest(format!(
            "strategy {} does not apply to a create",
            strategy
        ))),
        (strategy, WritePlan::Update { .. }) => Err(FolioError::BadRequest(format!(
            "strategy {} does not apply to an update",
            strategy
        ))),
    }
}

/// Refuse when the stored `updatedAt` moved past what the local copy saw.
/// An unknown local timestamp skips the check.
async fn check_not_stale<S>(
    store: &S,
    collection: Collection,
    id: &str,
    loaded_updated_at: Option<DateTime<Utc>>,
) -> FolioResult<()>
where
    S: DocumentStore + ?Sized,
{
    let Some(loaded) = loaded_updated_at else {
        return Ok(());
    };
    let current = store
        .get(collection, id)
        .await?
        .and_then(|doc| doc.timestamp("updatedAt"));

    match current {
        Some(current) if current != loaded => Err(FolioError::Conflict(format!(
            "{}/{} changed at {} after it was loaded at {}",
            collection,
            id,
            current.to_rfc3339(),
            loaded.to_rfc3339()
        ))),
        _ => Ok(()),
    }
}
