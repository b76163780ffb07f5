//! Document model shared by every store backend.
//!
//! Documents are flat JSON objects addressed by `(collection, id)`. Writes may
//! carry the server-timestamp sentinel, which the store replaces with its own
//! clock when the write is applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use crate::domain::{Project, Record, Skill};
use crate::error::{FolioError, FolioResult};

/// Field map of a document.
pub type Fields = Map<String, Value>;

/// Key of the reserved object that marks a server-assigned timestamp.
pub const SERVER_TIMESTAMP_KEY: &str = "$serverTimestamp";

/// The two collections the site persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Projects,
    Skills,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Skills => "skills",
        }
    }

    /// Check that `fields` form a valid record of this collection.
    pub fn validate(&self, id: &str, fields: &Fields) -> FolioResult<()> {
        let doc = Document::new(id, fields.clone());
        match self {
            Collection::Projects => Project::from_document(doc).map(|_| ()),
            Collection::Skills => Skill::from_document(doc).map(|_| ()),
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "projects" => Ok(Collection::Projects),
            "skills" => Ok(Collection::Skills),
            _ => Err(format!("Unknown collection: {}", s)),
        }
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Document {
    pub id: String,
    #[schema(value_type = Object)]
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Parse an RFC 3339 timestamp field, if present.
    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A single write inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BatchOp {
    /// Create or replace a document.
    Set {
        collection: Collection,
        id: String,
        #[schema(value_type = Object)]
        fields: Fields,
    },
    /// Merge fields into an existing document.
    Update {
        collection: Collection,
        id: String,
        #[schema(value_type = Object)]
        fields: Fields,
    },
    /// Remove a document.
    Delete { collection: Collection, id: String },
}

impl BatchOp {
    pub fn collection(&self) -> Collection {
        match self {
            BatchOp::Set { collection, .. }
            | BatchOp::Update { collection, .. }
            | BatchOp::Delete { collection, .. } => *collection,
        }
    }
}

/// The server-timestamp sentinel value.
pub fn server_timestamp() -> Value {
    json!({ SERVER_TIMESTAMP_KEY: true })
}

pub fn is_server_timestamp(value: &Value) -> bool {
    value
        .as_object()
        .map(|o| o.len() == 1 && o.get(SERVER_TIMESTAMP_KEY) == Some(&Value::Bool(true)))
        .unwrap_or(false)
}

/// Replace every top-level sentinel with `now`.
pub fn resolve_server_timestamps(fields: &mut Fields, now: DateTime<Utc>) {
    let stamp = Value::String(now.to_rfc3339());
    for value in fields.values_mut() {
        if is_server_timestamp(value) {
            *value = stamp.clone();
        }
    }
}

/// Shallow merge: top-level keys in `patch` replace those in `target`.
pub fn merge_fields(target: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

/// Resolve sentinels and check the result against the collection's invariants.
pub(crate) fn prepare_fields(
    collection: Collection,
    id: &str,
    mut fields: Fields,
    now: DateTime<Utc>,
) -> FolioResult<Fields> {
    fields.remove("id");
    resolve_server_timestamps(&mut fields, now);
    collection.validate(id, &fields)?;
    Ok(fields)
}

/// Convert a JSON value into a field map, rejecting non-objects.
pub fn fields_from_value(value: Value) -> FolioResult<Fields> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(FolioError::BadRequest(format!(
            "Document must be a JSON object, got {}",
            other
        ))),
    }
}
