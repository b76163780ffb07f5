//! SQLite-backed document store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::FromRow;

use super::{
    fields_from_value, merge_fields, prepare_fields, BatchOp, Collection, Document,
    DocumentStore, Fields,
};
use crate::error::{FolioError, FolioResult};

/// Database row for the documents table.
#[derive(Debug, Clone, FromRow)]
struct DocumentRow {
    id: String,
    fields: String,
}

impl TryFrom<DocumentRow> for Document {
    type Error = FolioError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let fields = fields_from_value(serde_json::from_str(&row.fields)?)?;
        Ok(Document::new(row.id, fields))
    }
}

/// Document store persisting every collection in one SQLite table.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
    online: Arc<AtomicBool>,
}

impl SqliteDocumentStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> FolioResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                fields TEXT NOT NULL,
                written_at TEXT NOT NULL,
                UNIQUE(collection, id)
            );

            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
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

async fn fetch_one(
    conn: &mut SqliteConnection,
    collection: Collection,
    id: &str,
) -> FolioResult<Option<Document>> {
    let row: Option<DocumentRow> =
        sqlx::query_as("SELECT id, fields FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    row.map(Document::try_from).transpose()
}

async fn write_fields(
    conn: &mut SqliteConnection,
    collection: Collection,
    id: &str,
    fields: &Fields,
) -> FolioResult<()> {
    sqlx::query(
        r#"
        INSERT INTO documents (collection, id, fields, written_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(collection, id) DO UPDATE SET
            fields = excluded.fields,
            written_at = excluded.written_at
        "#,
    )
    .bind(collection.as_str())
    .bind(id)
    .bind(serde_json::to_string(fields)?)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn apply_op(conn: &mut SqliteConnection, op: BatchOp) -> FolioResult<()> {
    match op {
        BatchOp::Set {
            collection,
            id,
            fields,
        } => {
            let fields = prepare_fields(collection, &id, fields, Utc::now())?;
            write_fields(conn, collection, &id, &fields).await
        }
        BatchOp::Update {
            collection,
            id,
            fields,
        } => {
            let existing = fetch_one(conn, collection, &id).await?.ok_or_else(|| {
                FolioError::NotFound(format!("Document {}/{} not found", collection, id))
            })?;
            let mut merged = existing.fields;
            merge_fields(&mut merged, fields);
            let merged = prepare_fields(collection, &id, merged, Utc::now())?;
            write_fields(conn, collection, &id, &merged).await
        }
        BatchOp::Delete { collection, id } => {
            sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
                .bind(collection.as_str())
                .bind(&id)
                .execute(&mut *conn)
                .await?;
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get_all(&self, collection: Collection) -> FolioResult<Vec<Document>> {
        self.ensure_online()?;
        let rows: Vec<DocumentRow> =
            sqlx::query_as("SELECT id, fields FROM documents WHERE collection = ? ORDER BY seq")
                .bind(collection.as_str())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Document::try_from).collect()
    }

    async fn get(&self, collection: Collection, id: &str) -> FolioResult<Option<Document>> {
        self.ensure_online()?;
        let mut conn = self.pool.acquire().await?;
        fetch_one(&mut conn, collection, id).await
    }

    async fn add(&self, collection: Collection, fields: Fields) -> FolioResult<String> {
        self.ensure_online()?;
        let id = self.new_document_id();
        let fields = prepare_fields(collection, &id, fields, Utc::now())?;
        let mut conn = self.pool.acquire().await?;
        write_fields(&mut conn, collection, &id, &fields).await?;

        tracing::debug!(collection = %collection, id = %id, "Document added");
        Ok(id)
    }

    async fn set(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()> {
        self.ensure_online()?;
        let mut conn = self.pool.acquire().await?;
        apply_op(
            &mut conn,
            BatchOp::Set {
                collection,
                id: id.to_string(),
                fields,
            },
        )
        .await
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> FolioResult<()> {
        self.ensure_online()?;
        let mut tx = self.pool.begin().await?;
        apply_op(
            &mut tx,
            BatchOp::Update {
                collection,
                id: id.to_string(),
                fields,
            },
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> FolioResult<()> {
        self.ensure_online()?;
        let mut conn = self.pool.acquire().await?;
        apply_op(
            &mut conn,
            BatchOp::Delete {
                collection,
                id: id.to_string(),
            },
        )
        .await
    }

    async fn commit_batch(&self, ops: Vec<BatchOp>) -> FolioResult<()> {
        self.ensure_online()?;
        let count = ops.len();
        let mut tx = self.pool.begin().await?;
        for op in ops {
            // Dropping the transaction on error rolls it back.
            apply_op(&mut tx, op).await?;
        }
        tx.commit().await?;

        tracing::debug!(ops = count, "Batch committed");
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

    async fn ping(&self) -> FolioResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) async fn test_store() -> SqliteDocumentStore {
    // One connection: every in-memory connection is its own database.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SqliteDocumentStore::new(pool);
    store.init_schema().await.unwrap();
    store
}
