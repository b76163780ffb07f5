//! Domain types for Folio Core.
//!
//! This module contains the records the site persists and the admin form
//! types that produce them.

mod contact;
mod project;
mod skill;

pub use contact::*;
pub use project::*;
pub use skill::*;

use chrono::{DateTime, Utc};

use crate::error::FolioResult;
use crate::store::{Collection, Document, Fields};

/// A record kind mirrored between a store collection and local admin state.
pub trait Record: Clone + Send + Sync + 'static {
    /// Collection the record lives in.
    const COLLECTION: Collection;
    /// Human-readable name used in messages ("project", "skill").
    const LABEL: &'static str;
    /// Validated form output.
    type Draft: Clone + Send + Sync;

    fn id(&self) -> &str;
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// Parse and check a stored document.
    fn from_document(doc: Document) -> FolioResult<Self>;

    /// Field map for a draft, without timestamps.
    fn draft_fields(draft: &Self::Draft) -> Fields;

    /// Build the local copy of a record that was just written.
    fn from_draft(
        draft: Self::Draft,
        id: String,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self;
}

/// Reject blank required text.
pub(crate) fn require_text(field: &str, value: &str) -> FolioResult<()> {
    if value.trim().is_empty() {
        return Err(crate::error::FolioError::BadRequest(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}
