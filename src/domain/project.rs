//! Portfolio project records and the admin project form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;
use utoipa::ToSchema;

use super::{require_text, Record};
use crate::error::{FolioError, FolioResult};
use crate::store::{Collection, Document, Fields};

/// A portfolio project as stored in the `projects` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    /// Technology names in display order.
    pub technologies: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Enforce the record invariants.
    pub fn check(&self) -> FolioResult<()> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_text("imageUrl", &self.image_url)?;
        check_url("imageUrl", &self.image_url)?;
        if let Some(url) = &self.live_url {
            check_url("liveUrl", url)?;
        }
        if let Some(url) = &self.github_url {
            check_url("githubUrl", url)?;
        }
        if self.technologies.is_empty() {
            return Err(FolioError::BadRequest(
                "at least one technology is required".to_string(),
            ));
        }
        if self.technologies.iter().any(|t| t.trim().is_empty()) {
            return Err(FolioError::BadRequest(
                "technology names must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> FolioResult<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| FolioError::BadRequest(format!("{} is not a valid URL: {}", field, e)))
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Raw input of the admin project form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub live_url: String,
    #[serde(default)]
    pub github_url: String,
    /// Comma-separated technology names.
    pub technologies: String,
    #[serde(default)]
    pub featured: bool,
}

impl ProjectForm {
    /// Prefill the form for editing an existing project.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            image_url: project.image_url.clone(),
            live_url: project.live_url.clone().unwrap_or_default(),
            github_url: project.github_url.clone().unwrap_or_default(),
            technologies: project.technologies.join(", "),
            featured: project.featured,
        }
    }

    /// Validate the form into a draft ready to be written.
    pub fn validate(&self) -> FolioResult<ProjectDraft> {
        let technologies: Vec<String> = self
            .technologies
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        let draft = ProjectDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
            live_url: optional(&self.live_url),
            github_url: optional(&self.github_url),
            technologies,
            featured: self.featured,
        };

        Project::from_draft(draft.clone(), String::new(), None, None).check()?;
        Ok(draft)
    }
}

/// Validated project fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Vec<String>,
    pub featured: bool,
}

impl Record for Project {
    const COLLECTION: Collection = Collection::Projects;
    const LABEL: &'static str = "project";
    type Draft = ProjectDraft;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn from_document(doc: Document) -> FolioResult<Self> {
        let mut fields = doc.fields;
        fields.insert("id".to_string(), Value::String(doc.id));
        let project: Project = serde_json::from_value(Value::Object(fields))?;
        project.check()?;
        Ok(project)
    }

    fn draft_fields(draft: &ProjectDraft) -> Fields {
        let value = json!({
            "title": draft.title,
            "description": draft.description,
            "imageUrl": draft.image_url,
            "liveUrl": draft.live_url,
            "githubUrl": draft.github_url,
            "technologies": draft.technologies,
            "featured": draft.featured,
        });
        match value {
            Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    fn from_draft(
        draft: ProjectDraft,
        id: String,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            live_url: draft.live_url,
            github_url: draft.github_url,
            technologies: draft.technologies,
            featured: draft.featured,
            created_at,
            updated_at,
        }
    }
}
