//! Skill records and the admin skill form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::{require_text, Record};
use crate::error::{FolioError, FolioResult};
use crate::store::{Collection, Document, Fields};

/// Inclusive proficiency bounds.
pub const MIN_PROFICIENCY: i64 = 1;
pub const MAX_PROFICIENCY: i64 = 100;

/// Skill grouping shown on the about page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    Devops,
    Other,
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillCategory::Frontend => write!(f, "frontend"),
            SkillCategory::Backend => write!(f, "backend"),
            SkillCategory::Database => write!(f, "database"),
            SkillCategory::Devops => write!(f, "devops"),
            SkillCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frontend" => Ok(SkillCategory::Frontend),
            "backend" => Ok(SkillCategory::Backend),
            "database" => Ok(SkillCategory::Database),
            "devops" => Ok(SkillCategory::Devops),
            "other" => Ok(SkillCategory::Other),
            _ => Err(format!("Invalid skill category: {}", s)),
        }
    }
}

/// A skill as stored in the `skills` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Emoji or icon code.
    pub icon: String,
    pub category: SkillCategory,
    pub proficiency: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Skill {
    pub fn check(&self) -> FolioResult<()> {
        require_text("name", &self.name)?;
        require_text("icon", &self.icon)?;
        check_proficiency(i64::from(self.proficiency))
    }
}

fn check_proficiency(value: i64) -> FolioResult<()> {
    if !(MIN_PROFICIENCY..=MAX_PROFICIENCY).contains(&value) {
        return Err(FolioError::BadRequest(format!(
            "proficiency must be between {} and {}, got {}",
            MIN_PROFICIENCY, MAX_PROFICIENCY, value
        )));
    }
    Ok(())
}

/// Raw input of the admin skill form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SkillForm {
    pub name: String,
    pub icon: String,
    /// One of the category names; empty until one is picked.
    pub category: String,
    pub proficiency: i64,
}

impl SkillForm {
    pub fn from_skill(skill: &Skill) -> Self {
        Self {
            name: skill.name.clone(),
            icon: skill.icon.clone(),
            category: skill.category.to_string(),
            proficiency: i64::from(skill.proficiency),
        }
    }

    /// Validate the form into a draft. Nothing is sent anywhere on failure.
    pub fn validate(&self) -> FolioResult<SkillDraft> {
        require_text("name", &self.name)?;
        require_text("icon", &self.icon)?;
        let category = self
            .category
            .parse::<SkillCategory>()
            .map_err(FolioError::BadRequest)?;
        check_proficiency(self.proficiency)?;

        Ok(SkillDraft {
            name: self.name.trim().to_string(),
            icon: self.icon.trim().to_string(),
            category,
            proficiency: self.proficiency as u8,
        })
    }
}

/// Validated skill fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillDraft {
    pub name: String,
    pub icon: String,
    pub category: SkillCategory,
    pub proficiency: u8,
}

impl Record for Skill {
    const COLLECTION: Collection = Collection::Skills;
    const LABEL: &'static str = "skill";
    type Draft = SkillDraft;

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
        let skill: Skill = serde_json::from_value(Value::Object(fields))?;
        skill.check()?;
        Ok(skill)
    }

    fn draft_fields(draft: &SkillDraft) -> Fields {
        let value = json!({
            "name": draft.name,
            "icon": draft.icon,
            "category": draft.category,
            "proficiency": draft.proficiency,
        });
        match value {
            Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    fn from_draft(
        draft: SkillDraft,
        id: String,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name: draft.name,
            icon: draft.icon,
            category: draft.category,
            proficiency: draft.proficiency,
            created_at,
            updated_at,
        }
    }
}
