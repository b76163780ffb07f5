//! Contact form message and the status shown after submitting it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::require_text;
use crate::error::{FolioError, FolioResult};

pub const CONTACT_SUCCESS_MESSAGE: &str =
    "Message sent successfully! I will get back to you soon.";
pub const CONTACT_FAILURE_MESSAGE: &str = "Failed to send message. Please try again later.";

/// A message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> FolioResult<()> {
        require_text("name", &self.name)?;
        require_text("email", &self.email)?;
        require_text("subject", &self.subject)?;
        require_text("message", &self.message)?;

        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(FolioError::BadRequest(format!(
                "Invalid email address: {}",
                self.email
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatusKind {
    Success,
    Error,
}

/// User-visible outcome of a contact submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmitStatus {
    #[serde(rename = "type")]
    pub kind: SubmitStatusKind,
    pub message: String,
}

impl SubmitStatus {
    pub fn success() -> Self {
        Self {
            kind: SubmitStatusKind::Success,
            message: CONTACT_SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            kind: SubmitStatusKind::Error,
            message: CONTACT_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(email: &str) -> ContactMessage {
        ContactMessage {
            name: "Ada".to_string(),
            email: email.to_string(),
            subject: "Hello".to_string(),
            message: "Let's work together".to_string(),
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(message("ada@example.com").validate().is_ok());
        assert!(message("ada").validate().is_err());
        assert!(message("@example.com").validate().is_err());
        assert!(message("ada@localhost").validate().is_err());
    }

    #[test]
    fn test_blank_subject_rejected() {
        let mut m = message("ada@example.com");
        m.subject = " ".to_string();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_status_serializes_type_field() {
        let json = serde_json::to_value(SubmitStatus::failure()).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], CONTACT_FAILURE_MESSAGE);
    }
}
