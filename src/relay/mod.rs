//! Contact form delivery through a third-party email relay.

mod emailjs;

pub use emailjs::*;

use async_trait::async_trait;

use crate::domain::{ContactMessage, SubmitStatus};
use crate::error::FolioResult;

/// Something that can deliver a contact message.
#[async_trait]
pub trait ContactRelay: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> FolioResult<()>;
}

/// Relay used when delivery is switched off: accepts and logs.
pub struct DisabledRelay;

#[async_trait]
impl ContactRelay for DisabledRelay {
    async fn send(&self, message: &ContactMessage) -> FolioResult<()> {
        tracing::warn!(
            from = %message.email,
            subject = %message.subject,
            "Email relay disabled; contact message dropped"
        );
        Ok(())
    }
}

/// Validate, deliver and map the result to the status the visitor sees.
pub async fn submit_contact(relay: &dyn ContactRelay, message: &ContactMessage) -> SubmitStatus {
    if let Err(e) = message.validate() {
        tracing::debug!(error = %e, "Contact message rejected");
        return SubmitStatus::failure();
    }

    match relay.send(message).await {
        Ok(()) => {
            tracing::info!(from = %message.email, "Contact message sent");
            SubmitStatus::success()
        }
        Err(e) => {
            tracing::error!(error = %e, from = %message.email, "Contact message failed");
            SubmitStatus::failure()
        }
    }
}
