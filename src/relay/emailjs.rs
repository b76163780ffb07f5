//! EmailJS-compatible relay client.
//!
//! Posts the form fields as template parameters together with the public
//! client key, service id and template id.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::ContactRelay;
use crate::config::RelayConfig;
use crate::domain::ContactMessage;
use crate::error::{FolioError, FolioResult};

/// Request body of the relay's send endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    user_name: &'a str,
    user_email: &'a str,
    subject: &'a str,
    message: &'a str,
}

pub struct EmailJsRelay {
    http: Client,
    config: RelayConfig,
}

impl EmailJsRelay {
    pub fn new(config: RelayConfig) -> FolioResult<Self> {
        if config.service_id.is_empty() || config.template_id.is_empty() {
            return Err(FolioError::Config(
                "relay.service_id and relay.template_id are required".to_string(),
            ));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FolioError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl ContactRelay for EmailJsRelay {
    async fn send(&self, message: &ContactMessage) -> FolioResult<()> {
        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: TemplateParams {
                user_name: &message.name,
                user_email: &message.email,
                subject: &message.subject,
                message: &message.message,
            },
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| FolioError::Relay(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FolioError::Relay(format!("{}: {}", status, text)));
        }

        Ok(())
    }
}
