use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::ContactRequest;
use crate::error::CrmError;

#[async_trait]
pub trait CrmClient: Send + Sync {
    async fn create_contact(&self, contact: &ContactRequest) -> Result<String, CrmError>;
}

#[derive(Debug, Clone)]
pub struct HttpCrmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_version: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct HttpCrmClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    api_version: String,
}

#[derive(Deserialize)]
struct CreateContactResponse {
    contact: Option<CreatedContact>,
}

#[derive(Deserialize)]
struct CreatedContact {
    id: String,
}

impl HttpCrmClient {
    pub fn new(config: HttpCrmConfig) -> Result<Self, CrmError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            api_version: config.api_version,
        })
    }

    fn contacts_url(&self) -> String {
        format!("{}/contacts/", self.base_url)
    }
}

#[async_trait]
impl CrmClient for HttpCrmClient {
    async fn create_contact(&self, contact: &ContactRequest) -> Result<String, CrmError> {
        let api_key = self.api_key.as_deref().ok_or(CrmError::NotConfigured)?;

        let response = self
            .client
            .post(self.contacts_url())
            .bearer_auth(api_key)
            .header("Version", &self.api_version)
            .json(contact)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "CRM rejected contact");
            return Err(CrmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreateContactResponse = response
            .json()
            .await
            .map_err(|e| CrmError::MalformedResponse(e.to_string()))?;

        created
            .contact
            .map(|c| c.id)
            .ok_or_else(|| CrmError::MalformedResponse("missing contact id".to_string()))
    }
}
