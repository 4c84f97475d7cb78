use std::time::Duration;

use crate::error::ValidationError;
use crate::lead::HttpCrmConfig;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CRM_BASE_URL: &str = "https://services.leadconnectorhq.com";
pub const DEFAULT_CRM_API_VERSION: &str = "2021-07-28";
pub const DEFAULT_CRM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub crm_base_url: String,
    pub crm_api_key: Option<String>,
    pub crm_location_id: String,
    pub crm_api_version: String,
    pub crm_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            crm_base_url: DEFAULT_CRM_BASE_URL.to_string(),
            crm_api_key: None,
            crm_location_id: String::new(),
            crm_api_version: DEFAULT_CRM_API_VERSION.to_string(),
            crm_timeout: Duration::from_secs(DEFAULT_CRM_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "ignoring unreadable .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = match get("OZCALC_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ValidationError::invalid_format("OZCALC_PORT", "expected a port number"))?,
            None => defaults.port,
        };
        let crm_timeout = match get("CRM_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                ValidationError::invalid_format("CRM_TIMEOUT_SECS", "expected whole seconds")
            })?),
            None => defaults.crm_timeout,
        };

        Ok(Self {
            port,
            crm_base_url: get("CRM_BASE_URL").unwrap_or(defaults.crm_base_url),
            crm_api_key: get("CRM_API_KEY"),
            crm_location_id: get("CRM_LOCATION_ID").unwrap_or(defaults.crm_location_id),
            crm_api_version: get("CRM_API_VERSION").unwrap_or(defaults.crm_api_version),
            crm_timeout,
        })
    }

    pub fn crm_config(&self) -> HttpCrmConfig {
        HttpCrmConfig {
            base_url: self.crm_base_url.clone(),
            api_key: self.crm_api_key.clone(),
            api_version: self.crm_api_version.clone(),
            timeout: self.crm_timeout,
        }
    }
}
