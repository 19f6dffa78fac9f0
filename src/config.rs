use crate::errors::AppError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ADD_ID_URL: &str =
    "https://zachestnyibiznesapi.ru/monitoring/data/add-id?id={id}&api_key={key}";
pub const DEFAULT_CARD_URL: &str =
    "https://zachestnyibiznesapi.ru/monitoring/data/card?id={id}&api_key={key}";
pub const DEFAULT_CACHE_FILE: &str = "cache_company.json";

/// Per-request timeout for both Monitoring API calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

const ID_PLACEHOLDER: &str = "{id}";
const KEY_PLACEHOLDER: &str = "{key}";

/// URL with literal `{id}` and optional `{key}` placeholders. `{key}` may only
/// appear in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    /// Validates `template` once so rendering per call cannot produce garbage.
    pub fn parse(name: &str, template: &str) -> Result<Self, AppError> {
        let template = template.trim();
        if template.is_empty() {
            return Err(AppError::MissingConfiguration(format!(
                "{} cannot be empty",
                name
            )));
        }
        if !template.contains(ID_PLACEHOLDER) {
            return Err(AppError::MissingConfiguration(format!(
                "{} must contain {} placeholder",
                name, ID_PLACEHOLDER
            )));
        }

        let before_query = template.split_once('?').map_or(template, |(head, _)| head);
        if before_query.contains(KEY_PLACEHOLDER) {
            return Err(AppError::MissingConfiguration(format!(
                "{} must carry {} in the query string",
                name, KEY_PLACEHOLDER
            )));
        }

        let sample = template
            .replace(ID_PLACEHOLDER, "0000000000")
            .replace(KEY_PLACEHOLDER, "key");
        let url = Url::parse(&sample).map_err(|e| {
            AppError::MissingConfiguration(format!("{} is not a valid URL: {}", name, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AppError::MissingConfiguration(format!(
                "{} must start with http:// or https://",
                name
            )));
        }

        Ok(Self(template.to_string()))
    }

    /// Substitutes the identifier and the form-encoded key (a space becomes `+`,
    /// which is why `{key}` is only accepted in the query string).
    pub fn render(&self, id: &str, key: &str) -> Result<Url, AppError> {
        let encoded_key: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
        let rendered = self
            .0
            .replace(ID_PLACEHOLDER, id)
            .replace(KEY_PLACEHOLDER, &encoded_key);
        Url::parse(&rendered)
            .map_err(|e| AppError::MissingConfiguration(format!("Failed to build URL: {}", e)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Settings for the two-phase Monitoring protocol.
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    pub add_id_url: UrlTemplate,
    pub card_url: UrlTemplate,
    pub api_key: String,
    pub timeout: Duration,
}

impl MonitoringConfig {
    pub fn new(add_id_url: &str, card_url: &str, api_key: &str) -> Result<Self, AppError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::MissingConfiguration(
                "ZCB_API_KEY cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            add_id_url: UrlTemplate::parse("ZCB_MON_ADD_ID_URL", add_id_url)?,
            card_url: UrlTemplate::parse("ZCB_MON_CARD_URL", card_url)?,
            api_key: api_key.to_string(),
            timeout: REQUEST_TIMEOUT,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub monitoring: MonitoringConfig,
    pub cache_file: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("ZCB_API_KEY").map_err(|_| {
            AppError::MissingConfiguration("ZCB_API_KEY environment variable required".to_string())
        })?;
        let add_id_url =
            std::env::var("ZCB_MON_ADD_ID_URL").unwrap_or_else(|_| DEFAULT_ADD_ID_URL.to_string());
        let card_url =
            std::env::var("ZCB_MON_CARD_URL").unwrap_or_else(|_| DEFAULT_CARD_URL.to_string());

        let config = Self {
            monitoring: MonitoringConfig::new(&add_id_url, &card_url, &api_key)?,
            cache_file: std::env::var("ZCB_CACHE_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CACHE_FILE.to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| {
                    AppError::MissingConfiguration(
                        "PORT must be a valid number between 1-65535".to_string(),
                    )
                })?,
        };

        // Never log the key itself
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Add-id URL: {}",
            config.monitoring.add_id_url.as_str().replace(KEY_PLACEHOLDER, "[REDACTED]")
        );
        tracing::debug!(
            "Card URL: {}",
            config.monitoring.card_url.as_str().replace(KEY_PLACEHOLDER, "[REDACTED]")
        );
        tracing::debug!("Cache file: {}", config.cache_file.display());
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
