use crate::config::MonitoringConfig;
use crate::errors::AppError;
use crate::renderer::render;
use crate::tree::Node;
use reqwest::Client;
use serde_json::Value;

/// Envelope `status` values that mean success.
pub const SUCCESS_STATUSES: &[&str] = &["200", "0", "OK", "ok"];

/// Client for the zachestnyibiznes Monitoring API.
///
/// A card can only be fetched for an identifier that has been added to
/// monitoring first, so every lookup is `add_id` followed by `fetch_card`.
#[derive(Clone)]
pub struct MonitoringService {
    client: Client,
    config: MonitoringConfig,
}

impl MonitoringService {
    pub fn new(config: MonitoringConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Registers `id` for monitoring. The response only matters for its envelope.
    pub async fn add_id(&self, id: &str) -> Result<(), AppError> {
        let url = self.config.add_id_url.render(id, &self.config.api_key)?;
        tracing::info!("Monitoring: adding {} to monitoring", id);
        self.get_json(url, "add-id").await?;
        Ok(())
    }

    /// Fetches the card for `id` and returns the whole (already validated) envelope.
    pub async fn fetch_card(&self, id: &str) -> Result<Value, AppError> {
        let url = self.config.card_url.render(id, &self.config.api_key)?;
        tracing::info!("Monitoring: fetching card for {}", id);
        let envelope = self.get_json(url, "card").await?;
        tracing::info!("Monitoring: card received for {}", id);
        Ok(envelope)
    }

    async fn get_json(&self, url: reqwest::Url, call: &str) -> Result<Value, AppError> {
        // Redact the key from logs
        tracing::debug!(
            "Monitoring {} URL: {}{}",
            call,
            url.origin().ascii_serialization(),
            url.path()
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::Transport(format!("Monitoring {} request failed: {}", call, e.without_url()))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Monitoring {} returned error {}: {}", call, status, error_text);
            return Err(AppError::Transport(format!(
                "Monitoring {} returned status {}: {}",
                call, status, error_text
            )));
        }

        let text = response.text().await.map_err(|e| {
            AppError::Transport(format!(
                "Failed to read Monitoring {} response: {}",
                call,
                e.without_url()
            ))
        })?;
        let data: Value = serde_json::from_str(&text).map_err(|e| {
            AppError::Parse(format!("Failed to parse Monitoring {} response: {}", call, e))
        })?;

        check_envelope(&data)?;
        Ok(data)
    }
}

/// Rejects an envelope whose `status` is present and not a success marker,
/// unless it still carries a non-empty `body`.
///
/// Non-object payloads have no envelope and always pass.
pub fn check_envelope(data: &Value) -> Result<(), AppError> {
    let Some(obj) = data.as_object() else {
        return Ok(());
    };
    let Some(status) = obj.get("status").filter(|s| !s.is_null()) else {
        return Ok(());
    };

    let status = render(&Node::from(status));
    if SUCCESS_STATUSES.contains(&status.as_str()) || has_body(obj.get("body")) {
        return Ok(());
    }

    let message = obj
        .get("message")
        .map(|m| render(&Node::from(m)))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| data.to_string());
    Err(AppError::Provider(format!("{}: {}", status, message)))
}

fn has_body(body: Option<&Value>) -> bool {
    match body {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::Bool(true)) => true,
    }
}

/// Card body: the `body` field when present, otherwise the envelope minus its
/// own `status` and `message` markers. An explicit `"body": null` is no card at all.
pub fn extract_body(envelope: Value) -> Value {
    match envelope {
        Value::Object(mut obj) => {
            if matches!(obj.get("body"), Some(Value::Null)) {
                return Value::Null;
            }
            if has_body(obj.get("body")) {
                return obj.remove("body").unwrap_or(Value::Null);
            }
            // Rebuilt rather than removed in place so key order survives.
            Value::Object(
                obj.into_iter()
                    .filter(|(k, _)| !matches!(k.as_str(), "status" | "message" | "body"))
                    .collect(),
            )
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_statuses_pass() {
        for status in [json!("200"), json!(200), json!("0"), json!(0), json!("OK"), json!("ok")] {
            assert!(check_envelope(&json!({"status": status})).is_ok());
        }
    }

    #[test]
    fn test_missing_status_passes() {
        assert!(check_envelope(&json!({"message": "whatever"})).is_ok());
        assert!(check_envelope(&json!({"status": null})).is_ok());
        assert!(check_envelope(&json!([1, 2])).is_ok());
    }

    #[test]
    fn test_failure_status_with_body_passes() {
        assert!(check_envelope(&json!({"status": "404", "body": {"inn": "7707083893"}})).is_ok());
    }

    #[test]
    fn test_failure_status_without_body_fails_with_message() {
        let err = check_envelope(&json!({"status": "403", "message": "Неверный ключ"})).unwrap_err();
        assert_eq!(err, AppError::Provider("403: Неверный ключ".to_string()));
    }

    #[test]
    fn test_failure_without_message_reports_envelope() {
        let err = check_envelope(&json!({"status": "error", "body": {}})).unwrap_err();
        assert_eq!(
            err,
            AppError::Provider(r#"error: {"status":"error","body":{}}"#.to_string())
        );
    }

    #[test]
    fn test_extract_body() {
        assert_eq!(
            extract_body(json!({"status": "200", "body": {"inn": "1"}})),
            json!({"inn": "1"})
        );
        assert_eq!(
            extract_body(json!({"status": "200", "body": {}, "inn": "1"})),
            json!({"inn": "1"})
        );
        assert_eq!(extract_body(json!({"status": "200"})), json!({}));
        assert_eq!(extract_body(json!({"status": "200", "body": null})), Value::Null);
        assert_eq!(extract_body(json!([{"inn": "1"}])), json!([{"inn": "1"}]));
    }

    #[tokio::test]
    async fn test_service_creation() {
        let config = MonitoringConfig::new(
            crate::config::DEFAULT_ADD_ID_URL,
            crate::config::DEFAULT_CARD_URL,
            "key",
        )
        .unwrap();
        assert!(MonitoringService::new(config).is_ok());
    }
}
