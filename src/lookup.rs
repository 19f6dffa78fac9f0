/// Registry lookup workflow
///
/// 1. Validate the identifier (ИНН, 10 or 12 digits)
/// 2. Serve a fresh cached record if there is one
/// 3. Add the identifier to monitoring
/// 4. Fetch its card
/// 5. Resolve each canonical field from the card body
/// 6. Cache the normalized record
use crate::cache::{CacheLookup, ResponseCache};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{CanonicalField, NormalizedRecord, NAME_PLACEHOLDER};
use crate::resolver::{resolve_text, FlattenedIndex};
use crate::services::{extract_body, MonitoringService};
use crate::tree::Node;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]{10}|[0-9]{12})$").expect("identifier regex"));

/// Accepts 10-digit (organisation) and 12-digit (individual) identifiers.
pub fn validate_identifier(id: &str) -> Result<(), AppError> {
    if IDENTIFIER_RE.is_match(id) {
        Ok(())
    } else {
        Err(AppError::InvalidIdentifier(format!(
            "expected 10 or 12 digits, got {:?}",
            id
        )))
    }
}

/// Builds the canonical record from a card body. Unresolved fields take their defaults.
pub fn normalize_card(body: Value, inn: &str) -> NormalizedRecord {
    let tree = Node::from(&body);
    let index = FlattenedIndex::build(&tree);
    let field = |f: CanonicalField| resolve_text(&index, f.patterns()).unwrap_or_default();

    let name = field(CanonicalField::Name);
    let resolved_inn = field(CanonicalField::Inn);

    NormalizedRecord {
        name: if name.is_empty() {
            NAME_PLACEHOLDER.to_string()
        } else {
            name
        },
        inn: if resolved_inn.is_empty() {
            inn.to_string()
        } else {
            resolved_inn
        },
        ogrn: field(CanonicalField::Ogrn),
        kpp: field(CanonicalField::Kpp),
        status: field(CanonicalField::Status),
        address: field(CanonicalField::Address),
        okved: field(CanonicalField::Okved),
        raw: body,
    }
}

/// Looks up registry cards, shielded by a response cache.
#[derive(Clone)]
pub struct RegistryLookup {
    service: MonitoringService,
    cache: ResponseCache,
}

impl RegistryLookup {
    pub fn new(service: MonitoringService, cache: ResponseCache) -> Self {
        Self { service, cache }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(
            MonitoringService::new(config.monitoring.clone())?,
            ResponseCache::new(config.cache_file.clone()),
        ))
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Returns the normalized card for `id`.
    ///
    /// Any failure ends the call; nothing is retried and nothing is cached.
    pub async fn lookup(&self, id: &str) -> Result<NormalizedRecord, AppError> {
        validate_identifier(id)?;

        match self.cache.get(id).await {
            CacheLookup::Hit(Some(record)) => {
                tracing::info!("Registry cache HIT for {}", id);
                return Ok(record);
            }
            CacheLookup::Hit(None) => {
                tracing::info!("Registry cache HIT (negative) for {}", id);
                return Ok(NormalizedRecord::placeholder(id));
            }
            CacheLookup::Miss => {
                tracing::info!("Registry cache MISS for {}, querying Monitoring API", id);
            }
        }

        self.service.add_id(id).await?;
        let envelope = self.service.fetch_card(id).await?;

        let (record, cached) = match extract_body(envelope) {
            Value::Null => {
                tracing::warn!("Monitoring returned an empty card for {}", id);
                (NormalizedRecord::placeholder(id), None)
            }
            body => {
                let record = normalize_card(body, id);
                (record.clone(), Some(record))
            }
        };

        if let Err(e) = self.cache.put(id, cached).await {
            tracing::error!(
                "Failed to persist cache {}: {}",
                self.cache.path().display(),
                e
            );
        }

        tracing::info!("✓ Registry lookup complete for {}: {}", id, record.name);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_validation() {
        assert!(validate_identifier("7707083893").is_ok());
        assert!(validate_identifier("500100732259").is_ok());

        for bad in ["abc1234567", "123456789", "12345678901", "", "7707083893 ", "１２３４５６７８９０"] {
            assert!(
                matches!(validate_identifier(bad), Err(AppError::InvalidIdentifier(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_normalize_organisation_card() {
        let body = json!({
            "ИНН": "7707083893",
            "ОГРН": 1027700132195u64,
            "КПП": "773601001",
            "НаимЮЛПолн": "ПУБЛИЧНОЕ  АКЦИОНЕРНОЕ ОБЩЕСТВО\n\"СБЕРБАНК РОССИИ\"",
            "Статус": "Действующее",
            "Адрес": "117312, г. Москва,   ул. Вавилова, д. 19",
            "ОКВЭД": {"Код": "64.19", "Наим": "Денежное посредничество прочее"},
            "ОКВЭДОснКод": "64.19"
        });
        let record = normalize_card(body.clone(), "7707083893");

        assert_eq!(record.name, "ПУБЛИЧНОЕ АКЦИОНЕРНОЕ ОБЩЕСТВО \"СБЕРБАНК РОССИИ\"");
        assert_eq!(record.inn, "7707083893");
        assert_eq!(record.ogrn, "1027700132195");
        assert_eq!(record.kpp, "773601001");
        assert_eq!(record.status, "Действующее");
        assert_eq!(record.address, "117312, г. Москва, ул. Вавилова, д. 19");
        assert_eq!(record.okved, "64.19");
        assert_eq!(record.raw, body);
    }

    #[test]
    fn test_normalize_individual_with_structured_fio() {
        let body = json!({
            "egrip": {
                "fio": {"last": "Иванов", "first": "Иван", "middle": "Иванович"},
                "ogrnip": "304500116000157",
                "inn": "500100732259"
            }
        });
        let record = normalize_card(body, "500100732259");
        assert_eq!(record.name, "Иванов Иван Иванович");
        assert_eq!(record.ogrn, "304500116000157");
        assert_eq!(record.inn, "500100732259");
        assert_eq!(record.kpp, "");
    }

    #[test]
    fn test_normalize_individual_with_full_fio() {
        let body = json!({"egrip": {"fio": {"full": "Иванов Иван Иванович"}}});
        assert_eq!(normalize_card(body, "500100732259").name, "Иванов Иван Иванович");
    }

    #[test]
    fn test_normalize_empty_body_uses_defaults() {
        let record = normalize_card(json!({}), "7707083893");
        assert_eq!(
            record,
            NormalizedRecord {
                raw: json!({}),
                ..NormalizedRecord::placeholder("7707083893")
            }
        );
    }
}
