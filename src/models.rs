use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when the card carries no usable organisation or person name.
pub const NAME_PLACEHOLDER: &str = "(без названия)";

/// Canonical business-entity attributes extracted from a registry card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Full legal name, or a person's assembled full name for sole proprietors.
    pub name: String,
    /// Taxpayer number (ИНН). Falls back to the identifier that was looked up.
    pub inn: String,
    /// Primary state registration number (ОГРН / ОГРНИП).
    pub ogrn: String,
    /// Tax registration reason code (КПП). Organisations only.
    pub kpp: String,
    pub status: String,
    pub address: String,
    /// Main activity classification code (ОКВЭД).
    pub okved: String,
    /// Card body the fields were resolved from.
    pub raw: Value,
}

impl NormalizedRecord {
    /// Record with every field at its default, used when the provider has nothing for `inn`.
    pub fn placeholder(inn: &str) -> Self {
        Self {
            name: NAME_PLACEHOLDER.to_string(),
            inn: inn.to_string(),
            ogrn: String::new(),
            kpp: String::new(),
            status: String::new(),
            address: String::new(),
            okved: String::new(),
            raw: Value::Null,
        }
    }
}

/// Record as returned over HTTP, without the raw card.
#[derive(Debug, Clone, Serialize)]
pub struct OrgCard {
    pub name: String,
    pub inn: String,
    pub ogrn: String,
    pub kpp: String,
    pub status: String,
    pub address: String,
    pub okved: String,
}

impl From<NormalizedRecord> for OrgCard {
    fn from(record: NormalizedRecord) -> Self {
        Self {
            name: record.name,
            inn: record.inn,
            ogrn: record.ogrn,
            kpp: record.kpp,
            status: record.status,
            address: record.address,
            okved: record.okved,
        }
    }
}

/// The fixed set of attributes resolved from every card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Name,
    Inn,
    Ogrn,
    Kpp,
    Status,
    Address,
    Okved,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 7] = [
        CanonicalField::Name,
        CanonicalField::Inn,
        CanonicalField::Ogrn,
        CanonicalField::Kpp,
        CanonicalField::Status,
        CanonicalField::Address,
        CanonicalField::Okved,
    ];

    /// Synonyms in priority order. Matching is case-insensitive.
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Name => &[
                "НаимЮЛПолн",
                "Наименование",
                "egrip.fio",
                "name",
                "full_name",
                "egrul.name.full",
                "egrul_name",
                "НаимПолн",
                "ФИО",
                "fio",
            ],
            CanonicalField::Inn => &["ИНН", "inn"],
            CanonicalField::Ogrn => &["ОГРН", "ogrn", "ОГРНИП", "ogrnip"],
            CanonicalField::Kpp => &["КПП", "kpp"],
            CanonicalField::Status => &["Статус", "status", "egrul.status"],
            CanonicalField::Address => &["АдресПолн", "Адрес", "address", "addr", "egrul.address"],
            CanonicalField::Okved => &["ОКВЭДОснКод", "okved", "ОКВЭД", "egrul.okved.main.code"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_defaults() {
        let record = NormalizedRecord::placeholder("7707083893");
        assert_eq!(record.name, NAME_PLACEHOLDER);
        assert_eq!(record.inn, "7707083893");
        assert!(record.ogrn.is_empty() && record.kpp.is_empty() && record.okved.is_empty());
        assert_eq!(record.raw, Value::Null);
    }

    #[test]
    fn test_every_field_has_patterns() {
        for field in CanonicalField::ALL {
            assert!(!field.patterns().is_empty(), "{:?} has no patterns", field);
        }
    }
}
