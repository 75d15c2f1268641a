//! The certificate metadata document and its recognized traits.
//!
//! The document follows the common NFT JSON shape:
//!
//! ```json
//! {
//!   "name": "Solana Headphones V1",
//!   "description": "...",
//!   "image": "https://gateway.pinata.cloud/ipfs/<cid>",
//!   "attributes": [{ "trait_type": "Category", "value": "Electronics" }],
//!   "properties": { "files": [{ "type": "image/png", "uri": "..." }] }
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::CertumError;

/// Canonical certificate metadata document. Immutable once published.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
///
/// Reading is field by field: a `null` or mistyped field falls back to its
/// default and an attribute that does not decode is skipped, so one bad
/// field never hides the others.
pub struct MetadataDocument {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    /// URI of the published product image, if one was supplied.
    #[serde(
        default,
        rename = "image",
        deserialize_with = "lenient_uri",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_reference: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub attributes: Vec<Attribute>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "MetadataProperties::is_empty"
    )]
    pub properties: MetadataProperties,
}

/// A single `{trait_type, value}` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataProperties {
    #[serde(default, deserialize_with = "lenient_list")]
    pub files: Vec<MetadataFile>,
}

impl MetadataProperties {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFile {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub uri: String,
}

impl MetadataDocument {
    /// Check that no trait type appears twice.
    pub fn validate(&self) -> Result<(), CertumError> {
        let mut seen = HashSet::new();
        for attr in &self.attributes {
            if !seen.insert(attr.trait_type.as_str()) {
                return Err(CertumError::DuplicateTrait(attr.trait_type.clone()));
            }
        }
        Ok(())
    }

    /// Value of the first attribute carrying `name`, if any.
    pub fn trait_value(&self, name: TraitName) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == name.as_str())
            .map(|a| a.value.as_str())
    }

    /// Value of `name`, or its declared default when absent or blank.
    pub fn trait_or_default(&self, name: TraitName) -> String {
        self.trait_value(name)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(name.default_value())
            .to_string()
    }
}

/// Off-chain documents written by other tools sometimes carry numbers or
/// booleans as trait values; read them back as strings.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported attribute value: {other}"
        ))),
    }
}

/// Free text: strings as-is, scalars stringified, anything else empty.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_uri<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

/// The entries of a JSON array that decode as `T`; empty for non-arrays.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Traits ─────────────────────────────────────────────────────────────

/// The closed set of trait names the verifier knows how to surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraitName {
    Category,
    Serial,
}

impl TraitName {
    /// Every recognized trait, in extraction order.
    pub const ALL: [TraitName; 2] = [TraitName::Category, TraitName::Serial];

    /// The `trait_type` string as written in the metadata document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Serial => "Serial",
        }
    }

    /// Value reported when the trait is absent or metadata is unreachable.
    pub fn default_value(&self) -> &'static str {
        match self {
            Self::Category => "Unknown",
            Self::Serial => "N/A",
        }
    }
}

impl fmt::Display for TraitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Categories ─────────────────────────────────────────────────────────

/// Product categories a brand can choose from when issuing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    #[default]
    Electronics,
    Fashion,
    Luxury,
    Collectibles,
    Accessories,
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 6] = [
        Self::Electronics,
        Self::Fashion,
        Self::Luxury,
        Self::Collectibles,
        Self::Accessories,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Fashion => "Fashion",
            Self::Luxury => "Luxury",
            Self::Collectibles => "Collectibles",
            Self::Accessories => "Accessories",
            Self::Other => "Other",
        }
    }

    /// Label shown to brands.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Luxury => "Luxury Goods",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = CertumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| {
                c.as_str().eq_ignore_ascii_case(trimmed) || c.label().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| CertumError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(attrs: &[(&str, &str)]) -> MetadataDocument {
        MetadataDocument {
            name: "Widget".into(),
            description: String::new(),
            image_reference: None,
            attributes: attrs
                .iter()
                .map(|(t, v)| Attribute {
                    trait_type: t.to_string(),
                    value: v.to_string(),
                })
                .collect(),
            properties: MetadataProperties::default(),
        }
    }

    #[test]
    fn trait_lookup_first_match_wins() {
        let doc = doc_with(&[("Serial", "SH-001"), ("Serial", "SH-002")]);
        assert_eq!(doc.trait_value(TraitName::Serial), Some("SH-001"));
    }

    #[test]
    fn missing_trait_resolves_to_default() {
        let doc = doc_with(&[("Serial", "SH-001")]);
        assert_eq!(doc.trait_or_default(TraitName::Category), "Unknown");
        assert_eq!(doc_with(&[]).trait_or_default(TraitName::Serial), "N/A");
    }

    #[test]
    fn validate_rejects_duplicate_traits() {
        let doc = doc_with(&[("Serial", "a"), ("Serial", "b")]);
        assert_eq!(
            doc.validate(),
            Err(CertumError::DuplicateTrait("Serial".into()))
        );
        assert!(doc_with(&[("Serial", "a"), ("Category", "b")]).validate().is_ok());
    }

    #[test]
    fn numeric_trait_values_are_read_as_strings() {
        let json = r#"{"name":"x","attributes":[{"trait_type":"Serial","value":42}]}"#;
        let doc: MetadataDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.trait_value(TraitName::Serial), Some("42"));
    }

    #[test]
    fn blank_trait_value_resolves_to_default() {
        assert_eq!(doc_with(&[("Serial", "")]).trait_or_default(TraitName::Serial), "N/A");
        assert_eq!(
            doc_with(&[("Category", "  ")]).trait_or_default(TraitName::Category),
            "Unknown"
        );

        let json = r#"{"name":"x","attributes":[{"trait_type":"Serial","value":null}]}"#;
        let doc: MetadataDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.trait_or_default(TraitName::Serial), "N/A");
    }

    #[test]
    fn null_and_mistyped_fields_fall_back_individually() {
        let json = r#"{
            "name": "Widget",
            "description": null,
            "image": 7,
            "attributes": [
                {"trait_type": "Category", "value": {"nested": true}},
                {"trait_type": "Serial", "value": "SH-001"},
                {"value": "orphan"},
                "junk"
            ],
            "properties": null
        }"#;
        let doc: MetadataDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name, "Widget");
        assert_eq!(doc.description, "");
        assert_eq!(doc.image_reference, None);
        assert_eq!(doc.trait_or_default(TraitName::Serial), "SH-001");
        assert_eq!(doc.trait_or_default(TraitName::Category), "Unknown");
        assert!(doc.properties.is_empty());

        let doc: MetadataDocument =
            serde_json::from_str(r#"{"name":"x","attributes":null}"#).unwrap();
        assert!(doc.attributes.is_empty());
    }

    #[test]
    fn image_serializes_under_image_key() {
        let mut doc = doc_with(&[]);
        doc.image_reference = Some("ipfs://img".into());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["image"], "ipfs://img");
        assert!(value.get("properties").is_none());
    }

    #[test]
    fn category_parses_values_and_labels() {
        assert_eq!(
            "Luxury Goods".parse::<ProductCategory>().unwrap(),
            ProductCategory::Luxury
        );
        assert_eq!(
            "electronics".parse::<ProductCategory>().unwrap(),
            ProductCategory::Electronics
        );
        assert!("Groceries".parse::<ProductCategory>().is_err());
    }
}
