use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Opaque item key shared by both sources. Upstream emits numbers or strings;
/// `1` and `"1"` are distinct keys, while `1` and `1.0` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(Number),
    Text(String),
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(ItemId::Number(integral(n))),
            Value::String(s) => Ok(ItemId::Text(s)),
            other => Err(D::Error::custom(format!(
                "item key must be a number or a string, got {other}"
            ))),
        }
    }
}

/// Floats with no fractional part compare equal to the matching integer.
fn integral(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 => {
            if (0.0..18_446_744_073_709_551_616.0).contains(&f) {
                Number::from(f as u64)
            } else if f >= i64::MIN as f64 && f < 0.0 {
                Number::from(f as i64)
            } else {
                n
            }
        }
        _ => n,
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        ItemId::Number(Number::from(value))
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId::Text(value.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        ItemId::Text(value)
    }
}

/// An item from the general feed. Never carries a usable URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(rename = "surveyId", alias = "itemId")]
    pub item_id: ItemId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_type: Option<String>,
}

impl CatalogEntry {
    pub fn new(item_id: impl Into<ItemId>, name: &str, description: &str) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.to_owned(),
            description: description.to_owned(),
            start_date: None,
            end_date: None,
            survey_type: None,
        }
    }
}

/// Per-user access record. Fields this crate does not know about are kept in
/// `extra` and written back untouched on persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrantEntry {
    #[serde(rename = "surveyId", alias = "itemId")]
    pub item_id: ItemId,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GrantEntry {
    pub fn new(item_id: impl Into<ItemId>, url: &str) -> Self {
        Self {
            item_id: item_id.into(),
            url: url.to_owned(),
            extra: Map::new(),
        }
    }
}

/// Join of a catalog entry and the grant sharing its key. Derived on demand.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VisibleItem {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub url: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub survey_type: Option<String>,
}

impl VisibleItem {
    pub fn from_parts(entry: &CatalogEntry, url: &str) -> Self {
        Self {
            item_id: entry.item_id.clone(),
            name: entry.name.clone(),
            description: entry.description.clone(),
            url: url.to_owned(),
            start_date: entry.start_date.clone(),
            end_date: entry.end_date.clone(),
            survey_type: entry.survey_type.clone(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
