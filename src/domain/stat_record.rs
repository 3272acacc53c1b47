use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl StatValue {
    /// Interprets a trimmed cell. Empty cells are missing, numeric-looking
    /// cells (`31`, `.512`, `1,024`, `-2.5`) become numbers, anything else
    /// is kept as text.
    pub fn from_cell(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let looks_numeric = text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+'))
            && text.chars().any(|c| c.is_ascii_digit());
        if looks_numeric {
            let plain = text.replace(',', "");
            if let Ok(value) = plain.parse::<i64>() {
                return Some(Self::Integer(value));
            }
            if let Ok(value) = plain.parse::<f64>() {
                return Some(Self::Float(value));
            }
        }

        Some(Self::Text(text.to_string()))
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Normalized statistics for one player, team or game row.
///
/// A key mapped to `None` means the source cell was present but empty; it
/// serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatRecord {
    fields: BTreeMap<String, Option<StatValue>>,
}

impl StatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<StatValue>) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Option<StatValue>> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drops every key whose value is missing.
    pub fn without_missing(mut self) -> Self {
        self.fields.retain(|_, value| value.is_some());
        self
    }
}
