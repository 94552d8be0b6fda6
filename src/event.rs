use std::collections::BTreeMap;
use std::fs;
use std::ops::Index;
use std::path::Path;

use anyhow::Context;
use log::info;
use serde::Deserialize;

/// A run request: a flat mapping of field name to string value.
///
/// Field sets vary per pipeline and, for oncoanalyser, per mode. Keys are
/// kept ordered so listings in error messages are deterministic.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Event {
    fields: BTreeMap<String, String>,
}

impl Event {
    /// Read a single JSON event from disk
    pub fn from_path(path: &Path) -> anyhow::Result<Event> {
        info!("Reading event at {}", path.display());
        let json_string = fs::read_to_string(path)
            .with_context(|| format!("Can't read event at path {}", path.display()))?;
        serde_json::from_str(&json_string)
            .with_context(|| format!("Can't parse event JSON at path {}", path.display()))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Field names present in the event, in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_default()
    }
}

/// Direct field access for handlers running after validation, which
/// guarantees presence of every required field.
impl Index<&str> for Event {
    type Output = str;

    fn index(&self, field: &str) -> &str {
        &self.fields[field]
    }
}

#[cfg(test)]
impl<const N: usize> From<[(&str, &str); N]> for Event {
    fn from(pairs: [(&str, &str); N]) -> Event {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
impl<'a> FromIterator<(&'a str, &'a str)> for Event {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(pairs: I) -> Event {
        Event {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
