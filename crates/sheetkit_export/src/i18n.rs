//! Localization lookup capability and a JSON-backed message catalog.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::spec::ExportError;

/// Localization service: look up `key`, falling back to `default`.
pub trait Translate {
    /// Localized string for `key`, or `default` when the catalog has no entry.
    fn translate(&self, key: &str, default: &str) -> String;
}

/// Translator that always returns the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslate;

impl Translate for NoTranslate {
    fn translate(&self, _key: &str, default: &str) -> String {
        default.to_string()
    }
}

/// Flat catalog of dotted message keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecI18nCatalog {
    dict_messages: BTreeMap<String, String>,
}

impl SpecI18nCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a nested JSON message document; nested objects become dotted keys.
    ///
    /// Non-string leaves are ignored.
    pub fn from_json_str(content: &str) -> Result<Self, ExportError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|err| ExportError::Catalog(format!("Failed to parse JSON catalog: {err}")))?;

        let mut catalog = Self::new();
        flatten_json(&json, String::new(), &mut catalog.dict_messages);
        debug!(n_messages = catalog.len(), "loaded i18n catalog");
        Ok(catalog)
    }

    /// Read and parse a JSON message file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            ExportError::Catalog(format!("Failed to read {}: {err}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    /// Add or replace one message.
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.dict_messages.insert(key.into(), message.into());
    }

    /// Message stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.dict_messages.get(key).map(String::as_str)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.dict_messages.len()
    }

    /// Whether the catalog holds no messages.
    pub fn is_empty(&self) -> bool {
        self.dict_messages.is_empty()
    }
}

impl Translate for SpecI18nCatalog {
    fn translate(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }
}

fn flatten_json(value: &Value, prefix: String, result: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let c_prefix_next = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_json(val, c_prefix_next, result);
            }
        }
        Value::String(s) => {
            result.insert(prefix, s.clone());
        }
        _ => {}
    }
}
