//! Custom message overrides.
//!
//! Callers supply a flat map whose keys are either `"field"` (a message for
//! every failure on that field) or `"field.rule"` (a message for one rule).
//! [`CustomMessages::build`] turns it into a per-field table keyed by
//! [`DEFAULT_KEY`] or rule name, dropping keys that name an unknown field or
//! rule.

use crate::engine::FieldData;
use crate::error::DEFAULT_KEY;
use crate::registry::RuleRegistry;
use std::collections::HashMap;

/// Separator between field and rule name in an override key.
pub const KEY_SEPARATOR: char = '.';

/// Per-field override messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomMessages {
    fields: HashMap<String, HashMap<String, String>>,
}

impl CustomMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from raw override keys.
    ///
    /// A key is only kept when its field is present in `data`; a
    /// `"field.rule"` key additionally needs a rule name that resolves in
    /// `registry`. Rule-specific messages stay keyed by the rule name as
    /// written, which is how failures look them up.
    pub fn build<K, V>(
        overrides: impl IntoIterator<Item = (K, V)>,
        data: &FieldData,
        registry: &RuleRegistry,
    ) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (key, message) in overrides {
            let key = key.as_ref();
            // `field.rule`; anything after a second separator is ignored
            let mut parts = key.split(KEY_SEPARATOR);
            let field = parts.next().unwrap_or(key);
            let rule = parts.next();

            if !data.contains_key(field) {
                tracing::debug!(key, "ignoring message override for a field not in the data");
                continue;
            }

            match rule {
                Some(rule) if registry.contains(rule) => table.insert(field, rule, message),
                Some(rule) => {
                    tracing::debug!(key, rule, "ignoring message override for an unknown rule");
                }
                None => table.insert(field, DEFAULT_KEY, message),
            }
        }
        table
    }

    fn insert(&mut self, field: &str, key: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .insert(key.to_string(), message.into());
    }

    /// All overrides registered for `field`.
    pub fn get(&self, field: &str) -> Option<&HashMap<String, String>> {
        self.fields.get(field)
    }

    /// The field-wide override, if any.
    pub fn default_message(&self, field: &str) -> Option<&str> {
        self.message(field, DEFAULT_KEY)
    }

    pub fn message(&self, field: &str, key: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
