//! Rule-set documents.
//!
//! A rule set bundles a rule specification with its message overrides so it
//! can live in a JSON file next to the code that uses it:
//!
//! ```json
//! {
//!   "rules": { "age": "nullable|min:1", "name": ["required", "max:20"] },
//!   "messages": { "age": "age must be a number", "name.required": "name please" }
//! }
//! ```

use crate::engine::{FieldData, Validator};
use crate::error::{ConfigError, ValidationErrors};
use crate::spec::RuleSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Rules plus message overrides, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Field name to pipe-delimited string or token list
    pub rules: RuleSpec,
    /// Override key (`"field"` or `"field.rule"`) to message
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub messages: HashMap<String, String>,
}

impl RuleSet {
    pub fn new(rules: RuleSpec) -> Self {
        Self {
            rules,
            messages: HashMap::new(),
        }
    }

    /// Add a message override.
    pub fn message(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded rule set");
        Self::from_json_str(&json)
    }

    /// Validate `data` with this rule set.
    pub fn validate(
        &self,
        validator: &Validator<'_>,
        data: &FieldData,
    ) -> Result<ValidationErrors, ConfigError> {
        validator.validate(data, &self.rules, &self.messages)
    }
}
