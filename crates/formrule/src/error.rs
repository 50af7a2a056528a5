//! Error types and the validation report.
//!
//! Two kinds of failure never mix:
//!
//! - [`ConfigError`] means the caller's setup is broken (no rules, an unknown
//!   rule name, a rule value that is neither a string nor a list). It is
//!   returned as `Err` and nothing is reported about the data.
//! - [`ValidationErrors`] is the report about the data itself: one
//!   [`ValidError`] per failing field.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error key used for field-wide messages: missing-field errors and `"field"`
/// overrides are both recorded under it.
pub const DEFAULT_KEY: &str = "def";

/// Primary message used when a report entry carries no message at all.
pub const FALLBACK_MESSAGE: &str = "missing valid error";

/// A broken validation setup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rule specification has no fields.
    #[error("the rule specification is empty")]
    EmptyRules,

    /// The rules were not a mapping from field name to rules.
    #[error("the rules only support a map of field to rule string or rule list")]
    NotAMapping,

    /// A field's rules were neither a pipe-delimited string nor a list of strings.
    #[error("the rules for field `{field}` must be a string or a list of strings")]
    UnsupportedRuleShape { field: String },

    /// A rule token names a rule the registry does not know.
    #[error("the valid rule `{0}` does not exist")]
    UnknownRule(String),

    /// A rule-set document could not be parsed.
    #[error("invalid rule-set document: {0}")]
    Document(#[from] serde_json::Error),

    /// A rule-set document could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All errors recorded for a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidError {
    /// The field that failed validation
    pub field: String,
    /// Error key (`"def"` or a rule name) to resolved message, in recording order
    pub errors: IndexMap<String, String>,
}

impl ValidError {
    /// Create an entry with no errors yet.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            errors: IndexMap::new(),
        }
    }

    /// Message recorded under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// The message this entry surfaces: its `"def"` message when present,
    /// otherwise the first one recorded.
    pub fn primary(&self) -> Option<&str> {
        self.get(DEFAULT_KEY)
            .or_else(|| self.errors.values().next().map(String::as_str))
    }
}

/// The report of one validation run.
///
/// Entries are ordered by first failure and deduplicated by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    entries: Vec<ValidError>,
}

impl ValidationErrors {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` under `key` for `field`.
    ///
    /// The field's existing entry is reused; a key recorded twice keeps its
    /// position and takes the newer message.
    pub fn insert(
        &mut self,
        field: &str,
        key: impl Into<String>,
        message: impl Into<String>,
    ) {
        let (key, message) = (key.into(), message.into());
        match self.entries.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => {
                entry.errors.insert(key, message);
            }
            None => {
                let mut entry = ValidError::new(field);
                entry.errors.insert(key, message);
                self.entries.push(entry);
            }
        }
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the entry for a specific field.
    pub fn get(&self, field: &str) -> Option<&ValidError> {
        self.entries.iter().find(|entry| entry.field == field)
    }

    /// Iterate over the entries in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidError> {
        self.entries.iter()
    }

    /// Get all field names with errors, in report order.
    pub fn field_names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.field.as_str()).collect()
    }

    /// The single error message surfaced for the whole run.
    ///
    /// Taken from the first entry: its `"def"` message, or else its first
    /// recorded message. `None` when validation passed.
    pub fn primary(&self) -> Option<&str> {
        self.entries
            .first()
            .map(|entry| entry.primary().unwrap_or(FALLBACK_MESSAGE))
    }

    /// Convert to Result - Ok if no errors, Err otherwise.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        match self.primary().map(str::to_string) {
            None => Ok(()),
            Some(message) => Err(ValidationFailure {
                message,
                errors: self,
            }),
        }
    }

    /// Convert to the standard API error format, one field error per
    /// recorded key.
    pub fn to_api_error(&self) -> ApiValidationError {
        let fields = self
            .entries
            .iter()
            .flat_map(|entry| {
                entry
                    .errors
                    .iter()
                    .map(move |(code, message)| FieldErrorResponse {
                        field: entry.field.clone(),
                        code: code.clone(),
                        message: message.clone(),
                    })
            })
            .collect();

        ApiValidationError {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: self.primary().unwrap_or("Validation failed").to_string(),
                fields,
            },
        }
    }
}

/// Entries repeating a field are merged into the first one, as
/// [`ValidationErrors::insert`] would.
impl<'de> Deserialize<'de> for ValidationErrors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut errors = Self::new();
        for entry in Vec::<ValidError>::deserialize(deserializer)? {
            for (key, message) in entry.errors {
                errors.insert(&entry.field, key, message);
            }
        }
        Ok(errors)
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidError;
    type IntoIter = std::slice::Iter<'a, ValidError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} field error(s)", self.len())
    }
}

/// A failed validation run, surfaced as a single error message while keeping
/// the full report.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    message: String,
    errors: ValidationErrors,
}

impl ValidationFailure {
    /// The primary error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The full report.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

/// API response format for validation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiValidationError {
    pub error: ErrorBody,
}

/// Error body in API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    pub fields: Vec<FieldErrorResponse>,
}

/// Single field error in API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub code: String,
    pub message: String,
}
