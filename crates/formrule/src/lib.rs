//! # formrule
//!
//! Declarative validation for loosely-typed request data. Every field is a
//! list of strings, as it comes out of a query string or a form body, and
//! every field gets an ordered list of rule tokens.
//!
//! ## Example
//!
//! ```rust,ignore
//! use formrule::prelude::*;
//!
//! let data: FieldData = [
//!     ("age".to_string(), vec!["abc".to_string()]),
//! ].into();
//! let rules = RuleSpec::from_pipes([("age", "nullable|numeric|min:1")]);
//!
//! let errors = formrule::validate(&data, &rules, [("age.numeric", "bad number")])?;
//! assert_eq!(errors.primary(), Some("bad number"));
//! ```
//!
//! ## Rule tokens
//!
//! A token is `name` or `name:param`; the parameter is everything after the
//! first `:`. In the string form tokens are joined by `|`. Rule names are
//! resolved after uppercasing their first character only, so `min` finds
//! `Min`.
//!
//! Built-in rules: `required`, `min`, `max`, `regex`, `int`, `numeric`,
//! `nullable`, `email`, `url`, `mobile`, `in`, `lt`, `lte`, `gt`, `gte`.
//!
//! ## Messages
//!
//! Overrides are keyed `"field"` (recorded under `"def"` for every failure on
//! that field) or `"field.rule"` (replaces the generated message for that
//! rule). Without overrides a failure reads `the field <field> not valid in
//! <rule>`, and a missing field reads `the param <field> not valid!`.
//!
//! ## Error Format
//!
//! [`ValidationErrors::to_api_error`] produces:
//!
//! ```json
//! {
//!   "error": {
//!     "type": "validation_error",
//!     "message": "bad number",
//!     "fields": [
//!       {"field": "age", "code": "numeric", "message": "bad number"}
//!     ]
//!   }
//! }
//! ```

mod config;
mod engine;
mod error;
mod messages;
mod registry;
pub mod rules;
mod spec;
mod util;


pub use config::RuleSet;
pub use engine::{FieldData, Validator, NULLABLE_TOKEN};
pub use error::{
    ApiValidationError, ConfigError, ErrorBody, FieldErrorResponse, ValidError, ValidationErrors,
    ValidationFailure, DEFAULT_KEY, FALLBACK_MESSAGE,
};
pub use messages::CustomMessages;
pub use registry::{FnRule, RuleRegistry, ValidationRule, NULLABLE};
pub use spec::{RuleSpec, RuleToken};

/// Validate `data` against `rules` with the built-in registry.
///
/// Pass an empty collection (for example `[("", ""); 0]`) when there are no
/// message overrides.
pub fn validate<K, V>(
    data: &FieldData,
    rules: &RuleSpec,
    messages: impl IntoIterator<Item = (K, V)>,
) -> Result<ValidationErrors, ConfigError>
where
    K: AsRef<str>,
    V: Into<String>,
{
    Validator::builtin().validate(data, rules, messages)
}

/// Validate against pipe-delimited rule strings, one per field.
pub fn validate_pipes<F, S>(
    data: &FieldData,
    rules: impl IntoIterator<Item = (F, S)>,
) -> Result<ValidationErrors, ConfigError>
where
    F: Into<String>,
    S: AsRef<str>,
{
    validate(data, &RuleSpec::from_pipes(rules), no_messages())
}

/// Validate against already-split token lists, one per field.
pub fn validate_lists<F, I, T>(
    data: &FieldData,
    rules: impl IntoIterator<Item = (F, I)>,
) -> Result<ValidationErrors, ConfigError>
where
    F: Into<String>,
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    validate(data, &RuleSpec::from_lists(rules), no_messages())
}

fn no_messages() -> [(&'static str, &'static str); 0] {
    []
}

/// Prelude module for validation
pub mod prelude {
    pub use crate::config::RuleSet;
    pub use crate::engine::{FieldData, Validator};
    pub use crate::error::{ConfigError, ValidError, ValidationErrors, ValidationFailure};
    pub use crate::registry::{FnRule, RuleRegistry, ValidationRule};
    pub use crate::spec::RuleSpec;
}
