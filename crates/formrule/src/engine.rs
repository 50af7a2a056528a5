//! The validation engine.
//!
//! One call to [`Validator::validate`] runs three steps:
//!
//! 1. presence check: every field named by the rules must be in the data
//!    unless it is marked `nullable`; if any is missing, the run stops there;
//! 2. message overrides are resolved against the data and the registry;
//! 3. each field's rules run in declaration order and failures are recorded.

use crate::error::{ConfigError, ValidationErrors, DEFAULT_KEY};
use crate::messages::CustomMessages;
use crate::registry::{RuleRegistry, NULLABLE};
use crate::spec::{RuleSpec, RuleToken};
use crate::util::{all_empty, contains_token};
use std::collections::HashMap;

/// The data under test: field name to its values.
pub type FieldData = HashMap<String, Vec<String>>;

/// Token that makes a field optional.
pub const NULLABLE_TOKEN: &str = "nullable";

/// Runs rule specifications against field data using a [`RuleRegistry`].
///
/// The validator only borrows the registry; each call to
/// [`validate`](Self::validate) builds and drops its own state.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r RuleRegistry,
}

impl Validator<'static> {
    /// A validator backed by the built-in rules.
    pub fn builtin() -> Self {
        Self::new(RuleRegistry::builtin())
    }
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r RuleRegistry {
        self.registry
    }

    /// Validate `data` against `rules`, with optional `messages` overrides
    /// (pass an empty collection for none).
    ///
    /// Returns `Err` only for a broken setup: an empty rule specification or
    /// a rule name the registry does not know. Data problems are reported in
    /// the returned [`ValidationErrors`], whose
    /// [`primary`](ValidationErrors::primary) is the single surfaced error.
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// use formrule::{RuleSpec, Validator};
    ///
    /// let data = [("age".to_string(), vec!["abc".to_string()])].into();
    /// let rules = RuleSpec::from_pipes([("age", "numeric")]);
    /// let errors = Validator::builtin().validate(&data, &rules, [("age", "age must be numeric")])?;
    /// assert_eq!(errors.primary(), Some("age must be numeric"));
    /// ```
    pub fn validate<K, V>(
        &self,
        data: &FieldData,
        rules: &RuleSpec,
        messages: impl IntoIterator<Item = (K, V)>,
    ) -> Result<ValidationErrors, ConfigError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let _span = tracing::debug_span!("validate", fields = rules.len()).entered();

        let mut run = Run {
            registry: self.registry,
            data,
            messages: CustomMessages::new(),
            errors: ValidationErrors::new(),
        };

        if !run.check_presence(rules)? {
            tracing::debug!(missing = run.errors.len(), "required fields are missing");
            return Ok(run.errors);
        }

        run.messages = CustomMessages::build(messages, data, self.registry);

        for (field, tokens) in rules.iter() {
            run.check_field(field, tokens)?;
        }

        tracing::debug!(failed = run.errors.len(), "validation finished");
        Ok(run.errors)
    }
}

/// State of a single validation run.
struct Run<'a> {
    registry: &'a RuleRegistry,
    data: &'a FieldData,
    messages: CustomMessages,
    errors: ValidationErrors,
}

impl Run<'_> {
    /// Record a `"def"` error for every absent, non-nullable field. Returns
    /// whether all fields were present.
    fn check_presence(&mut self, rules: &RuleSpec) -> Result<bool, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyRules);
        }

        for (field, tokens) in rules.iter() {
            if !self.data.contains_key(field) && !contains_token(tokens, NULLABLE_TOKEN) {
                self.errors.insert(
                    field,
                    DEFAULT_KEY,
                    format!("the param {field} not valid!"),
                );
            }
        }

        Ok(self.errors.is_empty())
    }

    fn check_field(&mut self, field: &str, tokens: &[String]) -> Result<(), ConfigError> {
        let verifiable = self.is_verifiable(field, tokens);
        let values = self.data.get(field).map(Vec::as_slice).unwrap_or_default();

        for token in tokens {
            let RuleToken { name, param } = RuleToken::parse(token);
            let (key, rule) = self
                .registry
                .resolve(name)
                .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))?;

            if !verifiable {
                tracing::trace!(field, rule = name, "skipping rule for empty nullable field");
                continue;
            }
            if key == NULLABLE {
                continue;
            }

            tracing::trace!(field, rule = key, param, "dispatching rule");
            if !rule.validate(values, param) {
                tracing::debug!(field, rule = name, "rule failed");
                self.record_failure(field, name);
            }
        }

        Ok(())
    }

    /// A `nullable` field is only checked when it is present and has at
    /// least one non-empty value.
    fn is_verifiable(&self, field: &str, tokens: &[String]) -> bool {
        if !contains_token(tokens, NULLABLE_TOKEN) {
            return true;
        }
        self.data
            .get(field)
            .map_or(false, |values| !all_empty(values))
    }

    /// The field-wide override, when present, is recorded under `"def"` on
    /// every failure; the rule key always gets its own override or the
    /// generated message.
    fn record_failure(&mut self, field: &str, rule: &str) {
        if let Some(message) = self.messages.default_message(field) {
            self.errors.insert(field, DEFAULT_KEY, message);
        }

        match self.messages.message(field, rule) {
            Some(message) => self.errors.insert(field, rule, message),
            None => self.errors.insert(
                field,
                rule,
                format!("the field {field} not valid in {rule}"),
            ),
        }
    }
}
