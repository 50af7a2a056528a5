//! Name-addressed rule registry.
//!
//! The engine never knows what a rule does. It resolves the rule name from a
//! token, looks it up here and calls [`ValidationRule::validate`] with the
//! field's values and the token's parameter.

use crate::rules::{
    EmailRule, GtRule, GteRule, InRule, IntRule, LtRule, LteRule, MaxRule, MinRule, MobileRule,
    NullableRule, NumericRule, RegexRule, RequiredRule, UrlRule,
};
use crate::util::{lcfirst, ucfirst};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Registry key of the rule that marks a field as optional.
pub const NULLABLE: &str = "Nullable";

static BUILTIN: OnceLock<RuleRegistry> = OnceLock::new();

/// A predicate over all values of one field.
///
/// ## Example
///
/// ```rust,ignore
/// use formrule::{RuleRegistry, ValidationRule};
///
/// #[derive(Debug)]
/// struct EvenRule;
///
/// impl ValidationRule for EvenRule {
///     fn validate(&self, values: &[String], _param: &str) -> bool {
///         values.iter().all(|v| v.parse::<i64>().map_or(false, |n| n % 2 == 0))
///     }
///
///     fn rule_name(&self) -> &'static str {
///         "Even"
///     }
/// }
///
/// let registry = RuleRegistry::with_builtins().register(EvenRule);
/// ```
pub trait ValidationRule: fmt::Debug + Send + Sync {
    /// Check the field's values against this rule. `param` is the text after
    /// the first `:` of the rule token, or empty.
    fn validate(&self, values: &[String], param: &str) -> bool;

    /// Registry key. Tokens reach it after their first character is
    /// uppercased, so keys should start with an uppercase letter.
    fn rule_name(&self) -> &'static str;
}

/// A rule backed by a plain function or closure.
pub struct FnRule<F> {
    name: &'static str,
    check: F,
}

impl<F> FnRule<F>
where
    F: Fn(&[String], &str) -> bool + Send + Sync,
{
    pub fn new(name: &'static str, check: F) -> Self {
        Self { name, check }
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("name", &self.name).finish()
    }
}

impl<F> ValidationRule for FnRule<F>
where
    F: Fn(&[String], &str) -> bool + Send + Sync,
{
    fn validate(&self, values: &[String], param: &str) -> bool {
        (self.check)(values, param)
    }

    fn rule_name(&self) -> &'static str {
        self.name
    }
}

/// Immutable mapping from rule name to rule.
///
/// Built by chaining [`register`](Self::register) and never changed after
/// that; share it by reference across threads.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: HashMap<&'static str, Box<dyn ValidationRule>>,
}

impl RuleRegistry {
    /// A registry with no rules at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fresh registry holding the built-in rules, ready to be extended.
    pub fn with_builtins() -> Self {
        Self::empty()
            .register(RequiredRule)
            .register(MinRule)
            .register(MaxRule)
            .register(RegexRule)
            .register(IntRule)
            .register(NumericRule)
            .register(NullableRule)
            .register(EmailRule)
            .register(UrlRule)
            .register(MobileRule)
            .register(InRule)
            .register(LtRule)
            .register(LteRule)
            .register(GtRule)
            .register(GteRule)
    }

    /// The process-wide built-in registry.
    pub fn builtin() -> &'static RuleRegistry {
        BUILTIN.get_or_init(Self::with_builtins)
    }

    /// Add a rule under its [`rule_name`](ValidationRule::rule_name),
    /// replacing any rule already registered under that name.
    pub fn register(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.insert(rule.rule_name(), Box::new(rule));
        self
    }

    /// Exact-key lookup, no case folding.
    pub fn get(&self, key: &str) -> Option<&dyn ValidationRule> {
        self.rules.get(key).map(|rule| &**rule)
    }

    /// Resolve a rule name as written in a token: only the first character
    /// is uppercased before lookup. Returns the registry key and the rule.
    pub fn resolve(&self, name: &str) -> Option<(&'static str, &dyn ValidationRule)> {
        self.rules
            .get_key_value(ucfirst(name).as_str())
            .map(|(key, rule)| (*key, &**rule))
    }

    /// Whether [`resolve`](Self::resolve) would succeed.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.rules.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Registered names paired with the lowercase-first token written in
    /// rule strings (`"Min"` is written `min`), sorted by name.
    pub fn tokens(&self) -> Vec<(String, &'static str)> {
        self.names()
            .into_iter()
            .map(|name| (lcfirst(name), name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
