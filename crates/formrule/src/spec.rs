//! Rule specifications: which rules apply to which field.
//!
//! Rules arrive either as one pipe-delimited string per field
//! (`"nullable|min:1"`) or as an already-split list per field. Both are
//! normalized into a [`RuleSpec`]: field name to ordered token list, fields
//! kept in the order the caller supplied them.

use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between tokens in the string form.
pub const RULE_SEPARATOR: char = '|';

/// Separator between a rule name and its parameter.
pub const PARAM_SEPARATOR: char = ':';

/// A parsed rule token: `name` or `name:param`.
///
/// Only the first `:` separates; the parameter keeps any later colons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleToken<'a> {
    /// Rule name as written, before any case folding
    pub name: &'a str,
    /// Text after the first `:`, empty when absent
    pub param: &'a str,
}

impl<'a> RuleToken<'a> {
    pub fn parse(token: &'a str) -> Self {
        match token.split_once(PARAM_SEPARATOR) {
            Some((name, param)) => Self { name, param },
            None => Self {
                name: token,
                param: "",
            },
        }
    }
}

/// Canonical rule specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleSpec {
    fields: IndexMap<String, Vec<String>>,
}

impl RuleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-split token lists.
    ///
    /// ```rust,ignore
    /// let rules = RuleSpec::from_lists([("hello", vec!["min:1", r"regex:^\w$"])]);
    /// ```
    pub fn from_lists<K, I, T>(fields: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(field, tokens)| (field.into(), tokens.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Build from pipe-delimited strings, one per field.
    ///
    /// ```rust,ignore
    /// let rules = RuleSpec::from_pipes([("age", "nullable|min:1")]);
    /// ```
    pub fn from_pipes<K, S>(fields: impl IntoIterator<Item = (K, S)>) -> Self
    where
        K: Into<String>,
        S: AsRef<str>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(field, rules)| (field.into(), split_pipes(rules.as_ref())))
                .collect(),
        }
    }

    /// Build from a dynamically-typed value: an object whose values are each
    /// a pipe-delimited string or an array of strings.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let object = value.as_object().ok_or(ConfigError::NotAMapping)?;
        let mut spec = Self::new();
        for (field, rules) in object {
            let tokens = match rules {
                serde_json::Value::String(rules) => split_pipes(rules),
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| ConfigError::UnsupportedRuleShape {
                        field: field.clone(),
                    })?,
                _ => {
                    return Err(ConfigError::UnsupportedRuleShape {
                        field: field.clone(),
                    })
                }
            };
            spec.fields.insert(field.clone(), tokens);
        }
        Ok(spec)
    }

    /// Set the tokens for one field, keeping its position if already present.
    pub fn insert<I, T>(&mut self, field: impl Into<String>, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.fields
            .insert(field.into(), tokens.into_iter().map(Into::into).collect());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Iterate over fields and their tokens in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, tokens)| (field.as_str(), tokens.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn split_pipes(rules: &str) -> Vec<String> {
    rules.split(RULE_SEPARATOR).map(str::to_string).collect()
}

/// One field's rules as they may appear in a document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRules {
    Pipes(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleSpecVisitor;

        impl<'de> Visitor<'de> for RuleSpecVisitor {
            type Value = RuleSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to a rule string or a list of rule strings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RuleSpec, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut spec = RuleSpec::new();
                while let Some(field) = map.next_key::<String>()? {
                    let tokens = match map.next_value::<RawRules>() {
                        Ok(RawRules::Pipes(rules)) => split_pipes(&rules),
                        Ok(RawRules::List(tokens)) => tokens,
                        Err(_) => {
                            return Err(de::Error::custom(format!(
                                "the rules for field `{field}` must be a string or a list of strings"
                            )))
                        }
                    };
                    spec.fields.insert(field, tokens);
                }
                Ok(spec)
            }
        }

        deserializer.deserialize_map(RuleSpecVisitor)
    }
}
