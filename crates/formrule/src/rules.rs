//! Built-in validation rules.
//!
//! Every rule sees all values of a field. Unless noted otherwise a rule
//! passes only when each value passes, so an empty value list passes.

use crate::registry::{ValidationRule, NULLABLE};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static MOBILE_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified email regex
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
        ).expect("email pattern is valid")
    })
}

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| {
        Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").expect("url pattern is valid")
    })
}

fn mobile_regex() -> &'static Regex {
    MOBILE_REGEX.get_or_init(|| Regex::new(r"^1[3-9][0-9]{9}$").expect("mobile pattern is valid"))
}

/// Patterns compiled for `regex:` rules, keyed by pattern text.
static PATTERN_CACHE: OnceLock<RwLock<HashMap<String, Regex>>> = OnceLock::new();

/// Cached patterns before the cache is cleared.
const PATTERN_CACHE_LIMIT: usize = 128;

fn cached_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let cache = PATTERN_CACHE.get_or_init(Default::default);
    if let Some(regex) = cache.read().ok().and_then(|c| c.get(pattern).cloned()) {
        return Ok(regex);
    }

    let regex = Regex::new(pattern)?;
    if let Ok(mut cache) = cache.write() {
        if cache.len() >= PATTERN_CACHE_LIMIT {
            cache.clear();
        }
        cache.insert(pattern.to_string(), regex.clone());
    }
    Ok(regex)
}

/// Finite number, no trimming.
fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_bound(rule: &'static str, param: &str) -> Option<f64> {
    let bound = parse_number(param);
    if bound.is_none() {
        tracing::warn!(rule, param, "rule parameter is not a number");
    }
    bound
}

/// Numeric values are compared by value, anything else by character count.
fn measure(value: &str) -> f64 {
    parse_number(value).unwrap_or_else(|| value.chars().count() as f64)
}

fn compare_all(
    rule: &'static str,
    values: &[String],
    param: &str,
    cmp: impl Fn(f64, f64) -> bool,
) -> bool {
    let Some(bound) = parse_bound(rule, param) else {
        return false;
    };
    values
        .iter()
        .all(|value| parse_number(value).map_or(false, |n| cmp(n, bound)))
}

/// Required: at least one value, none of them blank.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredRule;

impl ValidationRule for RequiredRule {
    fn validate(&self, values: &[String], _param: &str) -> bool {
        !values.is_empty() && values.iter().all(|value| !value.trim().is_empty())
    }

    fn rule_name(&self) -> &'static str {
        "Required"
    }
}

/// Lower bound on the value, or on the length for non-numeric values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinRule;

impl ValidationRule for MinRule {
    fn validate(&self, values: &[String], param: &str) -> bool {
        let Some(min) = parse_bound("Min", param) else {
            return false;
        };
        values.iter().all(|value| measure(value) >= min)
    }

    fn rule_name(&self) -> &'static str {
        "Min"
    }
}

/// Upper bound on the value, or on the length for non-numeric values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxRule;

impl ValidationRule for MaxRule {
    fn validate(&self, values: &[String], param: &str) -> bool {
        let Some(max) = parse_bound("Max", param) else {
            return false;
        };
        values.iter().all(|value| measure(value) <= max)
    }

    fn rule_name(&self) -> &'static str {
        "Max"
    }
}

/// Every value matches the pattern given as parameter.
///
/// Compiled patterns are cached process-wide; an invalid pattern fails the
/// rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexRule;

impl ValidationRule for RegexRule {
    fn validate(&self, values: &[String], param: &str) -> bool {
        match cached_pattern(param) {
            Ok(regex) => values.iter().all(|value| regex.is_match(value)),
            Err(error) => {
                tracing::warn!(pattern = param, %error, "invalid regex rule pattern");
                false
            }
        }
    }

    fn rule_name(&self) -> &'static str {
        "Regex"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntRule;

impl ValidationRule for IntRule {
    fn validate(&self, values: &[String], _param: &str) -> bool {
        values.iter().all(|value| value.parse::<i64>().is_ok())
    }

    fn rule_name(&self) -> &'static str {
        "Int"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumericRule;

impl ValidationRule for NumericRule {
    fn validate(&self, values: &[String], _param: &str) -> bool {
        values.iter().all(|value| parse_number(value).is_some())
    }

    fn rule_name(&self) -> &'static str {
        "Numeric"
    }
}

/// Marks a field as optional. The engine consumes it and never calls it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableRule;

impl ValidationRule for NullableRule {
    fn validate(&self, _values: &[String], _param: &str) -> bool {
        true
    }

    fn rule_name(&self) -> &'static str {
        NULLABLE
    }
}

/// Email format validation rule.
///
/// Validates that every value is a valid email address according to RFC 5322.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailRule;

impl ValidationRule for EmailRule {
    fn validate(&self, values: &[String], _param: &str) -> bool {
        values.iter().all(|value| email_regex().is_match(value))
    }

    fn rule_name(&self) -> &'static str {
        "Email"
    }
}

/// URL format validation rule (`http`, `https` or `ftp`).
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlRule;

impl ValidationRule for UrlRule {
    fn validate(&self, values: &[String], _param: &str) -> bool {
        values.iter().all(|value| url_regex().is_match(value))
    }

    fn rule_name(&self) -> &'static str {
        "Url"
    }
}

/// Mainland-China mobile number: 11 digits starting with `13`..`19`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobileRule;

impl ValidationRule for MobileRule {
    fn validate(&self, values: &[String], _param: &str) -> bool {
        values.iter().all(|value| mobile_regex().is_match(value))
    }

    fn rule_name(&self) -> &'static str {
        "Mobile"
    }
}

/// Every value is one of the comma-separated items of the parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct InRule;

impl ValidationRule for InRule {
    fn validate(&self, values: &[String], param: &str) -> bool {
        values
            .iter()
            .all(|value| param.split(',').any(|allowed| allowed == value))
    }

    fn rule_name(&self) -> &'static str {
        "In"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LtRule;

impl ValidationRule for LtRule {
    fn validate(&self, values: &[String], param: &str) -> bool {
        compare_all("Lt", values, param, |n, bound| n < bound)
    }

    fn rule_name(&self) -> &'static str {
        "Lt"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LteRule;

impl ValidationRule for LteRule {
    fn validate(&self, values: &[String], param: &str) -> bool {
        compare_all("Lte", values, param, |n, bound| n <= bound)
    }

    fn rule_name(&self) -> &'static str {
        "Lte"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GtRule;

impl ValidationRule for GtRule {
    fn validate(&self, values: &[String], param: &str) -> bool {
        compare_all("Gt", values, param, |n, bound| n > bound)
    }

    fn rule_name(&self) -> &'static str {
        "Gt"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GteRule;

impl ValidationRule for GteRule {
    fn validate(&self, values: &[String], param: &str) -> bool {
        compare_all("Gte", values, param, |n, bound| n >= bound)
    }

    fn rule_name(&self) -> &'static str {
        "Gte"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn required_rule() {
        let rule = RequiredRule;
        assert!(rule.validate(&vals(&["value"]), ""));
        assert!(rule.validate(&vals(&["  value  ", "x"]), ""));
        assert!(!rule.validate(&vals(&[]), ""));
        assert!(!rule.validate(&vals(&[""]), ""));
        assert!(!rule.validate(&vals(&["ok", "   "]), ""));
    }

    #[test]
    fn min_rule_numeric_and_length() {
        let rule = MinRule;
        assert!(rule.validate(&vals(&["2"]), "1"));
        assert!(rule.validate(&vals(&["1"]), "1"));
        assert!(!rule.validate(&vals(&["0.5"]), "1"));
        // length for non-numeric values
        assert!(rule.validate(&vals(&["abc"]), "3"));
        assert!(!rule.validate(&vals(&["ab"]), "3"));
        assert!(!rule.validate(&vals(&["2"]), "one"));
    }

    #[test]
    fn max_rule_numeric_and_length() {
        let rule = MaxRule;
        assert!(rule.validate(&vals(&["10"]), "10"));
        assert!(!rule.validate(&vals(&["11"]), "10"));
        assert!(rule.validate(&vals(&["héllo"]), "5"));
        assert!(!rule.validate(&vals(&["héllo!"]), "5"));
    }

    #[test]
    fn regex_rule() {
        let rule = RegexRule;
        assert!(rule.validate(&vals(&["2"]), r"^\w$"));
        assert!(!rule.validate(&vals(&["22"]), r"^\w$"));
        assert!(rule.validate(&vals(&["123-4567"]), r"^\d{3}-\d{4}$"));
        assert!(!rule.validate(&vals(&["a"]), "("));
    }

    #[test]
    fn regex_patterns_are_compiled_once() {
        let pattern = r"^cached-[a-z]+$";
        assert!(RegexRule.validate(&vals(&["cached-abc"]), pattern));
        let first = cached_pattern(pattern).unwrap();
        assert!(!RegexRule.validate(&vals(&["cached-123"]), pattern));

        let cache = PATTERN_CACHE.get().unwrap().read().unwrap();
        assert!(cache.contains_key(pattern));
        assert_eq!(first.as_str(), pattern);
        assert!(!cache.contains_key("("));
    }

    #[test]
    fn int_and_numeric_rules() {
        assert!(IntRule.validate(&vals(&["-12", "7"]), ""));
        assert!(!IntRule.validate(&vals(&["1.5"]), ""));
        assert!(NumericRule.validate(&vals(&["1.5", "-3", "1e3"]), ""));
        assert!(!NumericRule.validate(&vals(&["abc"]), ""));
        assert!(!NumericRule.validate(&vals(&["NaN"]), ""));
        assert!(!NumericRule.validate(&vals(&[" 1"]), ""));
    }

    #[test]
    fn email_rule() {
        assert!(EmailRule.validate(&vals(&["test@example.com"]), ""));
        assert!(EmailRule.validate(&vals(&["user.name+tag@domain.co.uk"]), ""));
        assert!(!EmailRule.validate(&vals(&["invalid"]), ""));
        assert!(!EmailRule.validate(&vals(&["@domain.com"]), ""));
        assert!(!EmailRule.validate(&vals(&["user@"]), ""));
    }

    #[test]
    fn url_rule() {
        assert!(UrlRule.validate(&vals(&["https://example.com"]), ""));
        assert!(UrlRule.validate(&vals(&["http://example.com/path?query=1"]), ""));
        assert!(!UrlRule.validate(&vals(&["not-a-url"]), ""));
        assert!(!UrlRule.validate(&vals(&["ftp://"]), ""));
    }

    #[test]
    fn mobile_rule() {
        assert!(MobileRule.validate(&vals(&["13800138000"]), ""));
        assert!(!MobileRule.validate(&vals(&["12800138000"]), ""));
        assert!(!MobileRule.validate(&vals(&["1380013800"]), ""));
    }

    #[test]
    fn in_rule() {
        assert!(InRule.validate(&vals(&["red", "blue"]), "red,green,blue"));
        assert!(!InRule.validate(&vals(&["pink"]), "red,green,blue"));
        assert!(!InRule.validate(&vals(&[" red"]), "red,green"));
    }

    #[test]
    fn comparison_rules() {
        assert!(LtRule.validate(&vals(&["4"]), "5"));
        assert!(!LtRule.validate(&vals(&["5"]), "5"));
        assert!(LteRule.validate(&vals(&["5"]), "5"));
        assert!(GtRule.validate(&vals(&["6"]), "5"));
        assert!(!GtRule.validate(&vals(&["5"]), "5"));
        assert!(GteRule.validate(&vals(&["5", "9"]), "5"));
        assert!(!GteRule.validate(&vals(&["abc"]), "5"));
        assert!(!GtRule.validate(&vals(&["6"]), "five"));
    }

    #[test]
    fn empty_value_list_passes_value_rules() {
        assert!(NumericRule.validate(&[], ""));
        assert!(EmailRule.validate(&[], ""));
        assert!(GtRule.validate(&[], "1"));
    }
}
