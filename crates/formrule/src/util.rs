//! Small string helpers shared by the engine and the registry.

/// Uppercase the first character only; the rest is left untouched, so
/// `"min"` becomes `"Min"` but `"mIN"` becomes `"MIN"`.
pub(crate) fn ucfirst(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inverse of [`ucfirst`]: lowercase the first character only.
pub(crate) fn lcfirst(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Exact, case-sensitive token membership.
pub(crate) fn contains_token(tokens: &[String], token: &str) -> bool {
    tokens.iter().any(|t| t == token)
}

/// True when no value has any content. An empty list counts as empty.
pub(crate) fn all_empty(values: &[String]) -> bool {
    values.iter().all(|value| value.is_empty())
}
