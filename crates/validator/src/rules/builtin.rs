//! Generic rules every schema needs alongside the named formats.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .unwrap()
});

/// True for a missing or null value, an empty string, an empty array or an
/// empty object. `0` and `false` are values.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Present and not empty.
pub fn required(value: &Value) -> bool {
    !is_empty(value)
}

/// A JSON string.
pub fn string(value: &Value) -> bool {
    value.is_string()
}

/// An integral number, or a string holding one.
pub fn int(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

/// `local@domain.tld`.
pub fn email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| EMAIL.is_match(s))
}

/// Character count of a string or element count of an array.
pub fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

pub(crate) fn min_len(value: &Value, min: usize) -> bool {
    length(value).is_some_and(|len| len >= min)
}

pub(crate) fn max_len(value: &Value, max: usize) -> bool {
    length(value).is_some_and(|len| len <= max)
}

/// String form of a scalar, used to compare against `in:` options.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn one_of(value: &Value, options: &[String]) -> bool {
    scalar_text(value).is_some_and(|text| options.iter().any(|o| *o == text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required() {
        assert!(required(&json!("x")));
        assert!(required(&json!(0)));
        assert!(required(&json!(false)));
        assert!(!required(&json!(null)));
        assert!(!required(&json!("")));
        assert!(!required(&json!([])));
        assert!(!required(&json!({})));
    }

    #[test]
    fn test_int() {
        assert!(int(&json!(5)));
        assert!(int(&json!(-5)));
        assert!(int(&json!("42")));
        assert!(!int(&json!(1.5)));
        assert!(!int(&json!("4x")));
    }

    #[test]
    fn test_email() {
        assert!(email(&json!("alice@example.com")));
        assert!(!email(&json!("alice@localhost")));
        assert!(!email(&json!("alice")));
    }

    #[test]
    fn test_lengths_count_chars() {
        assert!(min_len(&json!("héllo"), 5));
        assert!(max_len(&json!("héllo"), 5));
        assert!(!max_len(&json!("héllo!"), 5));
        assert!(min_len(&json!([1, 2]), 2));
        assert!(!min_len(&json!(12345), 1));
    }

    #[test]
    fn test_one_of() {
        let options = vec!["draft".to_owned(), "published".to_owned(), "1".to_owned()];
        assert!(one_of(&json!("draft"), &options));
        assert!(one_of(&json!(1), &options));
        assert!(!one_of(&json!("archived"), &options));
        assert!(!one_of(&json!(null), &options));
    }
}
