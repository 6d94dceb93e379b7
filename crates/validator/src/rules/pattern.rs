//! Fixed-format string rules.
//!
//! Every predicate takes an arbitrary JSON value and returns `false` for
//! anything that is not a string.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());
static USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());
static COLOR_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap());
static TIMEZONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+/[A-Z][a-z_]+$").unwrap());
static DECIMAL_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{Nd}$").unwrap());

const PASSWORD_MIN_LEN: usize = 8;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=20;
const PHONE_LEN_INTERNATIONAL: std::ops::RangeInclusive<usize> = 11..=16;
const PHONE_LEN_LOCAL: std::ops::RangeInclusive<usize> = 10..=15;

/// Decimal digit in any script (category `Nd`). Superscripts, fractions and
/// roman numerals are numeric but not digits.
fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Any RFC 4122 UUID form the `uuid` parser accepts (hyphenated, simple,
/// braced, urn).
///
/// ```
/// use serde_json::json;
/// use verity_validator::rules::uuid;
///
/// assert!(uuid(&json!("550e8400-e29b-41d4-a716-446655440000")));
/// assert!(!uuid(&json!("not-a-uuid")));
/// assert!(!uuid(&json!(42)));
/// ```
pub fn uuid(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| ::uuid::Uuid::parse_str(s).is_ok())
}

/// Lowercase ASCII words joined by single hyphens.
pub fn slug(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty() && SLUG.is_match(s))
}

/// Loose phone number check.
///
/// Everything except decimal digits and `+` is stripped first, so
/// `+1 (415) 555-1234` is judged as `+14155551234`. With a leading `+` the
/// cleaned byte length must be 11–16, otherwise 10–15.
pub fn phone(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    if s.is_empty() {
        return false;
    }

    let cleaned: String = s
        .chars()
        .filter(|&c| is_decimal_digit(c) || c == '+')
        .collect();

    let len = cleaned.len();
    if cleaned.starts_with('+') {
        PHONE_LEN_INTERNATIONAL.contains(&len)
    } else {
        PHONE_LEN_LOCAL.contains(&len)
    }
}

/// At least eight bytes with an uppercase letter, a lowercase letter and a digit.
pub fn password(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    if s.len() < PASSWORD_MIN_LEN {
        return false;
    }

    let (mut upper, mut lower, mut digit) = (false, false, false);
    for c in s.chars() {
        if c.is_uppercase() {
            upper = true;
        } else if c.is_lowercase() {
            lower = true;
        } else if is_decimal_digit(c) {
            digit = true;
        }
    }

    upper && lower && digit
}

/// 3–20 ASCII letters, digits, `_` or `-`.
pub fn username(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| USERNAME_LEN.contains(&s.len()) && USERNAME.is_match(s))
}

/// Letters and whitespace only. The empty string passes.
pub fn alpha_space(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.chars().all(|c| c.is_alphabetic() || c.is_whitespace()))
}

/// `#RGB` or `#RRGGBB`.
pub fn color_hex(value: &Value) -> bool {
    value.as_str().is_some_and(|s| COLOR_HEX.is_match(s))
}

/// `UTC`, `GMT`, or an `Area/Location` name.
///
/// This is a shape check, not a lookup in the tz database: the area must be a
/// single capitalized word and the location may only capitalize its first
/// letter, so real zones such as `America/Los_Angeles`,
/// `America/Argentina/Salta` and `Etc/GMT+2` are rejected.
pub fn timezone(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s == "UTC" || s == "GMT" || TIMEZONE.is_match(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("hello", true)]
    #[case("hello-world", true)]
    #[case("my-post-123", true)]
    #[case("a", true)]
    #[case("", false)]
    #[case("Hello", false)]
    #[case("hello--world", false)]
    #[case("-hello", false)]
    #[case("hello-", false)]
    #[case("hello_world", false)]
    fn test_slug(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(slug(&json!(input)), expected);
    }

    #[rstest]
    #[case("+12345678901", true)]
    #[case("1234567890", true)]
    #[case("+1 (415) 555-1234", true)]
    #[case("123", false)]
    #[case("", false)]
    #[case("+123456789", false)]
    #[case("1234567890123456", false)]
    #[case("123456789²", false)]
    #[case("123456789½", false)]
    #[case("12345678٣", true)]
    fn test_phone(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(phone(&json!(input)), expected);
    }

    #[rstest]
    #[case("Abcdefg1", true)]
    #[case("abcdefg1", false)]
    #[case("ABCDEFG1", false)]
    #[case("Abcdefgh", false)]
    #[case("Ab1", false)]
    #[case("Abcdefg²", false)]
    #[case("AbcdefgⅧ", false)]
    #[case("Abcdefg٣", true)]
    fn test_password(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(password(&json!(input)), expected);
    }

    #[rstest]
    #[case("bob", true)]
    #[case("alice_99-x", true)]
    #[case("ab", false)]
    #[case("a_very_long_username_x", false)]
    #[case("bad name", false)]
    fn test_username(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(username(&json!(input)), expected);
    }

    #[rstest]
    #[case("#FFAA00", true)]
    #[case("#fa0", true)]
    #[case("FFAA00", false)]
    #[case("#FFAA0", false)]
    #[case("#GGGGGG", false)]
    fn test_color_hex(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(color_hex(&json!(input)), expected);
    }

    #[rstest]
    #[case("UTC", true)]
    #[case("GMT", true)]
    #[case("Europe/Berlin", true)]
    #[case("America/Los_Angeles", false)]
    #[case("utc", false)]
    #[case("Europe", false)]
    #[case("Etc/GMT+2", false)]
    fn test_timezone(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(timezone(&json!(input)), expected);
    }

    #[test]
    fn test_alpha_space() {
        assert!(alpha_space(&json!("José María")));
        assert!(alpha_space(&json!("")));
        assert!(!alpha_space(&json!("R2 D2")));
    }

    #[test]
    fn test_uuid_forms() {
        assert!(uuid(&json!("550e8400-e29b-41d4-a716-446655440000")));
        assert!(uuid(&json!("550e8400e29b41d4a716446655440000")));
        assert!(uuid(&json!("{550e8400-e29b-41d4-a716-446655440000}")));
        assert!(!uuid(&json!("not-a-uuid")));
    }

    #[test]
    fn test_non_strings_fail_closed() {
        for value in [json!(null), json!(12), json!(true), json!(["a"]), json!({"a": 1})] {
            assert!(!uuid(&value));
            assert!(!slug(&value));
            assert!(!phone(&value));
            assert!(!password(&value));
            assert!(!username(&value));
            assert!(!alpha_space(&value));
            assert!(!color_hex(&value));
            assert!(!timezone(&value));
        }
    }
}
