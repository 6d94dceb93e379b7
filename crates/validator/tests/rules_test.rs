//! Named rule behavior through the public predicates.

use rstest::rstest;
use serde_json::{Value, json};
use verity_validator::rules;

#[rstest]
#[case("Abcdefg1", true)]
#[case("abcdefg1", false)]
#[case("ABCDEFG1", false)]
#[case("Abcdefgh", false)]
#[case("Ab1", false)]
#[case("Abcdefg²", false)]
#[case("Abcdefg٣", true)]
fn test_password(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(rules::password(&json!(input)), expected);
}

#[rstest]
#[case("+12345678901", true)]
#[case("123", false)]
#[case("1234567890", true)]
#[case("(555) 123-4567 89", true)]
#[case("", false)]
#[case("123456789²", false)]
#[case("12345678٣", true)]
fn test_phone(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(rules::phone(&json!(input)), expected);
}

#[rstest]
#[case("550e8400-e29b-41d4-a716-446655440000", true)]
#[case("not-a-uuid", false)]
fn test_uuid(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(rules::uuid(&json!(input)), expected);
}

#[rstest]
#[case("#FFAA00", true)]
#[case("#FA0", true)]
#[case("FFAA00", false)]
#[case("#FFAA0", false)]
fn test_color_hex(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(rules::color_hex(&json!(input)), expected);
}

#[rstest]
#[case("UTC", true)]
#[case("GMT", true)]
#[case("Europe/Berlin", true)]
#[case("europe/berlin", false)]
#[case("Berlin", false)]
fn test_timezone(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(rules::timezone(&json!(input)), expected);
}

#[rstest]
#[case("hello world", true)]
#[case("1; DROP TABLE users", false)]
#[case("please Select one", false)]
fn test_no_sql(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(rules::no_sql(&json!(input)), expected);
}

#[rstest]
#[case("<b>bold</b>", true)]
#[case("<SCRIPT>alert(1)</SCRIPT>", false)]
#[case("<img src=x onerror=alert(1)>", false)]
fn test_no_xss(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(rules::no_xss(&json!(input)), expected);
}

#[rstest]
#[case(json!(null))]
#[case(json!(42))]
#[case(json!(true))]
#[case(json!(["a"]))]
#[case(json!({"a": 1}))]
fn test_non_strings_fail_every_format_rule(#[case] value: Value) {
    for (name, predicate) in rules::CUSTOM_RULES {
        assert!(!predicate(&value), "{name} accepted {value}");
    }
}
