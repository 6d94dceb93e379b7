//! Substring denylists for SQL and markup fragments.
//!
//! These are heuristics. They reject a lot of harmless text ("Please select a
//! size", "0xCAFE") and miss anything encoded or split; parameterized queries
//! and output escaping are the real defenses. Use them as a coarse input
//! filter only.

use serde_json::Value;

/// Fragments rejected by [`no_sql`], matched case-insensitively.
pub const SQL_FRAGMENTS: &[&str] = &[
    "select", "insert", "update", "delete", "drop", "create", "alter", "exec", "execute", "union",
    "declare", "--", "/*", "*/", "xp_", "sp_", "0x", "char(", "nchar(", "varchar(", "nvarchar(",
];

/// Fragments rejected by [`no_xss`], matched case-insensitively.
pub const XSS_FRAGMENTS: &[&str] = &[
    "<script",
    "</script",
    "javascript:",
    "onerror=",
    "onload=",
    "onclick=",
    "onmouseover=",
    "<iframe",
    "<object",
    "<embed",
    "eval(",
    "expression(",
    "vbscript:",
    "data:text/html",
];

fn contains_none(value: &Value, fragments: &[&str]) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let lowered = s.to_lowercase();
    !fragments.iter().any(|fragment| lowered.contains(fragment))
}

/// Fails if the string contains any of [`SQL_FRAGMENTS`].
pub fn no_sql(value: &Value) -> bool {
    contains_none(value, SQL_FRAGMENTS)
}

/// Fails if the string contains any of [`XSS_FRAGMENTS`].
pub fn no_xss(value: &Value) -> bool {
    contains_none(value, XSS_FRAGMENTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("plain comment", true)]
    #[case("1; DROP TABLE users", false)]
    #[case("a UNION b", false)]
    #[case("admin'--", false)]
    #[case("/* hi */", false)]
    #[case("CHAR(65)", false)]
    #[case("0x41", false)]
    fn test_no_sql(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(no_sql(&json!(input)), expected);
    }

    #[rstest]
    #[case("<b>bold</b>", true)]
    #[case("<SCRIPT>alert(1)</SCRIPT>", false)]
    #[case("JavaScript:void(0)", false)]
    #[case("<img onerror=x>", false)]
    #[case("data:text/html;base64,AAAA", false)]
    fn test_no_xss(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(no_xss(&json!(input)), expected);
    }

    #[test]
    fn test_non_strings_fail() {
        assert!(!no_sql(&json!(1)));
        assert!(!no_xss(&json!(null)));
    }

    #[test]
    fn test_known_false_positive() {
        // Documented trade-off of a substring denylist.
        assert!(!no_sql(&json!("Please select a size")));
    }
}
