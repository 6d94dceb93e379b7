//! Named rule table
//!
//! Rule lines in a schema refer to rules by name; the registry maps each name
//! to its implementation. Registration replaces by name, so registering the
//! default set twice leaves the table exactly as it was after the first call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::database::DatabaseRuleKind;
use crate::rules::{self, CUSTOM_RULES};

/// Shared predicate for user-defined rules.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

// ============================================================================
// RULE
// ============================================================================

/// A registered rule implementation.
#[derive(Clone)]
#[non_exhaustive]
pub enum Rule {
    /// Present and non-empty. The only rule that runs on empty values when
    /// `skip_on_empty` is set.
    Required,
    /// Argument-less predicate.
    Predicate(Predicate),
    /// `min_len:n`
    MinLen,
    /// `max_len:n`
    MaxLen,
    /// `in:a,b,c`
    OneOf,
    /// `unique`, `exists`, `unique_multi`
    Database(DatabaseRuleKind),
}

impl Rule {
    /// Wraps a closure or function as a rule.
    ///
    /// ```
    /// use verity_validator::registry::Rule;
    ///
    /// let even = Rule::predicate(|v| v.as_i64().is_some_and(|n| n % 2 == 0));
    /// assert!(matches!(even, Rule::Predicate(_)));
    /// ```
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// True for rules that issue a count query.
    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("Required"),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
            Self::MinLen => f.write_str("MinLen"),
            Self::MaxLen => f.write_str("MaxLen"),
            Self::OneOf => f.write_str("OneOf"),
            Self::Database(kind) => f.debug_tuple("Database").field(kind).finish(),
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Name → rule table.
///
/// # Examples
///
/// ```
/// use verity_validator::registry::{Rule, RuleRegistry};
///
/// let mut registry = RuleRegistry::with_defaults();
/// registry.register("even", Rule::predicate(|v| v.as_i64().is_some_and(|n| n % 2 == 0)));
///
/// assert!(registry.contains("uuid"));
/// assert!(registry.contains("unique"));
/// assert!(registry.contains("even"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Rule>,
}

impl RuleRegistry {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generic, format and database rules.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_rules();
        registry.register_custom_rules();
        registry.register_database_rules();
        registry
    }

    /// Inserts `rule` under `name`, returning the rule it replaced.
    pub fn register(&mut self, name: impl Into<String>, rule: Rule) -> Option<Rule> {
        let name = name.into();
        let previous = self.rules.insert(name.clone(), rule);
        if previous.is_some() {
            tracing::trace!(rule = %name, "rule re-registered");
        }
        previous
    }

    /// `required`, `string`, `int`, `email`, `min_len`, `max_len`, `in`.
    pub fn register_builtin_rules(&mut self) {
        self.register("required", Rule::Required);
        self.register("string", Rule::predicate(rules::string));
        self.register("int", Rule::predicate(rules::int));
        self.register("email", Rule::predicate(rules::email));
        self.register("min_len", Rule::MinLen);
        self.register("max_len", Rule::MaxLen);
        self.register("in", Rule::OneOf);
    }

    /// The named format and denylist rules.
    pub fn register_custom_rules(&mut self) {
        for (name, predicate) in CUSTOM_RULES {
            self.register(*name, Rule::predicate(*predicate));
        }
    }

    /// `unique`, `exists`, `unique_multi`.
    pub fn register_database_rules(&mut self) {
        for kind in DatabaseRuleKind::ALL {
            self.register(kind.name(), Rule::Database(kind));
        }
    }

    /// Looks a rule up by name.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// True if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_cover_every_named_rule() {
        let registry = RuleRegistry::with_defaults();
        for name in [
            "uuid",
            "slug",
            "phone",
            "password",
            "username",
            "alpha_space",
            "no_sql",
            "no_xss",
            "color_hex",
            "timezone",
            "unique",
            "exists",
            "unique_multi",
            "required",
            "min_len",
        ] {
            assert!(registry.contains(name), "missing rule {name}");
        }
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut registry = RuleRegistry::with_defaults();
        let before = registry.names().into_iter().map(str::to_owned).collect::<Vec<_>>();

        registry.register_custom_rules();
        registry.register_database_rules();
        registry.register_builtin_rules();

        let after = registry.names().into_iter().map(str::to_owned).collect::<Vec<_>>();
        assert_eq!(before, after);
        assert_eq!(registry.len(), 20);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = RuleRegistry::new();
        assert!(registry.register("x", Rule::predicate(|_| true)).is_none());
        assert!(registry.register("x", Rule::predicate(|_| false)).is_some());
        assert_eq!(registry.len(), 1);

        let Some(Rule::Predicate(f)) = registry.get("x") else {
            panic!("expected predicate");
        };
        assert!(!f(&json!(1)));
    }

    #[test]
    fn test_database_rules_flagged() {
        let registry = RuleRegistry::with_defaults();
        assert!(registry.get("unique").unwrap().is_database());
        assert!(!registry.get("slug").unwrap().is_database());
    }
}
