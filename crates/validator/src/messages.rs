//! Failure message templates
//!
//! Templates may use `{field}` and `{args}` (the rule's arguments joined with
//! `", "`). Lookup order for a failure of `rule` on `field`:
//!
//! 1. schema message `field.rule`
//! 2. schema message `rule`
//! 3. catalog template for the configured locale
//! 4. catalog template for `en`
//! 5. a generic fallback

use std::collections::HashMap;

const FALLBACK: &str = "{field} did not pass validation ({rule})";

const EN: &[(&str, &str)] = &[
    ("required", "{field} is required"),
    ("string", "{field} must be a string"),
    ("int", "{field} must be an integer"),
    ("email", "{field} must be a valid email address"),
    ("min_len", "{field} must be at least {args} characters long"),
    ("max_len", "{field} must be at most {args} characters long"),
    ("in", "{field} must be one of: {args}"),
    ("uuid", "{field} must be a valid UUID"),
    ("slug", "{field} must be a valid URL slug"),
    ("phone", "{field} must be a valid phone number"),
    (
        "password",
        "{field} must be at least 8 characters and contain an uppercase letter, a lowercase letter and a digit",
    ),
    (
        "username",
        "{field} must be 3 to 20 characters of letters, digits, underscores or hyphens",
    ),
    ("alpha_space", "{field} may only contain letters and spaces"),
    ("no_sql", "{field} contains forbidden SQL keywords"),
    ("no_xss", "{field} contains forbidden markup"),
    ("color_hex", "{field} must be a hex color such as #1a2b3c"),
    ("timezone", "{field} must be a valid timezone"),
    ("unique", "{field} has already been taken"),
    ("exists", "{field} does not exist"),
    ("unique_multi", "{field} has already been taken"),
];

/// Message templates per locale.
///
/// ```
/// use verity_validator::MessageCatalog;
///
/// let mut catalog = MessageCatalog::new();
/// catalog.insert("de", "required", "{field} ist erforderlich");
///
/// assert_eq!(catalog.render("de", "name", "required", &[]), "name ist erforderlich");
/// assert_eq!(catalog.render("de", "slug", "slug", &[]), "slug must be a valid URL slug");
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    locales: HashMap<String, HashMap<String, String>>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let en = EN
            .iter()
            .map(|(rule, template)| ((*rule).to_owned(), (*template).to_owned()))
            .collect();
        Self {
            locales: HashMap::from([("en".to_owned(), en)]),
        }
    }
}

impl MessageCatalog {
    /// Catalog with the English templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a template.
    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        rule: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.locales
            .entry(locale.into())
            .or_default()
            .insert(rule.into(), template.into());
    }

    /// Adds many templates for one locale.
    #[must_use]
    pub fn with_locale<I, K, V>(mut self, locale: &str, templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (rule, template) in templates {
            self.insert(locale, rule, template);
        }
        self
    }

    /// True if any template is registered for `locale`.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Template for `rule`, falling back to English.
    pub fn template(&self, locale: &str, rule: &str) -> Option<&str> {
        self.locales
            .get(locale)
            .and_then(|templates| templates.get(rule))
            .or_else(|| self.locales.get("en").and_then(|t| t.get(rule)))
            .map(String::as_str)
    }

    /// Renders the message for a failure of `rule` on `field`.
    pub fn render(&self, locale: &str, field: &str, rule: &str, args: &[String]) -> String {
        match self.template(locale, rule) {
            Some(template) => fill(template, field, rule, args),
            None => fill(FALLBACK, field, rule, args),
        }
    }
}

/// Substitutes `{field}`, `{rule}` and `{args}` in `template`.
pub(crate) fn fill(template: &str, field: &str, rule: &str, args: &[String]) -> String {
    template
        .replace("{field}", field)
        .replace("{rule}", rule)
        .replace("{args}", &args.join(", "))
}
