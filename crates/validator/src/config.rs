//! Validator configuration
//!
//! [`Config`] can be deserialized (every field has a default), read from
//! `VERITY_*` environment variables, or adjusted with [`ConfigOption`]
//! mutators applied in order.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a database rule does when no database is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDatabase {
    /// The rule passes and a warning is logged.
    Pass,
    /// The validation call fails with [`crate::Error::DatabaseUnavailable`].
    #[default]
    Reject,
}

impl MissingDatabase {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pass" => Some(Self::Pass),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Validator settings.
///
/// ```
/// use verity_validator::{Config, MissingDatabase};
///
/// let config: Config = serde_json::from_str(r#"{"stop_on_error": true}"#).unwrap();
/// assert!(config.stop_on_error);
/// assert!(config.skip_on_empty);
/// assert_eq!(config.locale, "en");
/// assert_eq!(config.missing_database, MissingDatabase::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Message locale; unknown locales fall back to English.
    pub locale: String,
    /// End evaluation at the first failing field.
    pub stop_on_error: bool,
    /// Skip every rule except `required` on empty values.
    pub skip_on_empty: bool,
    /// Database rules without an attached database.
    pub missing_database: MissingDatabase,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en".to_owned(),
            stop_on_error: false,
            skip_on_empty: true,
            missing_database: MissingDatabase::Reject,
        }
    }
}

const ENV_LOCALE: &str = "VERITY_LOCALE";
const ENV_STOP_ON_ERROR: &str = "VERITY_STOP_ON_ERROR";
const ENV_SKIP_ON_EMPTY: &str = "VERITY_SKIP_ON_EMPTY";
const ENV_MISSING_DATABASE: &str = "VERITY_MISSING_DATABASE";

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            var,
            value: raw.to_owned(),
            expected: "a boolean (true/false/1/0/yes/no/on/off)",
        }),
    }
}

impl Config {
    /// Defaults overridden by `VERITY_LOCALE`, `VERITY_STOP_ON_ERROR`,
    /// `VERITY_SKIP_ON_EMPTY` and `VERITY_MISSING_DATABASE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Config::from_env`] with a custom variable source.
    ///
    /// ```
    /// use verity_validator::{Config, MissingDatabase};
    ///
    /// let config = Config::from_lookup(|name| match name {
    ///     "VERITY_MISSING_DATABASE" => Some("pass".to_owned()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.missing_database, MissingDatabase::Pass);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(locale) = lookup(ENV_LOCALE).filter(|l| !l.trim().is_empty()) {
            config.locale = locale.trim().to_owned();
        }
        if let Some(raw) = lookup(ENV_STOP_ON_ERROR) {
            config.stop_on_error = parse_bool(ENV_STOP_ON_ERROR, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SKIP_ON_EMPTY) {
            config.skip_on_empty = parse_bool(ENV_SKIP_ON_EMPTY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MISSING_DATABASE) {
            config.missing_database =
                MissingDatabase::parse(&raw).ok_or_else(|| ConfigError {
                    var: ENV_MISSING_DATABASE,
                    value: raw.clone(),
                    expected: "pass or reject",
                })?;
        }

        Ok(config)
    }

    /// Applies one option.
    pub fn apply(&mut self, option: ConfigOption) {
        match option {
            ConfigOption::Locale(locale) => self.locale = locale,
            ConfigOption::StopOnError(on) => self.stop_on_error = on,
            ConfigOption::SkipOnEmpty(on) => self.skip_on_empty = on,
            ConfigOption::MissingDatabase(policy) => self.missing_database = policy,
        }
    }

    /// Applies `options` in order; a later option overrides an earlier one.
    #[must_use]
    pub fn with_options(mut self, options: impl IntoIterator<Item = ConfigOption>) -> Self {
        for option in options {
            self.apply(option);
        }
        self
    }
}

/// A single configuration change.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigOption {
    /// Sets [`Config::locale`].
    Locale(String),
    /// Sets [`Config::stop_on_error`].
    StopOnError(bool),
    /// Sets [`Config::skip_on_empty`].
    SkipOnEmpty(bool),
    /// Sets [`Config::missing_database`].
    MissingDatabase(MissingDatabase),
}

/// Sets the message locale.
pub fn with_locale(locale: impl Into<String>) -> ConfigOption {
    ConfigOption::Locale(locale.into())
}

/// Sets whether evaluation stops at the first failing field.
pub fn with_stop_on_error(on: bool) -> ConfigOption {
    ConfigOption::StopOnError(on)
}

/// Sets whether empty values skip non-`required` rules.
pub fn with_skip_on_empty(on: bool) -> ConfigOption {
    ConfigOption::SkipOnEmpty(on)
}

/// Sets the missing-database policy.
pub fn with_missing_database(policy: MissingDatabase) -> ConfigOption {
    ConfigOption::MissingDatabase(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.locale, "en");
        assert!(!config.stop_on_error);
        assert!(config.skip_on_empty);
        assert_eq!(config.missing_database, MissingDatabase::Reject);
    }

    #[test]
    fn test_options_last_wins() {
        let config = Config::default().with_options([
            with_stop_on_error(true),
            with_locale("de"),
            with_stop_on_error(false),
            with_missing_database(MissingDatabase::Pass),
        ]);
        assert!(!config.stop_on_error);
        assert_eq!(config.locale, "de");
        assert_eq!(config.missing_database, MissingDatabase::Pass);
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("VERITY_LOCALE", " fr "),
            ("VERITY_STOP_ON_ERROR", "yes"),
            ("VERITY_SKIP_ON_EMPTY", "0"),
            ("VERITY_MISSING_DATABASE", "PASS"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            Config {
                locale: "fr".into(),
                stop_on_error: true,
                skip_on_empty: false,
                missing_database: MissingDatabase::Pass,
            }
        );
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = Config::from_lookup(lookup(&[("VERITY_STOP_ON_ERROR", "maybe")])).unwrap_err();
        assert_eq!(err.var, "VERITY_STOP_ON_ERROR");

        let err = Config::from_lookup(lookup(&[("VERITY_MISSING_DATABASE", "ignore")])).unwrap_err();
        assert_eq!(err.value, "ignore");
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"missing_database": "pass"}"#).unwrap();
        assert_eq!(config.missing_database, MissingDatabase::Pass);
        assert!(config.skip_on_empty);
    }
}
