//! Built-in rule predicates
//!
//! All predicates are plain functions over a [`serde_json::Value`]; they hold
//! no state and do no I/O, so they can be called from any number of threads.
//!
//! # Categories
//!
//! - **Formats**: [`uuid`], [`slug`], [`phone`], [`password`], [`username`],
//!   [`alpha_space`], [`color_hex`], [`timezone`]
//! - **Denylists**: [`no_sql`], [`no_xss`] (best-effort heuristics)
//! - **Generic**: [`required`], [`string`], [`int`], [`email`], plus the
//!   parameterized `min_len`, `max_len` and `in` rules
//!
//! Database-backed rules live in [`crate::database`].

mod builtin;
mod denylist;
mod pattern;

pub use builtin::{email, int, is_empty, length, required, string};
pub use denylist::{SQL_FRAGMENTS, XSS_FRAGMENTS, no_sql, no_xss};
pub use pattern::{alpha_space, color_hex, password, phone, slug, timezone, username, uuid};

pub(crate) use builtin::{max_len, min_len, one_of};

/// Signature shared by every argument-less rule.
pub type PredicateFn = fn(&serde_json::Value) -> bool;

/// Named format rules registered by [`crate::RuleRegistry::register_custom_rules`].
pub const CUSTOM_RULES: &[(&str, PredicateFn)] = &[
    ("uuid", uuid),
    ("slug", slug),
    ("phone", phone),
    ("password", password),
    ("username", username),
    ("alpha_space", alpha_space),
    ("no_sql", no_sql),
    ("no_xss", no_xss),
    ("color_hex", color_hex),
    ("timezone", timezone),
];
