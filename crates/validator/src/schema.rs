//! Field rules, scenes and custom messages
//!
//! A [`SchemaSpec`] is the declarative form a type hands out: for each field a
//! rule line such as `"required|min_len:3|unique:users,email"`, optional named
//! scenes restricting which fields are checked, and optional message
//! overrides. [`Schema::compile`] resolves every rule against a
//! [`RuleRegistry`] and parses every argument, so a broken rule line is
//! reported once, before any input is looked at.
//!
//! # Rule line syntax
//!
//! ```text
//! rule_line := rule ("|" rule)*
//! rule      := name (":" arg ("," arg)*)?
//! ```
//!
//! Whitespace around names and arguments is ignored.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::database::DatabaseRule;
use crate::error::SchemaError;
use crate::registry::{Predicate, Rule, RuleRegistry};

// ============================================================================
// BUILDER
// ============================================================================

/// Uncompiled schema: field rule lines, scenes and message overrides.
///
/// ```
/// use verity_validator::SchemaSpec;
///
/// let spec = SchemaSpec::new()
///     .field("email", "required|email|unique:users,email")
///     .field("name", "required|alpha_space")
///     .scene("rename", ["name"])
///     .message("email.unique", "{field} is already registered");
///
/// assert_eq!(spec.field_names().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSpec {
    fields: Vec<(String, String)>,
    scenes: Vec<(String, Vec<String>)>,
    messages: Vec<(String, String)>,
}

impl SchemaSpec {
    /// An empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` with a rule line. Dotted names (`address.city`) reach
    /// into nested objects.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, name: impl Into<String>, rules: impl Into<String>) -> Self {
        self.fields.push((name.into(), rules.into()));
        self
    }

    /// Declares a scene validating only `fields`.
    #[must_use = "builder methods must be chained or built"]
    pub fn scene<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scenes
            .push((name.into(), fields.into_iter().map(Into::into).collect()));
        self
    }

    /// Overrides a message. `key` is `field.rule` or just `rule`; the template
    /// may use `{field}` and `{args}`.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.push((key.into(), template.into()));
        self
    }

    /// Declared field names, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// A type whose values can be validated against its own schema.
///
/// Field values are read by serializing the value with `serde_json`, so field
/// names follow any `#[serde(rename)]` attributes.
///
/// ```
/// use serde::Serialize;
/// use verity_validator::{SchemaSpec, Validatable};
///
/// #[derive(Serialize)]
/// struct CreateTag {
///     slug: String,
///     color: String,
/// }
///
/// impl Validatable for CreateTag {
///     fn schema() -> SchemaSpec {
///         SchemaSpec::new()
///             .field("slug", "required|slug")
///             .field("color", "color_hex")
///     }
/// }
/// ```
pub trait Validatable: Serialize + 'static {
    /// The rule lines for this type.
    fn schema() -> SchemaSpec;
}

// ============================================================================
// COMPILED RULES
// ============================================================================

#[derive(Clone)]
pub(crate) enum Check {
    Required,
    Predicate(Predicate),
    MinLen(usize),
    MaxLen(usize),
    OneOf(Vec<String>),
    Database(DatabaseRule),
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("Required"),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
            Self::MinLen(n) => f.debug_tuple("MinLen").field(n).finish(),
            Self::MaxLen(n) => f.debug_tuple("MaxLen").field(n).finish(),
            Self::OneOf(options) => f.debug_tuple("OneOf").field(options).finish(),
            Self::Database(rule) => f.debug_tuple("Database").field(rule).finish(),
        }
    }
}

/// One rule of a field, with its arguments already parsed.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    name: String,
    args: Vec<String>,
    pub(crate) check: Check,
}

impl CompiledRule {
    fn compile(field: &str, name: &str, args: Vec<String>, rule: &Rule) -> Result<Self, SchemaError> {
        let no_args = |check: Check| {
            if args.is_empty() {
                Ok(check)
            } else {
                Err(SchemaError::invalid_arguments(field, name, "takes no arguments"))
            }
        };
        let single_len = || match args.as_slice() {
            [n] => n.parse::<usize>().map_err(|_| {
                SchemaError::invalid_arguments(field, name, format!("'{n}' is not a length"))
            }),
            _ => Err(SchemaError::invalid_arguments(
                field,
                name,
                "expected exactly one length",
            )),
        };

        let check = match rule {
            Rule::Required => no_args(Check::Required)?,
            Rule::Predicate(predicate) => no_args(Check::Predicate(predicate.clone()))?,
            Rule::MinLen => Check::MinLen(single_len()?),
            Rule::MaxLen => Check::MaxLen(single_len()?),
            Rule::OneOf => {
                if args.iter().all(String::is_empty) {
                    return Err(SchemaError::invalid_arguments(
                        field,
                        name,
                        "expected at least one option",
                    ));
                }
                Check::OneOf(args.clone())
            }
            Rule::Database(kind) => Check::Database(DatabaseRule::parse(*kind, field, &args)?),
        };

        Ok(Self {
            name: name.to_owned(),
            args,
            check,
        })
    }

    /// Rule name as written in the rule line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw arguments as written.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// True for `required`.
    pub fn is_required(&self) -> bool {
        matches!(self.check, Check::Required)
    }

    /// True for rules that need a database.
    pub fn is_database(&self) -> bool {
        matches!(self.check, Check::Database(_))
    }

    /// The parsed database rule, if this is one.
    pub fn database_rule(&self) -> Option<&DatabaseRule> {
        match &self.check {
            Check::Database(rule) => Some(rule),
            _ => None,
        }
    }
}

/// The compiled rules of one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    name: String,
    path: Vec<String>,
    rules: Vec<CompiledRule>,
}

static NULL: Value = Value::Null;

impl FieldRules {
    /// Field name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// The field's value inside `root`, or `null` when absent.
    ///
    /// Path segments step into objects by key and into arrays by index.
    pub fn value_in<'a>(&self, root: &'a Value) -> &'a Value {
        let mut current = root;
        for segment in &self.path {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return &NULL,
            }
        }
        current
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// A compiled, ready-to-evaluate schema.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldRules>,
    scenes: HashMap<String, Vec<usize>>,
    messages: HashMap<String, String>,
}

fn parse_rule_line(field: &str, line: &str) -> Result<Vec<(String, Vec<String>)>, SchemaError> {
    let empty = || SchemaError::EmptyRule {
        field: field.to_owned(),
    };

    let line = line.trim();
    if line.is_empty() {
        return Err(empty());
    }

    line.split('|')
        .map(|segment| {
            let segment = segment.trim();
            let (name, args) = match segment.split_once(':') {
                Some((name, args)) => (
                    name.trim(),
                    args.split(',').map(|a| a.trim().to_owned()).collect(),
                ),
                None => (segment, Vec::new()),
            };
            if name.is_empty() {
                Err(empty())
            } else {
                Ok((name.to_owned(), args))
            }
        })
        .collect()
}

impl Schema {
    /// Compiles `spec` against `registry`.
    pub fn compile(spec: &SchemaSpec, registry: &RuleRegistry) -> Result<Self, SchemaError> {
        let mut fields: Vec<FieldRules> = Vec::with_capacity(spec.fields.len());
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(spec.fields.len());

        for (name, line) in &spec.fields {
            if index.insert(name.as_str(), fields.len()).is_some() {
                return Err(SchemaError::DuplicateField(name.clone()));
            }

            let rules = parse_rule_line(name, line)?
                .into_iter()
                .map(|(rule_name, args)| {
                    let rule = registry.get(&rule_name).ok_or_else(|| SchemaError::UnknownRule {
                        field: name.clone(),
                        rule: rule_name.clone(),
                    })?;
                    CompiledRule::compile(name, &rule_name, args, rule)
                })
                .collect::<Result<Vec<_>, _>>()?;

            fields.push(FieldRules {
                name: name.clone(),
                path: name.split('.').map(str::to_owned).collect(),
                rules,
            });
        }

        let mut scenes = HashMap::with_capacity(spec.scenes.len());
        for (scene, members) in &spec.scenes {
            let positions = members
                .iter()
                .map(|member| {
                    index
                        .get(member.as_str())
                        .copied()
                        .ok_or_else(|| SchemaError::UnknownSceneField {
                            scene: scene.clone(),
                            field: member.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            scenes.insert(scene.clone(), positions);
        }

        Ok(Self {
            fields,
            scenes,
            messages: spec.messages.iter().cloned().collect(),
        })
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    /// Fields checked for `scene`; every field when `scene` is `None`.
    pub fn fields_for(&self, scene: Option<&str>) -> Result<Vec<&FieldRules>, SchemaError> {
        match scene {
            None => Ok(self.fields.iter().collect()),
            Some(name) => self
                .scenes
                .get(name)
                .map(|positions| positions.iter().map(|&i| &self.fields[i]).collect())
                .ok_or_else(|| SchemaError::UnknownScene(name.to_owned())),
        }
    }

    /// Declared scene names.
    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    /// Custom message for `rule` on `field`, `field.rule` before `rule`.
    pub fn message(&self, field: &str, rule: &str) -> Option<&str> {
        self.messages
            .get(&format!("{field}.{rule}"))
            .or_else(|| self.messages.get(rule))
            .map(String::as_str)
    }

    /// True if any field uses a database rule.
    pub fn uses_database(&self) -> bool {
        self.fields
            .iter()
            .any(|field| field.rules.iter().any(CompiledRule::is_database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::database::DatabaseRuleKind;

    fn compile(spec: &SchemaSpec) -> Result<Schema, SchemaError> {
        Schema::compile(spec, &RuleRegistry::with_defaults())
    }

    #[test]
    fn test_compile_resolves_rules_in_order() {
        let schema = compile(
            &SchemaSpec::new().field("email", " required | email |unique:users, email "),
        )
        .unwrap();

        let names: Vec<&str> = schema.fields()[0].rules().iter().map(CompiledRule::name).collect();
        assert_eq!(names, ["required", "email", "unique"]);
        assert_eq!(schema.fields()[0].rules()[2].args(), ["users", "email"]);
        assert!(schema.uses_database());
    }

    #[test]
    fn test_unknown_rule() {
        let err = compile(&SchemaSpec::new().field("email", "required|emial")).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownRule {
                field: "email".into(),
                rule: "emial".into()
            }
        );
    }

    #[test]
    fn test_empty_segments() {
        assert!(matches!(
            compile(&SchemaSpec::new().field("a", "")),
            Err(SchemaError::EmptyRule { .. })
        ));
        assert!(matches!(
            compile(&SchemaSpec::new().field("a", "required||slug")),
            Err(SchemaError::EmptyRule { .. })
        ));
    }

    #[test]
    fn test_argument_checks() {
        assert!(compile(&SchemaSpec::new().field("a", "slug:x")).is_err());
        assert!(compile(&SchemaSpec::new().field("a", "min_len")).is_err());
        assert!(compile(&SchemaSpec::new().field("a", "min_len:abc")).is_err());
        assert!(compile(&SchemaSpec::new().field("a", "max_len:1,2")).is_err());
        assert!(compile(&SchemaSpec::new().field("a", "in:")).is_err());
        assert!(compile(&SchemaSpec::new().field("a", "unique:users")).is_err());
        assert!(compile(&SchemaSpec::new().field("a", "exists:users,id,status")).is_err());
        assert!(compile(&SchemaSpec::new().field("a", "min_len:3|max_len:9|in:x,y")).is_ok());
    }

    #[test]
    fn test_database_rule_parsed_at_compile() {
        let schema = compile(&SchemaSpec::new().field("item", "exists:items,id,shop_id,5")).unwrap();
        let rule = schema.fields()[0].rules()[0].database_rule().unwrap();
        assert_eq!(rule.kind(), DatabaseRuleKind::Exists);
        assert_eq!(rule.filter().constraints.len(), 1);
    }

    #[test]
    fn test_duplicate_field() {
        let err = compile(&SchemaSpec::new().field("a", "required").field("a", "slug")).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("a".into()));
    }

    #[test]
    fn test_scenes() {
        let schema = compile(
            &SchemaSpec::new()
                .field("name", "required")
                .field("email", "required|email")
                .field("password", "required|password")
                .scene("update", ["email", "name"]),
        )
        .unwrap();

        let all: Vec<&str> = schema.fields_for(None).unwrap().iter().map(|f| f.name()).collect();
        assert_eq!(all, ["name", "email", "password"]);

        let update: Vec<&str> = schema
            .fields_for(Some("update"))
            .unwrap()
            .iter()
            .map(|f| f.name())
            .collect();
        assert_eq!(update, ["email", "name"]);

        assert_eq!(
            schema.fields_for(Some("delete")).unwrap_err(),
            SchemaError::UnknownScene("delete".into())
        );
    }

    #[test]
    fn test_scene_with_undeclared_field() {
        let err = compile(&SchemaSpec::new().field("name", "required").scene("s", ["nope"]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownSceneField { .. }));
    }

    #[test]
    fn test_message_lookup_prefers_field_key() {
        let schema = compile(
            &SchemaSpec::new()
                .field("email", "required")
                .message("required", "generic")
                .message("email.required", "specific"),
        )
        .unwrap();
        assert_eq!(schema.message("email", "required"), Some("specific"));
        assert_eq!(schema.message("name", "required"), Some("generic"));
        assert_eq!(schema.message("name", "slug"), None);
    }

    #[test]
    fn test_value_lookup_by_path() {
        let schema = compile(
            &SchemaSpec::new()
                .field("address.city", "required")
                .field("tags.1", "slug")
                .field("missing.deep", "required"),
        )
        .unwrap();
        let root = json!({"address": {"city": "Oslo"}, "tags": ["a", "b-c"]});

        assert_eq!(schema.fields()[0].value_in(&root), &json!("Oslo"));
        assert_eq!(schema.fields()[1].value_in(&root), &json!("b-c"));
        assert_eq!(schema.fields()[2].value_in(&root), &Value::Null);
    }
}
