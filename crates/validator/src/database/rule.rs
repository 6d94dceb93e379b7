//! `unique`, `exists` and `unique_multi`: typed arguments and evaluation.

use std::fmt;

use serde_json::Value;

use super::query::{CountQuery, FilterValue, Identifier};
use super::{DatabaseError, RowCounter};
use crate::error::SchemaError;

// ============================================================================
// RULE KIND
// ============================================================================

/// Which database rule a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseRuleKind {
    /// `unique:table,column[,ignore_column,ignore_value]`
    Unique,
    /// `exists:table,column[,column,value]*`
    Exists,
    /// `unique_multi:table,column[,column,value]*`
    UniqueMulti,
}

impl DatabaseRuleKind {
    /// All kinds, in registration order.
    pub const ALL: [Self; 3] = [Self::Unique, Self::Exists, Self::UniqueMulti];

    /// Rule name used in rule lines.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Exists => "exists",
            Self::UniqueMulti => "unique_multi",
        }
    }

    /// Whether a row count satisfies the rule.
    pub fn accepts(self, count: u64) -> bool {
        match self {
            Self::Unique | Self::UniqueMulti => count == 0,
            Self::Exists => count > 0,
        }
    }
}

impl fmt::Display for DatabaseRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ROW FILTER
// ============================================================================

/// A column/value pair taken from a rule line.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Column compared.
    pub column: Identifier,
    /// Literal it is compared with.
    pub value: FilterValue,
}

/// Parsed arguments of a database rule.
///
/// The field value is always compared against `column`; `constraints` are
/// ANDed after it in rule-line order and `exclusion` (only for `unique`)
/// comes last as a `<>` term.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFilter {
    /// Table counted.
    pub table: Identifier,
    /// Column holding the field value.
    pub column: Identifier,
    /// Extra equality constraints.
    pub constraints: Vec<Constraint>,
    /// Row excluded from a uniqueness check, e.g. the record being updated.
    pub exclusion: Option<Constraint>,
}

impl RowFilter {
    /// Parses rule-line arguments for `kind`.
    ///
    /// `field` only labels errors.
    pub fn parse(kind: DatabaseRuleKind, field: &str, args: &[String]) -> Result<Self, SchemaError> {
        let rule = kind.name();
        let ident = |name: &str| {
            Identifier::parse(name).ok_or_else(|| SchemaError::InvalidIdentifier {
                field: field.to_owned(),
                rule: rule.to_owned(),
                identifier: name.to_owned(),
            })
        };

        let [table, column, rest @ ..] = args else {
            return Err(SchemaError::invalid_arguments(
                field,
                rule,
                "expected at least a table and a column",
            ));
        };

        let mut filter = Self {
            table: ident(table.as_str())?,
            column: ident(column.as_str())?,
            constraints: Vec::new(),
            exclusion: None,
        };

        match kind {
            DatabaseRuleKind::Unique => match rest {
                [] => {}
                [ignore_column, ignore_value] => {
                    filter.exclusion = Some(Constraint {
                        column: ident(ignore_column.as_str())?,
                        value: FilterValue::from_arg(ignore_value),
                    });
                }
                [ignore_column] => {
                    return Err(SchemaError::invalid_arguments(
                        field,
                        rule,
                        format!("ignore column '{ignore_column}' has no value"),
                    ));
                }
                _ => {
                    return Err(SchemaError::invalid_arguments(
                        field,
                        rule,
                        "expected at most four arguments",
                    ));
                }
            },
            DatabaseRuleKind::Exists | DatabaseRuleKind::UniqueMulti => {
                for pair in rest.chunks(2) {
                    let [column, value] = pair else {
                        return Err(SchemaError::invalid_arguments(
                            field,
                            rule,
                            format!("filter column '{}' has no value", pair[0]),
                        ));
                    };
                    filter.constraints.push(Constraint {
                        column: ident(column.as_str())?,
                        value: FilterValue::from_arg(value),
                    });
                }
            }
        }

        Ok(filter)
    }

    /// Builds the count query for one field value.
    pub fn query_for(&self, value: &Value) -> CountQuery {
        let mut query = CountQuery::new(self.table.clone())
            .filter_eq(self.column.clone(), FilterValue::from_json(value));
        for constraint in &self.constraints {
            query = query.filter_eq(constraint.column.clone(), constraint.value.clone());
        }
        if let Some(exclusion) = &self.exclusion {
            query = query.filter_ne(exclusion.column.clone(), exclusion.value.clone());
        }
        query
    }
}

// ============================================================================
// DATABASE RULE
// ============================================================================

/// A compiled database rule: kind plus parsed filter.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseRule {
    kind: DatabaseRuleKind,
    filter: RowFilter,
}

impl DatabaseRule {
    /// Parses the arguments of `kind`.
    pub fn parse(kind: DatabaseRuleKind, field: &str, args: &[String]) -> Result<Self, SchemaError> {
        Ok(Self {
            kind,
            filter: RowFilter::parse(kind, field, args)?,
        })
    }

    /// Rule kind.
    pub fn kind(&self) -> DatabaseRuleKind {
        self.kind
    }

    /// Parsed filter.
    pub fn filter(&self) -> &RowFilter {
        &self.filter
    }

    /// Runs one count query and applies the rule's verdict.
    pub async fn check(
        &self,
        counter: &dyn RowCounter,
        value: &Value,
    ) -> Result<bool, DatabaseError> {
        let query = self.filter.query_for(value);
        tracing::debug!(
            rule = self.kind.name(),
            table = %query.table(),
            filters = query.filters().len(),
            "running database rule"
        );
        let count = counter.count(&query).await?;
        Ok(self.kind.accepts(count))
    }
}
