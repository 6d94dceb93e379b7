//! Count queries: the only statement shape the database rules ever issue.

use std::fmt;

use serde_json::Value;

// ============================================================================
// IDENTIFIER
// ============================================================================

/// A table or column name that is safe to splice into SQL text.
///
/// Accepts `name` or `schema.name`, each part matching
/// `[A-Za-z_][A-Za-z0-9_]*` and at most 63 bytes long.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

const MAX_IDENTIFIER_PART: usize = 63;

impl Identifier {
    /// Parses a name, returning `None` if it is not a plain identifier.
    pub fn parse(name: &str) -> Option<Self> {
        let mut parts = 0;
        for part in name.split('.') {
            parts += 1;
            if parts > 2 || !Self::is_valid_part(part) {
                return None;
            }
        }
        Some(Self(name.to_owned()))
    }

    fn is_valid_part(part: &str) -> bool {
        let mut chars = part.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        part.len() <= MAX_IDENTIFIER_PART
            && (first.is_ascii_alphabetic() || first == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// The name as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// FILTER VALUE
// ============================================================================

/// A value bound to a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// Double precision float.
    Float(f64),
    /// Text.
    Text(String),
}

impl FilterValue {
    /// Types a literal taken from a rule line: integers bind as integers,
    /// everything else as text.
    pub fn from_arg(arg: &str) -> Self {
        arg.parse::<i64>()
            .map_or_else(|_| Self::Text(arg.to_owned()), Self::Int)
    }

    /// Converts a field value. Arrays and objects bind as their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(f) = n.as_f64().filter(|_| !n.is_u64()) {
                    Self::Float(f)
                } else {
                    Self::Text(n.to_string())
                }
            }
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

// ============================================================================
// COUNT QUERY
// ============================================================================

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `column = value`
    Eq,
    /// `column <> value`
    NotEq,
}

impl FilterOp {
    /// SQL operator text.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
        }
    }
}

/// One `column op value` term of a `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column compared.
    pub column: Identifier,
    /// Comparison.
    pub op: FilterOp,
    /// Bound value.
    pub value: FilterValue,
}

/// Placeholder dialect used when rendering SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` (SQLite, MySQL)
    QuestionMark,
    /// `$1`, `$2`, … (PostgreSQL)
    Dollar,
}

/// `SELECT COUNT(*) FROM table WHERE f1 AND f2 AND …`.
///
/// Filters are rendered and bound in the order they were added.
///
/// ```
/// use verity_validator::database::{CountQuery, FilterValue, Identifier, Placeholder};
///
/// let users = Identifier::parse("users").unwrap();
/// let email = Identifier::parse("email").unwrap();
/// let id = Identifier::parse("id").unwrap();
///
/// let query = CountQuery::new(users)
///     .filter_eq(email, FilterValue::Text("a@b.io".into()))
///     .filter_ne(id, FilterValue::Int(7));
///
/// assert_eq!(
///     query.to_sql(Placeholder::Dollar),
///     "SELECT COUNT(*) FROM users WHERE email = $1 AND id <> $2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CountQuery {
    table: Identifier,
    filters: Vec<Filter>,
}

impl CountQuery {
    /// A query over `table` with no filters.
    pub fn new(table: Identifier) -> Self {
        Self {
            table,
            filters: Vec::new(),
        }
    }

    /// Appends `column = value`.
    #[must_use = "builder methods must be chained or built"]
    pub fn filter_eq(mut self, column: Identifier, value: FilterValue) -> Self {
        self.filters.push(Filter {
            column,
            op: FilterOp::Eq,
            value,
        });
        self
    }

    /// Appends `column <> value`.
    #[must_use = "builder methods must be chained or built"]
    pub fn filter_ne(mut self, column: Identifier, value: FilterValue) -> Self {
        self.filters.push(Filter {
            column,
            op: FilterOp::NotEq,
            value,
        });
        self
    }

    /// Table counted.
    pub fn table(&self) -> &Identifier {
        &self.table
    }

    /// Filters in bind order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Renders the statement text.
    pub fn to_sql(&self, placeholder: Placeholder) -> String {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        for (i, filter) in self.filters.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(filter.column.as_str());
            sql.push(' ');
            sql.push_str(filter.op.as_sql());
            match placeholder {
                Placeholder::QuestionMark => sql.push_str(" ?"),
                Placeholder::Dollar => sql.push_str(&format!(" ${}", i + 1)),
            }
        }
        sql
    }
}

impl fmt::Display for CountQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "COUNT {}", self.table)?;
        for (i, filter) in self.filters.iter().enumerate() {
            let joiner = if i == 0 { " WHERE" } else { " AND" };
            write!(
                f,
                "{joiner} {} {} {}",
                filter.column,
                filter.op.as_sql(),
                filter.value
            )?;
        }
        Ok(())
    }
}
