//! Database-backed rules
//!
//! `unique`, `exists` and `unique_multi` each issue exactly one
//! `SELECT COUNT(*)` through a [`RowCounter`]. The validator never builds SQL
//! from request data: table and column names come from the schema and are
//! checked as [`Identifier`]s when the schema is compiled, and every value is
//! a bound parameter.
//!
//! # Rule syntax
//!
//! ```text
//! unique:users,email              no row with email = value
//! unique:users,email,id,1         ... ignoring the row with id = 1
//! exists:categories,id            at least one row with id = value
//! exists:items,id,shop_id,5       ... that also has shop_id = 5
//! unique_multi:members,user_id,project_id,5
//! ```
//!
//! # Backends
//!
//! With the `sqlite` (default) or `postgres` feature, `sqlx::SqlitePool` and
//! `sqlx::PgPool` implement [`RowCounter`] directly.

#[cfg(any(feature = "sqlite", feature = "postgres"))]
mod backend;
mod query;
mod rule;

use std::sync::Arc;

use async_trait::async_trait;

pub use query::{CountQuery, Filter, FilterOp, FilterValue, Identifier, Placeholder};
pub use rule::{Constraint, DatabaseRule, DatabaseRuleKind, RowFilter};

// ============================================================================
// ROW COUNTER
// ============================================================================

/// Anything that can run a [`CountQuery`].
///
/// Implementations must bind filter values as parameters, in
/// [`CountQuery::filters`] order.
#[async_trait]
pub trait RowCounter: Send + Sync {
    /// Number of rows matching every filter.
    async fn count(&self, query: &CountQuery) -> Result<u64, DatabaseError>;
}

#[async_trait]
impl<T: RowCounter + ?Sized> RowCounter for Arc<T> {
    async fn count(&self, query: &CountQuery) -> Result<u64, DatabaseError> {
        (**self).count(query).await
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Failure of the database behind a rule.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DatabaseError {
    /// The driver rejected or failed the statement.
    #[error("count query on '{table}' failed: {source}")]
    Query {
        /// Table counted.
        table: String,
        /// Driver error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The driver returned a count below zero.
    #[error("count query on '{table}' returned {count}")]
    NegativeCount {
        /// Table counted.
        table: String,
        /// Returned value.
        count: i64,
    },
}

impl DatabaseError {
    /// Wraps a driver error for a query on `table`.
    pub fn query(
        table: &Identifier,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Query {
            table: table.to_string(),
            source: source.into(),
        }
    }

    /// Converts a signed driver count.
    pub fn check_count(table: &Identifier, count: i64) -> Result<u64, Self> {
        u64::try_from(count).map_err(|_| Self::NegativeCount {
            table: table.to_string(),
            count,
        })
    }
}
