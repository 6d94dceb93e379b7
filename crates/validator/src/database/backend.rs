//! `RowCounter` for sqlx pools.

use async_trait::async_trait;

use super::{CountQuery, DatabaseError, FilterValue, Placeholder, RowCounter};

macro_rules! impl_row_counter {
    ($(#[$meta:meta])* $pool:ty, $placeholder:expr) => {
        $(#[$meta])*
        #[async_trait]
        impl RowCounter for $pool {
            async fn count(&self, query: &CountQuery) -> Result<u64, DatabaseError> {
                let sql = query.to_sql($placeholder);
                let mut statement = sqlx::query_scalar::<_, i64>(&sql);
                for filter in query.filters() {
                    statement = match &filter.value {
                        FilterValue::Null => statement.bind(None::<String>),
                        FilterValue::Bool(b) => statement.bind(*b),
                        FilterValue::Int(i) => statement.bind(*i),
                        FilterValue::Float(f) => statement.bind(*f),
                        FilterValue::Text(s) => statement.bind(s.clone()),
                    };
                }

                let count = statement
                    .fetch_one(self)
                    .await
                    .map_err(|e| DatabaseError::query(query.table(), e))?;
                DatabaseError::check_count(query.table(), count)
            }
        }
    };
}

#[cfg(feature = "sqlite")]
impl_row_counter!(
    /// Counts through a SQLite pool, binding `?` placeholders.
    sqlx::SqlitePool,
    Placeholder::QuestionMark
);

#[cfg(feature = "postgres")]
impl_row_counter!(
    /// Counts through a PostgreSQL pool, binding `$n` placeholders.
    sqlx::PgPool,
    Placeholder::Dollar
);
