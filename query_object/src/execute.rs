//! Query execution
//!
//! Thin `sqlx` layer over a finalized [`Query`]. Every call runs in its own
//! transaction so that session-level hints apply to this statement only.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::errors::QueryError;
use crate::query::Query;

/// Hint read by the executor: statement timeout in milliseconds
pub const HINT_STATEMENT_TIMEOUT_MS: &str = "statement_timeout_ms";

// Macro for the shared parameter binding logic
macro_rules! bind_json_param {
    ($query:expr, $param:expr) => {
        match $param {
            serde_json::Value::String(s) => {
                if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                    $query.bind(dt.with_timezone(&chrono::Utc))
                } else if let Ok(uuid) = uuid::Uuid::parse_str(&s) {
                    $query.bind(uuid)
                } else {
                    $query.bind(s)
                }
            }
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                        $query.bind(i as i32)
                    } else {
                        $query.bind(i)
                    }
                } else if let Some(f) = n.as_f64() {
                    $query.bind(f)
                } else {
                    $query.bind(n.to_string())
                }
            }
            serde_json::Value::Bool(b) => $query.bind(b),
            serde_json::Value::Null => $query.bind(Option::<String>::None),
            other => $query.bind(other.to_string()),
        }
    };
}

impl Query {
    /// Fetch every row, hydrated as `T`
    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>, QueryError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = self.sql();
        let mut tx = self.begin(pool).await?;

        let mut query = sqlx::query_as::<_, T>(&sql);
        for param in self.params().iter().cloned() {
            query = bind_json_param!(query, param);
        }

        let rows = query
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| self.db_error("fetch_all", e))?;
        tx.commit().await.map_err(|e| self.db_error("commit", e))?;

        crate::debug_log!("[FETCH_ALL] {} rows from {}", rows.len(), self.entity());
        Ok(rows)
    }

    /// Fetch at most one row
    pub async fn fetch_optional<T>(&self, pool: &PgPool) -> Result<Option<T>, QueryError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = self.sql();
        let mut tx = self.begin(pool).await?;

        let mut query = sqlx::query_as::<_, T>(&sql);
        for param in self.params().iter().cloned() {
            query = bind_json_param!(query, param);
        }

        let row = query
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| self.db_error("fetch_optional", e))?;
        tx.commit().await.map_err(|e| self.db_error("commit", e))?;

        Ok(row)
    }

    /// Run a `COUNT` query and return the count
    ///
    /// The count is a single row, so a result window that skips it (an
    /// offset past the first row or a limit of 0) is rejected with
    /// [`QueryError::InvalidPagination`] instead of being sent.
    pub async fn fetch_count(&self, pool: &PgPool) -> Result<i64, QueryError> {
        self.check_count()?;

        let sql = self.sql();
        let mut tx = self.begin(pool).await?;

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for param in self.params().iter().cloned() {
            query = bind_json_param!(query, param);
        }

        let total = query
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| self.db_error("fetch_count", e))?;
        tx.commit().await.map_err(|e| self.db_error("commit", e))?;

        Ok(total)
    }

    fn check_count(&self) -> Result<(), QueryError> {
        if !self.is_count() {
            return Err(QueryError::NotACountQuery(self.entity().to_string()));
        }
        if let Some(offset) = self.first_result().filter(|offset| *offset > 0) {
            return Err(QueryError::InvalidPagination(format!(
                "count of '{}' cannot skip {} rows",
                self.entity(),
                offset
            )));
        }
        if self.max_results() == Some(0) {
            return Err(QueryError::InvalidPagination(format!(
                "count of '{}' cannot be limited to 0 rows",
                self.entity()
            )));
        }
        Ok(())
    }

    async fn begin(&self, pool: &PgPool) -> Result<Transaction<'static, Postgres>, QueryError> {
        let mut tx = pool.begin().await.map_err(|e| self.db_error("begin", e))?;

        if let Some(timeout) = self.statement_timeout_ms() {
            // SET does not accept bind parameters; the value is a validated integer
            sqlx::query(&format!("SET LOCAL statement_timeout = {}", timeout))
                .execute(&mut *tx)
                .await
                .map_err(|e| self.db_error("set_statement_timeout", e))?;
        }

        Ok(tx)
    }

    /// Statement timeout hint, when present and a non-negative integer
    pub fn statement_timeout_ms(&self) -> Option<u64> {
        self.hint(HINT_STATEMENT_TIMEOUT_MS)
            .and_then(serde_json::Value::as_u64)
    }

    fn db_error(&self, operation: &'static str, source: sqlx::Error) -> QueryError {
        QueryError::database_operation(self.entity().table(), operation, source)
    }
}
