use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValidationError),

    #[error("Query has no FROM clause")]
    MissingFrom,

    #[error("Query selects nothing")]
    EmptySelect,

    #[error("Alias '{0}' is declared more than once")]
    DuplicateAlias(String),

    #[error("Alias '{alias}' is not declared in the query (known aliases: {known})")]
    UnknownAlias { alias: String, known: String },

    #[error("Query for '{0}' does not project a row count")]
    NotACountQuery(String),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Cannot compare '{field}' with NULL using '{operator}'")]
    NullComparison { field: String, operator: &'static str },

    #[error("Database error during {operation} on '{table}': {source}")]
    Database {
        table: String,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl QueryError {
    pub fn database_operation(table: &str, operation: &'static str, source: sqlx::Error) -> Self {
        Self::Database {
            table: table.to_string(),
            operation,
            source,
        }
    }
}
