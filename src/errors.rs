//! Error types for the SpecHaus crate
//!
//! This module contains all error types that can be returned by SpecHaus operations.

use query_object::QueryError;
use thiserror::Error;

/// Errors raised while turning a specification into a query
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Specification \"{specification}\" not supported by this repository (entity \"{entity}\")")]
    UnsupportedSpecification {
        specification: String,
        entity: String,
    },

    #[error(transparent)]
    Query(#[from] QueryError),
}

#[derive(Error, Debug)]
pub enum SpecHausError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<QueryError> for SpecHausError {
    fn from(error: QueryError) -> Self {
        SpecHausError::Repository(RepositoryError::Query(error))
    }
}
