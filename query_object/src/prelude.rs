//! Convenience re-exports for common query-object usage

// Entity metadata
pub use crate::entity::{Entity, EntityType};

// Error types
pub use crate::errors::QueryError;

// Query building
pub use crate::query::Query;
pub use crate::query_builder::{
    Expr, JoinClause, JoinType, QueryBuilder, QueryOperator, SelectField, SortOrder,
};

// Validation
pub use crate::validation::{ValidatedAlias, ValidatedFieldName, ValidatedTableName, ValidationError};

// Common external dependencies that are frequently used
pub use serde_json::{json, Value};
pub use sqlx::{FromRow, PgPool};
