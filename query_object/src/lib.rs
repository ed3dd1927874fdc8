//! Query Object - host query layer for SpecHaus
//!
//! This crate provides entity metadata, a validated SELECT query builder,
//! finalized queries and their execution through `sqlx`.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod entity;
pub mod errors;
pub mod execute;
pub mod prelude;
pub mod query;
pub mod query_builder;
pub mod validation;

pub use entity::{Entity, EntityType};
pub use errors::QueryError;
pub use execute::HINT_STATEMENT_TIMEOUT_MS;
pub use query::Query;
pub use query_builder::{
    Expr, JoinClause, JoinType, LogicalOperator, QueryBuilder, QueryOperator, SelectField,
    SortOrder,
};
pub use validation::{FieldRef, ValidatedAlias, ValidatedFieldName, ValidatedTableName, ValidationError};

#[doc(hidden)]
pub use tracing;
