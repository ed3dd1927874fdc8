//! # SpecHaus
//!
//! The Specification pattern for PostgreSQL: filtering and ordering logic is
//! written once as composable [`Specification`](specification::Specification)
//! objects and applied through typed repositories.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spechaus::prelude::*;
//!
//! #[derive(Debug, FromRow, Entity)]
//! #[entity(table = "users")]
//! pub struct User {
//!     pub id: i32,
//!     pub email: String,
//!     pub active: bool,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 5432, "spechaus".to_string(),
//!         "postgres".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!
//!     let spechaus = SpecHaus::new(config).await?;
//!
//!     let active = Comparison::eq("active", true).and(OrderBy::asc("email"));
//!     let query = spechaus
//!         .repository::<User>()?
//!         .matching(&active, Some(&Page::new(1, 20)))?;
//!     println!("{}", query.dql());
//!
//!     let users: Vec<User> = query.fetch_all(spechaus.pool()).await?;
//!     let total = spechaus
//!         .count_where_matching::<User>(&Comparison::eq("active", true), None)
//!         .await?;
//!     println!("{} of {} active users", users.len(), total);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
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
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;
pub mod repository;

// Re-export the main public types for convenience
pub use crate::core::SpecHaus;
pub use crate::errors::{RepositoryError, SpecHausError};
pub use crate::repository::SpecificationRepository;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, RepositoryConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated derive code to work correctly
pub use entity_derive;
pub use query_object;
pub use specification;

// Re-export external dependencies used in public API
pub use sqlx;
