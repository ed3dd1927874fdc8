//! Convenience re-exports for common SpecHaus usage
//!
//! This prelude module re-exports the most commonly used items from the SpecHaus ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use spechaus::prelude::*;
//!
//! // Now you have access to all the common SpecHaus types and traits
//! ```

// Core SpecHaus components
pub use crate::core::SpecHaus;
pub use crate::errors::{RepositoryError, SpecHausError};
pub use crate::repository::SpecificationRepository;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, RepositoryConfig};

// Re-export commonly used query-object types for convenience
pub use query_object::prelude::*;

// Re-export query_object module for derive-generated code
pub use query_object;

// Specifications and modifiers
pub use specification::prelude::*;

// Entity derive for model creation
pub use entity_derive::Entity;

// Common external dependencies
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use sqlx;
pub use tokio;
pub use uuid::Uuid;
