//! Core SpecHaus functionality
//!
//! This module contains the main SpecHaus struct: it owns the connection pool,
//! hands out specification repositories configured from [`RepositoryConfig`]
//! and runs the queries they build.

use sqlx::PgPool;
use sqlx::postgres::PgRow;
use std::time::Duration;

use config::{AppConfig, DatabaseConfig, RepositoryConfig};
use query_object::Entity;
use specification::{Limit, Modifier, Specification};

use crate::errors::SpecHausError;
use crate::repository::SpecificationRepository;

/// Main SpecHaus coordinator that manages the database connection and repositories
pub struct SpecHaus {
    pool: PgPool,
    repository: RepositoryConfig,
}

impl SpecHaus {
    /// Create new SpecHaus with database connection and default repository settings
    pub async fn new(config: DatabaseConfig) -> Result<Self, SpecHausError> {
        let pool = Self::connect(&config).await?;

        Ok(Self {
            pool,
            repository: RepositoryConfig::default(),
        })
    }

    /// Create SpecHaus from a complete application configuration
    pub async fn from_config(config: &AppConfig) -> Result<Self, SpecHausError> {
        let pool = Self::connect(&config.database).await?;

        Ok(Self {
            pool,
            repository: config.repository.clone(),
        })
    }

    /// Wrap an existing pool
    pub fn with_pool(pool: PgPool, repository: RepositoryConfig) -> Self {
        Self { pool, repository }
    }

    async fn connect(config: &DatabaseConfig) -> Result<PgPool, SpecHausError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        crate::debug_log!(
            "[CONNECT] {}:{}/{} (max {} connections)",
            config.host,
            config.port,
            config.database,
            config.max_connections
        );

        Ok(pool_options.connect(&connection_string).await?)
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Repository for `E` using the configured alias
    pub fn repository<E: Entity>(&self) -> Result<SpecificationRepository<E>, SpecHausError> {
        Ok(SpecificationRepository::from_config(&self.repository)?)
    }

    /// Fetch every `E` matching the specification
    pub async fn find_matching<E>(
        &self,
        specification: &dyn Specification,
        modifier: Option<&dyn Modifier>,
    ) -> Result<Vec<E>, SpecHausError>
    where
        E: Entity + for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let query = self
            .repository::<E>()?
            .matching(specification, modifier)?;
        Ok(query.fetch_all::<E>(&self.pool).await?)
    }

    /// First `E` matching the specification, if any
    pub async fn find_one_matching<E>(
        &self,
        specification: &dyn Specification,
    ) -> Result<Option<E>, SpecHausError>
    where
        E: Entity + for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let query = self
            .repository::<E>()?
            .matching(specification, Some(&Limit(1)))?;
        Ok(query.fetch_optional::<E>(&self.pool).await?)
    }

    /// Count the `E` rows matching the specification
    ///
    /// Ordering from the specification is dropped from the count. A modifier
    /// that pages past the single count row fails with
    /// [`QueryError::InvalidPagination`](query_object::QueryError::InvalidPagination).
    pub async fn count_where_matching<E: Entity>(
        &self,
        specification: &dyn Specification,
        modifier: Option<&dyn Modifier>,
    ) -> Result<i64, SpecHausError> {
        let query = self
            .repository::<E>()?
            .count_matching(specification, modifier)?;
        Ok(query.fetch_count(&self.pool).await?)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), SpecHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
