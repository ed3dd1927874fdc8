//! Specification repositories
//!
//! A [`SpecificationRepository`] is bound to one entity type and one alias.
//! It turns a [`Specification`] into a finalized [`Query`]: the specification
//! is checked against the entity, gets a fresh query context to shape, and its
//! condition becomes the WHERE clause. An optional [`Modifier`] then adjusts
//! the finalized query.

use std::fmt;
use std::marker::PhantomData;

use config::RepositoryConfig;
use query_object::{Entity, EntityType, Query, QueryBuilder, SelectField, ValidatedAlias};
use specification::{Modifier, Specification};

use crate::errors::RepositoryError;

/// Alias used when none is configured
pub const DEFAULT_ALIAS: &str = config::DEFAULT_ALIAS;

/// Builds queries over `E` from specifications
pub struct SpecificationRepository<E> {
    alias: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> SpecificationRepository<E> {
    /// Repository using the default alias `e`
    pub fn new() -> Self {
        Self {
            alias: DEFAULT_ALIAS.to_string(),
            _entity: PhantomData,
        }
    }

    /// Repository referencing its entity under `alias`
    pub fn with_alias(alias: &str) -> Result<Self, RepositoryError> {
        let alias = ValidatedAlias::new(alias).map_err(query_object::QueryError::from)?;
        Ok(Self {
            alias: alias.into_string(),
            _entity: PhantomData,
        })
    }

    pub fn from_config(config: &RepositoryConfig) -> Result<Self, RepositoryError> {
        Self::with_alias(&config.alias)
    }

    pub fn entity_type(&self) -> EntityType {
        EntityType::of::<E>()
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Query selecting every `E` the specification matches
    ///
    /// Fails with [`RepositoryError::UnsupportedSpecification`] before any
    /// query is built when the specification does not apply to `E`. Errors
    /// from the specification, from finalizing the query and from the
    /// modifier are returned unchanged.
    pub fn matching(
        &self,
        specification: &dyn Specification,
        modifier: Option<&dyn Modifier>,
    ) -> Result<Query, RepositoryError> {
        self.build(SelectField::entity(self.alias.as_str()), specification, modifier)
    }

    /// Same as [`Self::matching`], projected to `COUNT(alias)`
    pub fn count_matching(
        &self,
        specification: &dyn Specification,
        modifier: Option<&dyn Modifier>,
    ) -> Result<Query, RepositoryError> {
        self.build(SelectField::count(self.alias.as_str()), specification, modifier)
    }

    fn build(
        &self,
        projection: SelectField,
        specification: &dyn Specification,
        modifier: Option<&dyn Modifier>,
    ) -> Result<Query, RepositoryError> {
        let entity = self.entity_type();
        if !specification.is_satisfied_by(&entity) {
            crate::debug_log!(
                "[SPEC] {} rejected for entity {}",
                specification.name(),
                entity
            );
            return Err(RepositoryError::UnsupportedSpecification {
                specification: specification.name(),
                entity: entity.name().to_string(),
            });
        }

        let mut builder = QueryBuilder::new();
        builder.select(projection).from(entity, &self.alias);

        if let Some(condition) = specification.modify(&mut builder, &self.alias)? {
            if !condition.is_empty() {
                builder.set_where(condition);
            }
        }

        let mut query = builder.get_query()?;

        if let Some(modifier) = modifier {
            modifier.modify(&mut query)?;
        }

        crate::trace_log!("[SPEC] {} -> {}", specification.name(), query.sql());
        Ok(query)
    }
}

impl<E: Entity> Default for SpecificationRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for SpecificationRepository<E> {
    fn clone(&self) -> Self {
        Self {
            alias: self.alias.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for SpecificationRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationRepository")
            .field("entity", &E::entity_name())
            .field("alias", &self.alias)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use query_object::{QueryError, ValidationError};

    struct Invoice;

    impl Entity for Invoice {
        fn entity_name() -> &'static str {
            "Invoice"
        }

        fn table_name() -> &'static str {
            "invoices"
        }
    }

    #[test]
    fn test_default_alias() {
        let repository = SpecificationRepository::<Invoice>::new();

        assert_eq!(repository.alias(), "e");
        assert_eq!(repository.entity_type(), EntityType::of::<Invoice>());
    }

    #[test]
    fn test_alias_from_config() {
        let repository =
            SpecificationRepository::<Invoice>::from_config(&RepositoryConfig::new("inv".to_string()))
                .unwrap();
        assert_eq!(repository.alias(), "inv");

        match SpecificationRepository::<Invoice>::with_alias("order") {
            Err(RepositoryError::Query(QueryError::InvalidIdentifier(
                ValidationError::ReservedKeyword(alias),
            ))) => assert_eq!(alias, "order"),
            other => panic!("Expected reserved keyword error, got {:?}", other),
        }
    }
}
