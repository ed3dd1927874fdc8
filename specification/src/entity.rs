//! Entity-bound specifications

use std::fmt;
use std::marker::PhantomData;

use query_object::{Entity, EntityType, Expr, QueryBuilder, QueryError};

use crate::traits::Specification;

/// Restricts a specification to repositories of entity `E`
///
/// Built with [`crate::SpecificationExt::for_entity`]. The wrapped
/// specification keeps its own name, so rejection errors still mention it.
pub struct ForEntity<E, S> {
    inner: S,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: Specification> ForEntity<E, S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            _entity: PhantomData,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<E, S: Clone> Clone for ForEntity<E, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity, S: fmt::Debug> fmt::Debug for ForEntity<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForEntity")
            .field("entity", &E::entity_name())
            .field("inner", &self.inner)
            .finish()
    }
}

impl<E: Entity, S: Specification> Specification for ForEntity<E, S> {
    fn is_satisfied_by(&self, entity: &EntityType) -> bool {
        entity.is::<E>() && self.inner.is_satisfied_by(entity)
    }

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        self.inner.modify(query, alias)
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}
