//! Specification and modifier contracts

use query_object::{EntityType, Expr, Query, QueryBuilder, QueryError};

use crate::entity::ForEntity;
use crate::logic::{AndX, Not, OrX};

/// A reusable, composable query criterion
///
/// `is_satisfied_by` decides whether the specification can be applied to a
/// repository's entity. `modify` receives the repository's query context and
/// the alias of the root entity; it may add joins or ordering to the context
/// and returns the condition to use as WHERE clause, or `None` when it has
/// nothing to filter on. A returned expression that renders to nothing
/// (see [`Expr::is_empty`]) is treated exactly like `None`.
pub trait Specification: Send + Sync {
    fn is_satisfied_by(&self, entity: &EntityType) -> bool;

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError>;

    /// Short type name used in error messages
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

impl<S: Specification + ?Sized> Specification for Box<S> {
    fn is_satisfied_by(&self, entity: &EntityType) -> bool {
        (**self).is_satisfied_by(entity)
    }

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        (**self).modify(query, alias)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl<S: Specification + ?Sized> Specification for &S {
    fn is_satisfied_by(&self, entity: &EntityType) -> bool {
        (**self).is_satisfied_by(entity)
    }

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        (**self).modify(query, alias)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Post-processing applied to a finalized query (result window, hints)
pub trait Modifier: Send + Sync {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError>;
}

impl<M: Modifier + ?Sized> Modifier for Box<M> {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError> {
        (**self).modify(query)
    }
}

impl<M: Modifier + ?Sized> Modifier for &M {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError> {
        (**self).modify(query)
    }
}

/// Combinators available on every specification
pub trait SpecificationExt: Specification + Sized + 'static {
    /// Both specifications must hold
    fn and<S: Specification + 'static>(self, other: S) -> AndX {
        AndX::new(vec![Box::new(self), Box::new(other)])
    }

    /// Either specification may hold
    fn or<S: Specification + 'static>(self, other: S) -> OrX {
        OrX::new(vec![Box::new(self), Box::new(other)])
    }

    /// Negated condition
    fn not(self) -> Not {
        Not::new(self)
    }

    /// Restrict to repositories bound to `E`
    fn for_entity<E: query_object::Entity>(self) -> ForEntity<E, Self> {
        ForEntity::new(self)
    }
}

impl<T: Specification + 'static> SpecificationExt for T {}

/// `a::b::Name<c::D>` -> `Name<c::D>`
pub(crate) fn short_type_name(full: &str) -> String {
    let (path, generics) = match full.find('<') {
        Some(idx) => full.split_at(idx),
        None => (full, ""),
    };
    let base = path.rsplit("::").next().unwrap_or(path);
    format!("{}{}", base, generics)
}
