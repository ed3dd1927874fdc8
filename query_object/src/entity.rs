//! Entity metadata
//!
//! An entity is any type a repository can be bound to. The metadata is
//! static: a logical name used in messages and entity-level renderings, and
//! the table the entity is stored in.

use std::any::TypeId;
use std::fmt;

/// Static metadata about a mapped entity
///
/// Usually derived:
/// ```ignore
/// use entity_derive::Entity;
///
/// #[derive(Entity)]
/// #[entity(table = "users")]
/// pub struct User {
///     pub id: i64,
///     pub active: bool,
/// }
/// ```
pub trait Entity: 'static {
    /// Logical entity name (`User`)
    fn entity_name() -> &'static str;

    /// Table the entity is stored in (`users`)
    fn table_name() -> &'static str;
}

/// Runtime descriptor of an entity type, handed to specifications so they
/// can decide whether they apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityType {
    name: &'static str,
    table: &'static str,
    type_id: TypeId,
}

impl EntityType {
    pub fn of<E: Entity>() -> Self {
        Self {
            name: E::entity_name(),
            table: E::table_name(),
            type_id: TypeId::of::<E>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Whether this descriptor was created for `E`
    pub fn is<E: Entity>(&self) -> bool {
        self.type_id == TypeId::of::<E>()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
