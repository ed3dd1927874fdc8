//! Query-shaping specifications
//!
//! These add joins, ordering or grouping to the query context and never
//! contribute a condition, so they combine freely with condition
//! specifications inside an [`crate::AndX`].

use query_object::{EntityType, Expr, JoinClause, JoinType, QueryBuilder, QueryError, SortOrder};

use crate::condition::Field;
use crate::traits::Specification;

/// Join another table to the root entity (or to an earlier join)
///
/// Applying the same join twice is a no-op. A different join that reuses an
/// alias already in the query is kept and fails as a duplicate alias when the
/// query is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    join_type: JoinType,
    table: String,
    alias: String,
    local: Field,
    foreign: String,
}

impl Join {
    pub fn new(join_type: JoinType, table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            join_type,
            table: table.into(),
            alias: alias.into(),
            local: Field::new("id"),
            foreign: "id".to_string(),
        }
    }

    pub fn inner(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(JoinType::Inner, table, alias)
    }

    pub fn left(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(JoinType::Left, table, alias)
    }

    /// Join condition `<from>.<local> = <alias>.<foreign>`
    pub fn on(mut self, local: impl Into<String>, foreign: impl Into<String>) -> Self {
        self.local = Field::new(local);
        self.foreign = foreign.into();
        self
    }

    /// Join from another alias than the repository's root
    pub fn from_alias(mut self, alias: impl Into<String>) -> Self {
        self.local.alias = Some(alias.into());
        self
    }
}

impl Specification for Join {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        let local = self.local.qualify(alias)?;
        let foreign = Field::new(self.foreign.as_str()).qualify(&self.alias)?;
        let clause = JoinClause::new_on(
            self.join_type,
            self.table.as_str(),
            self.alias.as_str(),
            local,
            foreign,
        );
        if query.joins().contains(&clause) {
            return Ok(None);
        }

        query_object::debug_log!("[JOIN] {} {} ({:?})", self.table, self.alias, self.join_type);
        query.join(clause);
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    field: Field,
    order: SortOrder,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: Field::new(field),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    pub fn in_alias(mut self, alias: impl Into<String>) -> Self {
        self.field.alias = Some(alias.into());
        self
    }
}

impl Specification for OrderBy {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        query.add_order_by(&self.field.qualify(alias)?, self.order);
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBy {
    field: Field,
}

impl GroupBy {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: Field::new(field),
        }
    }

    pub fn in_alias(mut self, alias: impl Into<String>) -> Self {
        self.field.alias = Some(alias.into());
        self
    }
}

impl Specification for GroupBy {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        query.add_group_by(&self.field.qualify(alias)?);
        Ok(None)
    }
}
