//! Logical composition of specifications

use query_object::{EntityType, Expr, LogicalOperator, QueryBuilder, QueryError};

use crate::traits::Specification;

type Children = Vec<Box<dyn Specification>>;

/// Run every child against the query context and keep the conditions that
/// render to something
fn child_conditions(
    children: &Children,
    query: &mut QueryBuilder,
    alias: &str,
) -> Result<Vec<Expr>, QueryError> {
    let mut conditions = Vec::with_capacity(children.len());
    for child in children {
        if let Some(condition) = child.modify(query, alias)? {
            if !condition.is_empty() {
                conditions.push(condition);
            }
        }
    }
    Ok(conditions)
}

/// Join conditions with `operator`, splicing in child groups that already
/// use it so that chained `and`/`or` calls stay flat
fn combine(conditions: Vec<Expr>, operator: LogicalOperator) -> Option<Expr> {
    let mut filters = Vec::with_capacity(conditions.len());
    for condition in conditions {
        match condition {
            Expr::Group {
                operator: inner,
                filters: nested,
            } if inner == operator => filters.extend(nested),
            other => filters.push(other),
        }
    }

    match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(Expr::Group { operator, filters }),
    }
}

/// Conjunction: every child applies, conditions joined with AND
#[derive(Default)]
pub struct AndX {
    children: Children,
}

impl AndX {
    pub fn new(children: Vec<Box<dyn Specification>>) -> Self {
        Self { children }
    }

    pub fn with<S: Specification + 'static>(mut self, child: S) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Specification for AndX {
    fn is_satisfied_by(&self, entity: &EntityType) -> bool {
        self.children.iter().all(|c| c.is_satisfied_by(entity))
    }

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        let conditions = child_conditions(&self.children, query, alias)?;
        Ok(combine(conditions, LogicalOperator::And))
    }
}

/// Disjunction: conditions joined with OR
///
/// Every child still contributes its joins and ordering to the query, so an
/// `OrX` only applies to entities all of its children support.
#[derive(Default)]
pub struct OrX {
    children: Children,
}

impl OrX {
    pub fn new(children: Vec<Box<dyn Specification>>) -> Self {
        Self { children }
    }

    pub fn with<S: Specification + 'static>(mut self, child: S) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Specification for OrX {
    fn is_satisfied_by(&self, entity: &EntityType) -> bool {
        self.children.iter().all(|c| c.is_satisfied_by(entity))
    }

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        let conditions = child_conditions(&self.children, query, alias)?;
        Ok(combine(conditions, LogicalOperator::Or))
    }
}

/// Negation of a child's condition; no condition when the child has none
pub struct Not {
    child: Box<dyn Specification>,
}

impl Not {
    pub fn new<S: Specification + 'static>(child: S) -> Self {
        Self {
            child: Box::new(child),
        }
    }
}

impl Specification for Not {
    fn is_satisfied_by(&self, entity: &EntityType) -> bool {
        self.child.is_satisfied_by(entity)
    }

    fn modify(&self, query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        Ok(self
            .child
            .modify(query, alias)?
            .filter(|condition| !condition.is_empty())
            .map(Expr::not))
    }
}
