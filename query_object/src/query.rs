//! Finalized queries
//!
//! A [`Query`] is produced by [`crate::QueryBuilder::get_query`]. Its
//! statement, parameters and condition are fixed; what remains adjustable is
//! the result window and the hint map, which is what result modifiers touch.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::entity::EntityType;
use crate::query_builder::expr::Expr;
use crate::query_builder::select::SelectField;
use crate::query_builder::sql_generation::SqlGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    entity: EntityType,
    alias: String,
    select: Vec<SelectField>,
    condition: Option<Expr>,
    statement: String,
    params: Vec<Value>,
    dql: String,
    max_results: Option<u64>,
    first_result: Option<u64>,
    hints: BTreeMap<String, Value>,
}

impl Query {
    pub(crate) fn new(
        entity: EntityType,
        alias: String,
        select: Vec<SelectField>,
        condition: Option<Expr>,
        statement: String,
        params: Vec<Value>,
        dql: String,
    ) -> Self {
        Self {
            entity,
            alias,
            select,
            condition,
            statement,
            params,
            dql,
            max_results: None,
            first_result: None,
            hints: BTreeMap::new(),
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn select(&self) -> &[SelectField] {
        &self.select
    }

    /// Whether the projection is a single row count
    pub fn is_count(&self) -> bool {
        matches!(self.select.as_slice(), [SelectField::Count(_)])
    }

    /// The WHERE condition exactly as it was attached to the builder
    pub fn condition(&self) -> Option<&Expr> {
        self.condition.as_ref()
    }

    /// Statement without the result window
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Parameter values for `$1..$n`, in order
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Executable PostgreSQL statement including LIMIT/OFFSET
    pub fn sql(&self) -> String {
        Self::with_window(&self.statement, self.max_results, self.first_result)
    }

    /// Entity-level rendering with inline values
    /// (`SELECT e FROM User e WHERE e.active = true`)
    pub fn dql(&self) -> String {
        Self::with_window(&self.dql, self.max_results, self.first_result)
    }

    fn with_window(base: &str, limit: Option<u64>, offset: Option<u64>) -> String {
        let window = SqlGenerator::build_limit_clause(limit, offset);
        if window.is_empty() {
            base.to_string()
        } else {
            format!("{} {}", base, window)
        }
    }

    pub fn max_results(&self) -> Option<u64> {
        self.max_results
    }

    pub fn set_max_results(&mut self, max_results: Option<u64>) -> &mut Self {
        self.max_results = max_results;
        self
    }

    pub fn first_result(&self) -> Option<u64> {
        self.first_result
    }

    pub fn set_first_result(&mut self, first_result: Option<u64>) -> &mut Self {
        self.first_result = first_result;
        self
    }

    pub fn hint(&self, name: &str) -> Option<&Value> {
        self.hints.get(name)
    }

    pub fn hints(&self) -> &BTreeMap<String, Value> {
        &self.hints
    }

    pub fn set_hint(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.hints.insert(name.into(), value);
        self
    }
}
