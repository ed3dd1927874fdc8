//! Query builder
//!
//! The mutable query context. A repository creates one per call, lets a
//! specification add joins, ordering and conditions to it, then consumes it
//! with [`QueryBuilder::get_query`].

use std::collections::BTreeSet;

use crate::entity::EntityType;
use crate::errors::QueryError;
use crate::query::Query;
use crate::query_builder::expr::{Expr, LogicalOperator};
use crate::query_builder::join::{JoinClause, JoinCondition};
use crate::query_builder::ordering::{OrderItem, SortOrder};
use crate::query_builder::select::SelectField;
use crate::query_builder::sql_generation::{ParamStyle, SqlGenerator};
use crate::validation::{FieldRef, ValidatedAlias, ValidatedFieldName, ValidatedTableName};

/// Root of the FROM clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromClause {
    pub entity: EntityType,
    pub alias: String,
}

/// Builder for SELECT statements over a single root entity
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) select: Vec<SelectField>,
    pub(crate) from: Option<FromClause>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) condition: Option<Expr>,
    pub(crate) group_by: Vec<String>,
    pub(crate) order_by: Vec<OrderItem>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the SELECT list
    pub fn select(&mut self, field: SelectField) -> &mut Self {
        self.select = vec![field];
        self
    }

    /// Append to the SELECT list
    pub fn add_select(&mut self, field: SelectField) -> &mut Self {
        self.select.push(field);
        self
    }

    /// Set the root entity and its alias
    pub fn from(&mut self, entity: EntityType, alias: &str) -> &mut Self {
        self.from = Some(FromClause {
            entity,
            alias: alias.to_string(),
        });
        self
    }

    pub fn join(&mut self, join: JoinClause) -> &mut Self {
        self.joins.push(join);
        self
    }

    /// Set the WHERE condition, replacing any previous one
    pub fn set_where(&mut self, condition: Expr) -> &mut Self {
        self.condition = Some(condition);
        self
    }

    /// Combine with the current WHERE condition using AND
    pub fn and_where(&mut self, condition: Expr) -> &mut Self {
        self.combine_where(LogicalOperator::And, condition)
    }

    /// Combine with the current WHERE condition using OR
    pub fn or_where(&mut self, condition: Expr) -> &mut Self {
        self.combine_where(LogicalOperator::Or, condition)
    }

    fn combine_where(&mut self, operator: LogicalOperator, condition: Expr) -> &mut Self {
        self.condition = Some(match self.condition.take() {
            None => condition,
            Some(Expr::Group {
                operator: current,
                mut filters,
            }) if current == operator => {
                filters.push(condition);
                Expr::Group { operator, filters }
            }
            Some(existing) => Expr::Group {
                operator,
                filters: vec![existing, condition],
            },
        });
        self
    }

    /// Replace ORDER BY
    pub fn order_by(&mut self, field: &str, order: SortOrder) -> &mut Self {
        self.order_by = vec![OrderItem::new(field, order)];
        self
    }

    /// Append to ORDER BY
    pub fn add_order_by(&mut self, field: &str, order: SortOrder) -> &mut Self {
        self.order_by.push(OrderItem::new(field, order));
        self
    }

    pub fn add_group_by(&mut self, field: &str) -> &mut Self {
        self.group_by.push(field.to_string());
        self
    }

    /// Alias of the root entity, if FROM is set
    pub fn root_alias(&self) -> Option<&str> {
        self.from.as_ref().map(|from| from.alias.as_str())
    }

    /// Root alias followed by join aliases, in declaration order
    pub fn aliases(&self) -> Vec<&str> {
        self.root_alias()
            .into_iter()
            .chain(self.joins.iter().map(|join| join.alias.as_str()))
            .collect()
    }

    pub fn has_join(&self, alias: &str) -> bool {
        self.joins.iter().any(|join| join.alias == alias)
    }

    pub fn condition(&self) -> Option<&Expr> {
        self.condition.as_ref()
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    /// Single `COUNT(alias)` projection without grouping
    fn is_plain_count(&self) -> bool {
        self.group_by.is_empty() && matches!(self.select.as_slice(), [SelectField::Count(_)])
    }

    /// Validate every identifier and alias reference, render the statement
    /// and hand it over as a [`Query`]
    pub fn get_query(self) -> Result<Query, QueryError> {
        let from = self.from.as_ref().ok_or(QueryError::MissingFrom)?;
        if self.select.is_empty() {
            return Err(QueryError::EmptySelect);
        }

        ValidatedTableName::new(from.entity.table())?;
        let mut known = BTreeSet::new();
        for alias in self.aliases() {
            let alias = ValidatedAlias::new(alias)?.into_string();
            if known.contains(&alias) {
                return Err(QueryError::DuplicateAlias(alias));
            }
            known.insert(alias);
        }

        for join in &self.joins {
            ValidatedTableName::new(&join.table)?;
            if let JoinCondition::Using(columns) = &join.condition {
                for column in columns {
                    ValidatedFieldName::new(column)?;
                }
            }
        }

        for field in &self.select {
            match field {
                SelectField::Entity(alias) | SelectField::Count(alias) => {
                    check_alias(&known, alias)?
                }
                SelectField::Field(reference) => check_field(&known, reference)?,
            }
        }

        let references = self
            .joins
            .iter()
            .flat_map(JoinClause::fields)
            .chain(self.condition.iter().flat_map(Expr::fields))
            .chain(self.group_by.iter().map(String::as_str))
            .chain(self.order_by.iter().map(|item| item.field.as_str()));
        for reference in references {
            check_field(&known, reference)?;
        }

        let (statement, params) = self.render(ParamStyle::Positional);
        let (dql, _) = self.render(ParamStyle::Inline);

        crate::debug_log!("[GET_QUERY] {}", statement);

        Ok(Query::new(
            from.entity,
            from.alias.clone(),
            self.select.clone(),
            self.condition.clone(),
            statement,
            params,
            dql,
        ))
    }

    fn render(&self, style: ParamStyle) -> (String, Vec<serde_json::Value>) {
        let entity_form = style == ParamStyle::Inline;
        let mut generator = SqlGenerator::new(style);
        let mut parts = vec![format!(
            "SELECT {}",
            SqlGenerator::build_select_clause(&self.select, entity_form)
        )];

        if let Some(from) = &self.from {
            let source = if entity_form {
                from.entity.name()
            } else {
                from.entity.table()
            };
            parts.push(format!("FROM {} {}", source, from.alias));
        }

        let joins = SqlGenerator::build_join_clause(&self.joins);
        if !joins.is_empty() {
            parts.push(joins);
        }

        if let Some(condition) = &self.condition {
            let where_sql = generator.build_condition(condition);
            if !where_sql.is_empty() {
                parts.push(format!("WHERE {}", where_sql));
            }
        }

        let group = SqlGenerator::build_group_by_clause(&self.group_by);
        if !group.is_empty() {
            parts.push(group);
        }

        // A plain count is a single row
        if !self.is_plain_count() {
            let order = SqlGenerator::build_order_clause(&self.order_by);
            if !order.is_empty() {
                parts.push(order);
            }
        }

        (parts.join(" "), generator.into_values())
    }
}

fn check_alias(known: &BTreeSet<String>, alias: &str) -> Result<(), QueryError> {
    ValidatedAlias::new(alias)?;
    if known.contains(alias) {
        Ok(())
    } else {
        Err(QueryError::UnknownAlias {
            alias: alias.to_string(),
            known: known.iter().cloned().collect::<Vec<_>>().join(", "),
        })
    }
}

fn check_field(known: &BTreeSet<String>, reference: &str) -> Result<(), QueryError> {
    match FieldRef::parse(reference)?.alias {
        Some(alias) => check_alias(known, alias.as_str()),
        None => Ok(()),
    }
}
