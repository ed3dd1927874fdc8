//! SQL generation
//!
//! Renders the parts of a finalized query. Two parameter styles exist:
//! positional (`$1`, values collected for binding) for execution, and inline
//! literals for the entity-level rendering used in logs and assertions.

use crate::query_builder::expr::{Expr, QueryCondition, QueryOperator};
use crate::query_builder::join::{JoinClause, JoinCondition};
use crate::query_builder::ordering::OrderItem;
use crate::query_builder::select::SelectField;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `$1, $2, ...` with values collected for binding
    Positional,
    /// Values written into the statement as literals
    Inline,
}

pub struct SqlGenerator {
    style: ParamStyle,
    values: Vec<Value>,
}

impl SqlGenerator {
    pub fn new(style: ParamStyle) -> Self {
        Self {
            style,
            values: Vec::new(),
        }
    }

    /// Values collected by positional rendering, in placeholder order
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Render a WHERE condition without the keyword; empty when the
    /// expression renders to nothing
    pub fn build_condition(&mut self, expr: &Expr) -> String {
        self.build_expr(expr, false)
    }

    fn build_expr(&mut self, expr: &Expr, nested: bool) -> String {
        match expr {
            Expr::Condition(condition) => self.build_single_condition(condition),
            Expr::Group { operator, filters } => {
                let parts: Vec<String> = filters
                    .iter()
                    .map(|f| self.build_expr(f, true))
                    .filter(|s| !s.is_empty())
                    .collect();

                match parts.len() {
                    0 => String::new(),
                    1 => parts.into_iter().next().unwrap_or_default(),
                    _ if nested => format!("({})", parts.join(operator.to_sql())),
                    _ => parts.join(operator.to_sql()),
                }
            }
            Expr::Not(inner) => {
                let inner_sql = self.build_expr(inner, false);
                if inner_sql.is_empty() {
                    inner_sql
                } else {
                    format!("NOT ({})", inner_sql)
                }
            }
        }
    }

    fn placeholder(&mut self, value: &Value) -> String {
        match self.style {
            ParamStyle::Positional => {
                self.values.push(value.clone());
                format!("${}", self.values.len())
            }
            ParamStyle::Inline => Self::literal(value),
        }
    }

    fn placeholders(&mut self, values: &[Value]) -> String {
        values
            .iter()
            .map(|v| self.placeholder(v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn literal(value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => format!("'{}'", s.replace('\'', "''")),
            other => format!("'{}'", other.to_string().replace('\'', "''")),
        }
    }

    fn build_single_condition(&mut self, condition: &QueryCondition) -> String {
        let field = &condition.field;

        match (&condition.operator, &condition.value) {
            (QueryOperator::Eq, None | Some(Value::Null)) => format!("{} IS NULL", field),
            (QueryOperator::Eq, Some(value)) => format!("{} = {}", field, self.placeholder(value)),
            (QueryOperator::Ne, None | Some(Value::Null)) => format!("{} IS NOT NULL", field),
            (QueryOperator::Ne, Some(value)) => {
                format!("{} != {}", field, self.placeholder(value))
            }
            (QueryOperator::Gt, Some(value)) => format!("{} > {}", field, self.placeholder(value)),
            (QueryOperator::Gte, Some(value)) => {
                format!("{} >= {}", field, self.placeholder(value))
            }
            (QueryOperator::Lt, Some(value)) => format!("{} < {}", field, self.placeholder(value)),
            (QueryOperator::Lte, Some(value)) => {
                format!("{} <= {}", field, self.placeholder(value))
            }
            (QueryOperator::Like, Some(value)) => {
                format!("{} LIKE {}", field, self.placeholder(value))
            }
            (QueryOperator::ILike, Some(value)) => {
                format!("{} ILIKE {}", field, self.placeholder(value))
            }
            (QueryOperator::In, Some(Value::Array(values))) => {
                if values.is_empty() {
                    return "1=0".to_string(); // Empty IN clause
                }
                format!("{} IN ({})", field, self.placeholders(values))
            }
            (QueryOperator::NotIn, Some(Value::Array(values))) => {
                if values.is_empty() {
                    return "1=1".to_string(); // Empty NOT IN clause
                }
                format!("{} NOT IN ({})", field, self.placeholders(values))
            }
            (QueryOperator::NotIn, _) => "1=1".to_string(),
            (QueryOperator::IsNull, _) => format!("{} IS NULL", field),
            (QueryOperator::IsNotNull, _) => format!("{} IS NOT NULL", field),
            (QueryOperator::Between, Some(Value::Array(bounds))) if bounds.len() == 2 => {
                let low = self.placeholder(&bounds[0]);
                let high = self.placeholder(&bounds[1]);
                format!("{} BETWEEN {} AND {}", field, low, high)
            }
            // Comparison without a usable operand
            _ => "1=0".to_string(),
        }
    }

    /// Build SELECT list; `entity_form` renders whole-entity projections as
    /// the bare alias instead of `alias.*`
    pub fn build_select_clause(fields: &[SelectField], entity_form: bool) -> String {
        fields
            .iter()
            .map(|field| match field {
                SelectField::Entity(alias) if entity_form => alias.clone(),
                SelectField::Entity(alias) => format!("{}.*", alias),
                SelectField::Field(name) => name.clone(),
                SelectField::Count(alias) => format!("COUNT({})", alias),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Build JOIN clauses
    pub fn build_join_clause(joins: &[JoinClause]) -> String {
        joins
            .iter()
            .map(|join| {
                let condition_part = match &join.condition {
                    JoinCondition::On {
                        left_field,
                        right_field,
                    } => format!("ON {} = {}", left_field, right_field),
                    JoinCondition::Using(columns) => format!("USING ({})", columns.join(", ")),
                };

                format!(
                    "{} {} {} {}",
                    join.join_type.to_sql(),
                    join.table,
                    join.alias,
                    condition_part
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build GROUP BY clause
    pub fn build_group_by_clause(group_by: &[String]) -> String {
        if group_by.is_empty() {
            return String::new();
        }
        format!("GROUP BY {}", group_by.join(", "))
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[OrderItem]) -> String {
        if order_by.is_empty() {
            return String::new();
        }

        let order_items: Vec<String> = order_by
            .iter()
            .map(|item| format!("{} {}", item.field, item.order.to_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(limit: Option<u64>, offset: Option<u64>) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        clauses.join(" ")
    }
}
