//! Condition specifications
//!
//! Leaf specifications that filter on a single field of the root entity, or
//! of a joined entity when an explicit alias is given with `in_alias`. They
//! apply to every entity type; restrict them with
//! [`crate::SpecificationExt::for_entity`] when needed.

use query_object::{EntityType, Expr, FieldRef, QueryBuilder, QueryError, QueryOperator};
use serde_json::Value;

use crate::traits::Specification;

/// A field reference relative to the repository alias or an explicit one
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field {
    name: String,
    pub(crate) alias: Option<String>,
}

impl Field {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// Qualified and validated reference
    pub(crate) fn qualify(&self, alias: &str) -> Result<String, QueryError> {
        let reference = format!("{}.{}", self.alias.as_deref().unwrap_or(alias), self.name);
        FieldRef::parse(&reference)?;
        Ok(reference)
    }
}

macro_rules! alias_builder {
    ($ty:ident) => {
        impl $ty {
            /// Reference the field through another alias, e.g. a joined table
            pub fn in_alias(mut self, alias: impl Into<String>) -> Self {
                self.field.alias = Some(alias.into());
                self
            }
        }
    };
}

/// Binary comparison of a field with a value
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    field: Field,
    operator: QueryOperator,
    value: Value,
}

impl Comparison {
    fn new(field: impl Into<String>, operator: QueryOperator, value: impl Into<Value>) -> Self {
        Self {
            field: Field::new(field),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, QueryOperator::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, QueryOperator::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, QueryOperator::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, QueryOperator::Gte, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, QueryOperator::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, QueryOperator::Lte, value)
    }
}

alias_builder!(Comparison);

impl Specification for Comparison {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, _query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        let field = self.field.qualify(alias)?;
        if !self.value.is_null() {
            return Ok(Some(Expr::condition(
                &field,
                self.operator.clone(),
                Some(self.value.clone()),
            )));
        }

        // `= NULL` never matches in SQL
        match self.operator {
            QueryOperator::Eq => Ok(Some(Expr::is_null(&field))),
            QueryOperator::Ne => Ok(Some(Expr::is_not_null(&field))),
            ref operator => Err(QueryError::NullComparison {
                field,
                operator: operator.to_sql(),
            }),
        }
    }
}

/// Where the search term may sit inside the column value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikePattern {
    Contains,
    StartsWith,
    EndsWith,
    Exact,
}

/// Pattern match on a text field; the term is escaped so that `%` and `_`
/// in user input match literally
#[derive(Debug, Clone, PartialEq)]
pub struct Like {
    field: Field,
    term: String,
    pattern: LikePattern,
    case_insensitive: bool,
}

impl Like {
    pub fn new(field: impl Into<String>, term: impl Into<String>, pattern: LikePattern) -> Self {
        Self {
            field: Field::new(field),
            term: term.into(),
            pattern,
            case_insensitive: false,
        }
    }

    pub fn contains(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self::new(field, term, LikePattern::Contains)
    }

    pub fn starts_with(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self::new(field, term, LikePattern::StartsWith)
    }

    pub fn ends_with(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self::new(field, term, LikePattern::EndsWith)
    }

    /// Use ILIKE instead of LIKE
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    fn like_pattern(&self) -> String {
        let escaped = self
            .term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");

        match self.pattern {
            LikePattern::Contains => format!("%{}%", escaped),
            LikePattern::StartsWith => format!("{}%", escaped),
            LikePattern::EndsWith => format!("%{}", escaped),
            LikePattern::Exact => escaped,
        }
    }
}

alias_builder!(Like);

impl Specification for Like {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, _query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        let field = self.field.qualify(alias)?;
        let pattern = self.like_pattern();
        Ok(Some(if self.case_insensitive {
            Expr::ilike(&field, &pattern)
        } else {
            Expr::like(&field, &pattern)
        }))
    }
}

/// Field value is one of a list; an empty list matches nothing
#[derive(Debug, Clone, PartialEq)]
pub struct In {
    field: Field,
    values: Vec<Value>,
}

impl In {
    pub fn new<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            field: Field::new(field),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

alias_builder!(In);

impl Specification for In {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, _query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        let field = self.field.qualify(alias)?;
        Ok(Some(Expr::in_values(&field, self.values.clone())))
    }
}

/// Field value is none of a list; an empty list matches everything
#[derive(Debug, Clone, PartialEq)]
pub struct NotIn {
    field: Field,
    values: Vec<Value>,
}

impl NotIn {
    pub fn new<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            field: Field::new(field),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

alias_builder!(NotIn);

impl Specification for NotIn {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, _query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        let field = self.field.qualify(alias)?;
        Ok(Some(Expr::not_in_values(&field, self.values.clone())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsNull {
    field: Field,
}

impl IsNull {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: Field::new(field),
        }
    }
}

alias_builder!(IsNull);

impl Specification for IsNull {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, _query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        Ok(Some(Expr::is_null(&self.field.qualify(alias)?)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsNotNull {
    field: Field,
}

impl IsNotNull {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: Field::new(field),
        }
    }
}

alias_builder!(IsNotNull);

impl Specification for IsNotNull {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, _query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        Ok(Some(Expr::is_not_null(&self.field.qualify(alias)?)))
    }
}

/// Inclusive range
#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    field: Field,
    low: Value,
    high: Value,
}

impl Between {
    pub fn new(field: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self {
            field: Field::new(field),
            low: low.into(),
            high: high.into(),
        }
    }
}

alias_builder!(Between);

impl Specification for Between {
    fn is_satisfied_by(&self, _entity: &EntityType) -> bool {
        true
    }

    fn modify(&self, _query: &mut QueryBuilder, alias: &str) -> Result<Option<Expr>, QueryError> {
        let field = self.field.qualify(alias)?;
        Ok(Some(Expr::between(&field, self.low.clone(), self.high.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::{order_type, user_query, user_type};
    use query_object::ValidationError;
    use serde_json::json;

    #[test]
    fn test_comparisons_qualify_with_alias() {
        let mut query = user_query();

        assert_eq!(
            Comparison::eq("status", "active").modify(&mut query, "u").unwrap(),
            Some(Expr::eq("u.status", json!("active")))
        );
        assert_eq!(
            Comparison::lt("age", 30).modify(&mut query, "e").unwrap(),
            Some(Expr::lt("e.age", json!(30)))
        );
        assert_eq!(
            Comparison::gt("total", 100).in_alias("o").modify(&mut query, "e").unwrap(),
            Some(Expr::gt("o.total", json!(100)))
        );
    }

    #[test]
    fn test_null_equality_becomes_null_check() {
        let mut query = user_query();

        assert_eq!(
            Comparison::eq("deleted_at", Option::<String>::None)
                .modify(&mut query, "e")
                .unwrap(),
            Some(Expr::is_null("e.deleted_at"))
        );
        assert_eq!(
            Comparison::ne("deleted_at", Value::Null)
                .modify(&mut query, "e")
                .unwrap(),
            Some(Expr::is_not_null("e.deleted_at"))
        );

        let condition = Comparison::eq("deleted_at", Value::Null)
            .modify(&mut query, "e")
            .unwrap()
            .unwrap();
        query.set_where(condition);
        let built = query.get_query().unwrap();
        assert_eq!(built.sql(), "SELECT e.* FROM users e WHERE e.deleted_at IS NULL");
        assert!(built.params().is_empty());
    }

    #[test]
    fn test_ordering_against_null_is_rejected() {
        let mut query = user_query();

        assert!(matches!(
            Comparison::gt("age", Value::Null).modify(&mut query, "e"),
            Err(QueryError::NullComparison { ref field, operator: ">" }) if field == "e.age"
        ));
        assert!(Comparison::lte("age", Value::Null).modify(&mut query, "e").is_err());
    }

    #[test]
    fn test_conditions_apply_to_any_entity() {
        let spec = Comparison::ne("status", "archived");

        assert!(spec.is_satisfied_by(&user_type()));
        assert!(spec.is_satisfied_by(&order_type()));
    }

    #[test]
    fn test_like_escapes_wildcards() {
        let mut query = user_query();

        assert_eq!(
            Like::contains("name", "50%_off").modify(&mut query, "e").unwrap(),
            Some(Expr::like("e.name", "%50\\%\\_off%"))
        );
        assert_eq!(
            Like::starts_with("email", "foo")
                .case_insensitive()
                .modify(&mut query, "e")
                .unwrap(),
            Some(Expr::ilike("e.email", "foo%"))
        );
        assert_eq!(
            Like::ends_with("email", "@example.com").modify(&mut query, "e").unwrap(),
            Some(Expr::like("e.email", "%@example.com"))
        );
    }

    #[test]
    fn test_membership_null_and_range() {
        let mut query = user_query();

        assert_eq!(
            In::new("id", [1, 2, 3]).modify(&mut query, "e").unwrap(),
            Some(Expr::in_values("e.id", vec![json!(1), json!(2), json!(3)]))
        );
        assert_eq!(
            NotIn::new("role", ["guest"]).modify(&mut query, "e").unwrap(),
            Some(Expr::not_in_values("e.role", vec![json!("guest")]))
        );
        assert_eq!(
            IsNull::new("deleted_at").modify(&mut query, "e").unwrap(),
            Some(Expr::is_null("e.deleted_at"))
        );
        assert_eq!(
            IsNotNull::new("verified_at").modify(&mut query, "e").unwrap(),
            Some(Expr::is_not_null("e.verified_at"))
        );
        assert_eq!(
            Between::new("age", 18, 65).modify(&mut query, "e").unwrap(),
            Some(Expr::between("e.age", json!(18), json!(65)))
        );
    }

    #[test]
    fn test_invalid_field_is_reported() {
        let mut query = user_query();

        match IsNull::new("deleted at").modify(&mut query, "e") {
            Err(QueryError::InvalidIdentifier(ValidationError::InvalidCharacters(name))) => {
                assert_eq!(name, "deleted at")
            }
            other => panic!("Expected invalid identifier, got {:?}", other),
        }
    }

    #[test]
    fn test_conditions_do_not_touch_the_query() {
        let mut query = user_query();
        Comparison::eq("active", true).modify(&mut query, "e").unwrap();

        assert!(query.condition().is_none());
        assert_eq!(
            query.get_query().unwrap().statement(),
            "SELECT e.* FROM users e"
        );
    }
}
