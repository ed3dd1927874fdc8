//! Result modifiers
//!
//! Applied by the repository to the finalized [`Query`], after the
//! specification's condition is in place. They only touch the result window
//! and the hint map; statement, parameters and condition stay as built.

use std::time::Duration;

use query_object::{Query, QueryError, HINT_STATEMENT_TIMEOUT_MS};
use serde_json::Value;

use crate::traits::Modifier;

/// Cap the number of rows returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(pub u64);

impl Modifier for Limit {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError> {
        query.set_max_results(Some(self.0));
        Ok(())
    }
}

/// Skip the first rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset(pub u64);

impl Modifier for Offset {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError> {
        query.set_first_result(Some(self.0));
        Ok(())
    }
}

/// One page of results; pages are numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u64,
    size: u64,
}

impl Page {
    pub fn new(number: u64, size: u64) -> Self {
        Self { number, size }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Modifier for Page {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError> {
        if self.number == 0 {
            return Err(QueryError::InvalidPagination(
                "page number must be at least 1".to_string(),
            ));
        }
        if self.size == 0 {
            return Err(QueryError::InvalidPagination(
                "page size must be at least 1".to_string(),
            ));
        }
        let first = (self.number - 1).checked_mul(self.size).ok_or_else(|| {
            QueryError::InvalidPagination(format!(
                "page {} of size {} is out of range",
                self.number, self.size
            ))
        })?;

        query
            .set_max_results(Some(self.size))
            .set_first_result(Some(first));
        Ok(())
    }
}

/// Attach a named hint to the query
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    name: String,
    value: Value,
}

impl Hint {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Modifier for Hint {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError> {
        query.set_hint(self.name.as_str(), self.value.clone());
        Ok(())
    }
}

/// Abort the statement server-side after the given duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTimeout(pub Duration);

impl Modifier for StatementTimeout {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError> {
        let millis = u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX);
        query.set_hint(HINT_STATEMENT_TIMEOUT_MS, Value::from(millis));
        Ok(())
    }
}

/// Several modifiers applied in order
#[derive(Default)]
pub struct ModifierChain {
    modifiers: Vec<Box<dyn Modifier>>,
}

impl ModifierChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M: Modifier + 'static>(mut self, modifier: M) -> Self {
        self.modifiers.push(Box::new(modifier));
        self
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

impl Modifier for ModifierChain {
    fn modify(&self, query: &mut Query) -> Result<(), QueryError> {
        for modifier in &self.modifiers {
            modifier.modify(query)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::user_query;
    use serde_json::json;

    fn finalized() -> Query {
        user_query().get_query().unwrap()
    }

    #[test]
    fn test_limit_and_offset() {
        let mut query = finalized();
        Limit(10).modify(&mut query).unwrap();
        Offset(30).modify(&mut query).unwrap();

        assert_eq!(query.max_results(), Some(10));
        assert_eq!(query.first_result(), Some(30));
        assert_eq!(query.sql(), "SELECT e.* FROM users e LIMIT 10 OFFSET 30");
    }

    #[test]
    fn test_page_window() {
        let mut query = finalized();
        Page::new(3, 25).modify(&mut query).unwrap();

        assert_eq!(query.max_results(), Some(25));
        assert_eq!(query.first_result(), Some(50));

        let mut first = finalized();
        Page::new(1, 25).modify(&mut first).unwrap();
        assert_eq!(first.first_result(), Some(0));
    }

    #[test]
    fn test_invalid_pages() {
        let mut query = finalized();

        assert!(matches!(
            Page::new(0, 10).modify(&mut query),
            Err(QueryError::InvalidPagination(_))
        ));
        assert!(matches!(
            Page::new(1, 0).modify(&mut query),
            Err(QueryError::InvalidPagination(_))
        ));
        assert!(matches!(
            Page::new(u64::MAX, u64::MAX).modify(&mut query),
            Err(QueryError::InvalidPagination(_))
        ));
        assert_eq!(query.max_results(), None);
    }

    #[test]
    fn test_hints() {
        let mut query = finalized();
        Hint::new("label", "reporting").modify(&mut query).unwrap();
        StatementTimeout(Duration::from_secs(2)).modify(&mut query).unwrap();

        assert_eq!(query.hint("label"), Some(&json!("reporting")));
        assert_eq!(query.hint(HINT_STATEMENT_TIMEOUT_MS), Some(&json!(2000)));
        assert_eq!(query.statement_timeout_ms(), Some(2000));
    }

    #[test]
    fn test_chain_applies_in_order() {
        let chain = ModifierChain::new()
            .with(Limit(5))
            .with(Page::new(2, 10))
            .with(Hint::new("label", "late"));
        let mut query = finalized();
        chain.modify(&mut query).unwrap();

        assert_eq!(chain.len(), 3);
        assert_eq!(query.max_results(), Some(10));
        assert_eq!(query.first_result(), Some(10));
        assert_eq!(query.hint("label"), Some(&json!("late")));
    }

    #[test]
    fn test_chain_stops_at_first_error() {
        let chain = ModifierChain::new()
            .with(Page::new(0, 10))
            .with(Limit(5));
        let mut query = finalized();

        assert!(chain.modify(&mut query).is_err());
        assert_eq!(query.max_results(), None);
    }
}
