/// Represents the type of SQL JOIN operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN - only rows with a match on both sides
    Inner,
    /// LEFT JOIN - every row of the root entity, matched rows of the joined table
    Left,
    /// RIGHT JOIN - every row of the joined table, matched rows of the root entity
    Right,
    /// FULL OUTER JOIN - rows matched on either side
    Full,
}

impl JoinType {
    /// Convert JoinType to SQL string
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
        }
    }
}

/// Represents a condition for joining tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinCondition {
    /// Join on a column equality (`ON e.id = o.user_id`)
    On {
        left_field: String,
        right_field: String,
    },
    /// Join using common column names (`USING (id, name)`)
    Using(Vec<String>),
}

/// A complete JOIN clause; the alias is mandatory so that conditions can
/// reference the joined table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub alias: String,
    pub condition: JoinCondition,
}

impl JoinClause {
    /// Create a new JOIN clause with ON condition
    pub fn new_on(
        join_type: JoinType,
        table: impl Into<String>,
        alias: impl Into<String>,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Self {
        Self {
            join_type,
            table: table.into(),
            alias: alias.into(),
            condition: JoinCondition::On {
                left_field: left_field.into(),
                right_field: right_field.into(),
            },
        }
    }

    /// Create a new JOIN clause with USING condition
    pub fn new_using(
        join_type: JoinType,
        table: impl Into<String>,
        alias: impl Into<String>,
        columns: Vec<String>,
    ) -> Self {
        Self {
            join_type,
            table: table.into(),
            alias: alias.into(),
            condition: JoinCondition::Using(columns),
        }
    }

    /// Field references used by the ON condition
    pub fn fields(&self) -> Vec<&str> {
        match &self.condition {
            JoinCondition::On {
                left_field,
                right_field,
            } => vec![left_field.as_str(), right_field.as_str()],
            JoinCondition::Using(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_type_to_sql() {
        assert_eq!(JoinType::Inner.to_sql(), "INNER JOIN");
        assert_eq!(JoinType::Left.to_sql(), "LEFT JOIN");
        assert_eq!(JoinType::Right.to_sql(), "RIGHT JOIN");
        assert_eq!(JoinType::Full.to_sql(), "FULL OUTER JOIN");
    }

    #[test]
    fn test_join_clause_new_on() {
        let join = JoinClause::new_on(JoinType::Inner, "orders", "o", "e.id", "o.user_id");

        assert_eq!(join.join_type, JoinType::Inner);
        assert_eq!(join.table, "orders");
        assert_eq!(join.alias, "o");
        assert_eq!(join.fields(), vec!["e.id", "o.user_id"]);
    }

    #[test]
    fn test_join_clause_new_using() {
        let join = JoinClause::new_using(
            JoinType::Left,
            "profiles",
            "p",
            vec!["user_id".to_string()],
        );

        assert_eq!(
            join.condition,
            JoinCondition::Using(vec!["user_id".to_string()])
        );
        assert!(join.fields().is_empty());
    }
}
