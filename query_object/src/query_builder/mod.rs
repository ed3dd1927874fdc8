//! Query builder utilities
//!
//! This module provides SQL query construction utilities.

pub mod builder;
pub mod expr;
pub mod join;
pub mod ordering;
pub mod select;
pub mod sql_generation;


pub use builder::{FromClause, QueryBuilder};
pub use expr::{Expr, LogicalOperator, QueryCondition, QueryOperator};
pub use join::{JoinClause, JoinCondition, JoinType};
pub use ordering::{OrderItem, SortOrder};
pub use select::SelectField;
