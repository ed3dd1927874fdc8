//! Specification - composable query criteria for SpecHaus
//!
//! A [`Specification`] decides which entities it applies to and shapes a
//! repository's [`query_object::QueryBuilder`]: it may add joins or ordering
//! and hands back the condition for the WHERE clause. A [`Modifier`] adjusts
//! the finalized [`query_object::Query`] afterwards (result window, hints).
//!
//! ```rust
//! use specification::prelude::*;
//!
//! let active_adults = Comparison::eq("active", true)
//!     .and(Comparison::gte("age", 18))
//!     .and(OrderBy::asc("name"));
//! let window = ModifierChain::new().with(Page::new(2, 20));
//! # let _ = (active_adults, window);
//! ```

pub mod condition;
pub mod entity;
pub mod logic;
pub mod prelude;
pub mod query;
pub mod result;
pub mod traits;

pub use condition::{Between, Comparison, In, IsNotNull, IsNull, Like, LikePattern, NotIn};
pub use entity::ForEntity;
pub use logic::{AndX, Not, OrX};
pub use query::{GroupBy, Join, OrderBy};
pub use result::{Hint, Limit, ModifierChain, Offset, Page, StatementTimeout};
pub use traits::{Modifier, Specification, SpecificationExt};
