//! Commonly used specifications and modifiers

pub use crate::condition::{Between, Comparison, In, IsNotNull, IsNull, Like, LikePattern, NotIn};
pub use crate::entity::ForEntity;
pub use crate::logic::{AndX, Not, OrX};
pub use crate::query::{GroupBy, Join, OrderBy};
pub use crate::result::{Hint, Limit, ModifierChain, Offset, Page, StatementTimeout};
pub use crate::traits::{Modifier, Specification, SpecificationExt};

pub use query_object::{SortOrder, JoinType};
