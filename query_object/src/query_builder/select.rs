//! SELECT projections

/// Represents a projection in a SELECT clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectField {
    /// The whole entity behind an alias: `SELECT e`
    Entity(String),
    /// A single column: `SELECT e.email`
    Field(String),
    /// Row count over an alias: `SELECT COUNT(e)`
    Count(String),
}

impl SelectField {
    pub fn entity(alias: impl Into<String>) -> Self {
        SelectField::Entity(alias.into())
    }

    pub fn field(field: impl Into<String>) -> Self {
        SelectField::Field(field.into())
    }

    pub fn count(alias: impl Into<String>) -> Self {
        SelectField::Count(alias.into())
    }
}
