//! Identifier validation
//!
//! Every table, alias and column that ends up in generated SQL passes through
//! one of the validated wrappers in this module. Values are always bound as
//! parameters, identifiers are never quoted, so this is the only barrier
//! between caller input and the statement text.

use std::fmt;

/// PostgreSQL identifier length limit
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validation errors for SQL identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    InvalidCharacters(String),
    /// Name is too long
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// Name is empty
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    InvalidStartCharacter(String),
    /// Name is a reserved SQL keyword
    ReservedKeyword(String),
    /// Field reference has more than one qualifier (`a.b.c`)
    MalformedReference(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
            ValidationError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "Name '{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            ValidationError::Empty => write!(f, "Name cannot be empty"),
            ValidationError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            ValidationError::ReservedKeyword(name) => {
                write!(f, "Name '{}' is a reserved SQL keyword", name)
            }
            ValidationError::MalformedReference(reference) => {
                write!(
                    f,
                    "Field reference '{}' must be 'column' or 'alias.column'",
                    reference
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Common validation logic for SQL identifiers
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: MAX_IDENTIFIER_LENGTH,
        });
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    if is_reserved_keyword(name) {
        return Err(ValidationError::ReservedKeyword(name.to_string()));
    }

    Ok(())
}

/// Check if a name is a reserved SQL keyword
pub fn is_reserved_keyword(name: &str) -> bool {
    // Keywords that would change the meaning of a statement when used bare
    const RESERVED_KEYWORDS: &[&str] = &[
        "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "INNER", "LEFT",
        "RIGHT", "FULL", "OUTER", "CROSS", "ON", "USING", "AS", "AND", "OR", "NOT", "NULL",
        "TRUE", "FALSE", "CASE", "WHEN", "THEN", "ELSE", "END", "EXISTS", "IN", "IS", "LIKE",
        "ILIKE", "BETWEEN", "ORDER", "BY", "GROUP", "HAVING", "LIMIT", "OFFSET", "FETCH",
        "UNION", "INTERSECT", "EXCEPT", "ALL", "ANY", "SOME", "DISTINCT", "ASC", "DESC",
        "CREATE", "DROP", "ALTER", "TABLE", "GRANT", "REVOKE", "PRIMARY", "FOREIGN",
        "REFERENCES", "UNIQUE", "CHECK", "DEFAULT", "CONSTRAINT", "COLUMN", "RETURNING",
        "WITH", "WINDOW", "LATERAL", "ONLY", "CAST", "COLLATE", "INTO", "VALUES", "SET",
        "USER", "CURRENT_USER", "SESSION_USER",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

macro_rules! validated_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(name: &str) -> Result<Self, ValidationError> {
                validate_identifier(name)?;
                Ok(Self(name.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

validated_identifier!(
    /// A validated table name that is safe to use in SQL queries
    ValidatedTableName
);

validated_identifier!(
    /// A validated column name that is safe to use in SQL queries
    ValidatedFieldName
);

validated_identifier!(
    /// A validated range variable (`e` in `FROM users e`)
    ValidatedAlias
);

/// A column reference, optionally qualified by an alias: `name` or `e.name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub alias: Option<ValidatedAlias>,
    pub column: ValidatedFieldName,
}

impl FieldRef {
    pub fn parse(reference: &str) -> Result<Self, ValidationError> {
        let mut parts = reference.split('.');
        let (first, second) = (parts.next(), parts.next());
        if parts.next().is_some() {
            return Err(ValidationError::MalformedReference(reference.to_string()));
        }

        match (first, second) {
            (Some(alias), Some(column)) => Ok(Self {
                alias: Some(ValidatedAlias::new(alias)?),
                column: ValidatedFieldName::new(column)?,
            }),
            (Some(column), None) => Ok(Self {
                alias: None,
                column: ValidatedFieldName::new(column)?,
            }),
            _ => Err(ValidationError::Empty),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}.{}", alias, self.column),
            None => write!(f, "{}", self.column),
        }
    }
}
