//! Parsing utilities for the `#[entity]` attribute
//!
//! Handles `#[entity(name = "...", table = "...")]` and validates the table
//! name with the same rules `query_object::validation` applies at runtime.

use syn::{Attribute, Error, Ident, LitStr, Result};

#[derive(Debug)]
pub struct EntityInfo {
    pub name: String,
    pub table: String,
}

pub fn parse_entity_attributes(ident: &Ident, attrs: &[Attribute]) -> Result<EntityInfo> {
    let mut name = None;
    let mut table = None;

    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                name = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                validate_table_name_syn(&value.value(), value.span())?;
                table = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported entity attribute, expected `name` or `table`"))
            }
        })?;
    }

    let name = name.unwrap_or_else(|| ident.to_string());
    if name.is_empty() {
        return Err(Error::new(ident.span(), "entity name cannot be empty"));
    }

    let table = match table {
        Some(table) => table,
        None => {
            let table = default_table_name(&ident.to_string());
            validate_table_name_syn(&table, ident.span())?;
            table
        }
    };

    Ok(EntityInfo { name, table })
}

/// `OrderLine` -> `order_lines`
pub fn default_table_name(ident: &str) -> String {
    let mut snake = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.push(c.to_ascii_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake.push('s');
    snake
}

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validation logic that mirrors query_object::validation
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;

    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

/// Same list as query_object::validation::is_reserved_keyword
fn is_reserved_keyword(name: &str) -> bool {
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
