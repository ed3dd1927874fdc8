//! Procedural macros for entity metadata
//!
//! This crate provides the `Entity` derive, which implements
//! `query_object::entity::Entity` from a struct and an optional
//! `#[entity(...)]` attribute.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod parsing;

use parsing::parse_entity_attributes;

/// Derive macro for the `Entity` trait
///
/// ```rust,ignore
/// use spechaus::prelude::*;
///
/// #[derive(Entity)]
/// #[entity(table = "users")]
/// pub struct User {
///     pub id: i64,
///     pub email: String,
///     pub active: bool,
/// }
///
/// assert_eq!(User::entity_name(), "User");
/// assert_eq!(User::table_name(), "users");
/// ```
///
/// Without `table`, the table name is the snake_case struct name with an `s`
/// appended (`OrderLine` -> `order_lines`). The generated impl refers to
/// `query_object`, so that crate (or a prelude re-exporting it) must be in
/// scope.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let info = match parse_entity_attributes(name, &input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let entity_name = &info.name;
    let table_name = &info.table;

    let expanded = quote! {
        impl #impl_generics query_object::entity::Entity for #name #ty_generics #where_clause {
            fn entity_name() -> &'static str {
                #entity_name
            }

            fn table_name() -> &'static str {
                #table_name
            }
        }
    };

    TokenStream::from(expanded)
}
