//! Rust source emission for table schemas.
//!
//! For every table the generator emits, in order:
//!
//! 1. the struct, one field per column
//! 2. a column constant per column holding `` `table`.`column` ``
//! 3. `QUERY_<TYPE>_{SELECT,UPDATE,INSERT,INSERT_OR_UPDATE,DELETE}`
//! 4. `FromRow` and the capability impls delegating to `Tx`
//! 5. `register_<type>` and `query_<plural>` helpers
//!
//! Generated code refers to the runtime through `::txkit_sqlite` paths only,
//! so the crate that includes it needs `txkit-sqlite` as a dependency and
//! nothing else.

use heck::{ToShoutySnakeCase, ToSnakeCase};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};
use tracing::{debug, warn};
use txkit_core::{
    CREATED_AT, ColumnSchema, ColumnType, TableSchema, UPDATED_AT, ValidationError, delete_sql,
    insert_or_update_sql, insert_sql, select_sql, update_sql, validate_table,
};

use crate::error::{CodegenError, Result};

/// Flags that shape the generated code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Overrides the table name of every generated type.
    pub table: Option<String>,
    /// Overrides the primary key column of every generated type.
    pub key: Option<String>,
    /// Prefix removed from type names when building constant names.
    pub trim_prefix: String,
    /// Emit table and column comments as doc comments.
    pub line_comment: bool,
}

/// Accumulates the items of one output file.
#[derive(Debug, Default)]
pub struct Generator {
    options: GeneratorOptions,
    items: Vec<TokenStream>,
}

impl Generator {
    /// Creates an empty generator.
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
        }
    }

    /// Applies the `table`/`key` overrides to a declaration and validates
    /// the result.
    pub fn resolve(&self, table: &TableSchema) -> Result<TableSchema> {
        let mut resolved = table.clone();
        if let Some(name) = &self.options.table {
            resolved.table = name.clone();
        }
        if let Some(key) = &self.options.key {
            resolved.key = key.clone();
        }

        if let Some(source) = validate_table(&resolved).into_iter().next() {
            return Err(CodegenError::Validation {
                type_name: resolved.type_name,
                source,
            });
        }
        Ok(resolved)
    }

    /// Generates every item for `table`.
    pub fn generate(&mut self, table: &TableSchema) -> Result<()> {
        let table = self.resolve(table)?;
        debug!(type_name = %table.type_name, table = %table.table, "generating");
        self.items.push(table_items(&table, &self.options));
        Ok(())
    }

    /// Returns the formatted source of everything generated so far,
    /// preceded by `header`.
    pub fn finish(self, header: &str) -> String {
        let items = self.items;
        let body = format_source(quote! { #(#items)* });
        format!("{header}\n{body}")
    }
}

/// Formats generated tokens with `prettyplease`.
///
/// Unparseable tokens are returned unformatted with a warning, so the
/// compiler can point at the problem in the written file.
pub fn format_source(tokens: TokenStream) -> String {
    let content = tokens.to_string();
    match syn::parse_file(&content) {
        Ok(parsed) => prettyplease::unparse(&parsed),
        Err(err) => {
            warn!(error = %err, "generated code does not parse, writing it unformatted");
            content
        }
    }
}

/// Creates an identifier, falling back to a raw identifier for keywords.
fn ident(name: &str) -> Ident {
    if syn::parse_str::<Ident>(name).is_ok() {
        Ident::new(name, Span::call_site())
    } else {
        Ident::new_raw(name, Span::call_site())
    }
}

fn doc_attr(comment: Option<&str>, enabled: bool) -> TokenStream {
    match comment {
        Some(text) if enabled => {
            let lines = text.lines().map(|line| format!(" {}", line.trim_end()));
            quote! { #(#[doc = #lines])* }
        }
        _ => TokenStream::new(),
    }
}

fn field_type(column: &ColumnSchema) -> TokenStream {
    let base = match column.column_type {
        ColumnType::Integer => quote! { i64 },
        ColumnType::Int => quote! { i32 },
        ColumnType::Real => quote! { f64 },
        ColumnType::Bool => quote! { bool },
        ColumnType::Text => quote! { ::std::string::String },
        ColumnType::Blob => quote! { ::std::vec::Vec<u8> },
        ColumnType::Timestamp => quote! {
            ::txkit_sqlite::chrono::DateTime<::txkit_sqlite::chrono::Utc>
        },
    };
    if column.nullable {
        quote! { ::std::option::Option<#base> }
    } else {
        base
    }
}

/// Constant name prefix for a type: `DbAlertRule` with prefix `Db` gives
/// `ALERT_RULE`.
fn const_prefix(type_name: &str, trim_prefix: &str) -> String {
    let trimmed = type_name.strip_prefix(trim_prefix).unwrap_or(type_name);
    trimmed.to_shouty_snake_case()
}

/// Assigns `now` to the named timestamp column, if the table has one.
fn stamp(table: &TableSchema, column: &str) -> Option<TokenStream> {
    let col = table.find_column(column)?;
    if col.column_type != ColumnType::Timestamp {
        return None;
    }
    let field = ident(col.field_name());
    Some(if col.nullable {
        quote! { self.#field = ::std::option::Option::Some(now); }
    } else {
        quote! { self.#field = now; }
    })
}

fn stamps(table: &TableSchema, columns: &[&str]) -> TokenStream {
    let assignments: Vec<TokenStream> =
        columns.iter().filter_map(|c| stamp(table, c)).collect();
    if assignments.is_empty() {
        return TokenStream::new();
    }
    quote! {
        let now = ::txkit_sqlite::chrono::Utc::now();
        #(#assignments)*
    }
}

fn named_params<'a>(columns: impl IntoIterator<Item = &'a ColumnSchema>) -> TokenStream {
    let pairs = columns.into_iter().map(|column| {
        let name = format!(":{}", column.name);
        let field = ident(column.field_name());
        quote! { #name: self.#field }
    });
    quote! { ::txkit_sqlite::rusqlite::named_params! { #(#pairs),* } }
}

/// Generates every item for one resolved table.
pub fn table_items(table: &TableSchema, options: &GeneratorOptions) -> TokenStream {
    let type_ident = ident(&table.type_name);
    let prefix = const_prefix(&table.type_name, &options.trim_prefix);
    let snake = table.type_name.to_snake_case();
    let table_name = &table.table;

    let type_doc = doc_attr(table.comment.as_deref(), options.line_comment);

    let fields = table.columns.iter().map(|column| {
        let doc = doc_attr(column.comment.as_deref(), options.line_comment);
        let field = ident(column.field_name());
        let ty = field_type(column);
        quote! {
            #doc
            pub #field: #ty
        }
    });

    let column_consts: Vec<Ident> = table
        .columns
        .iter()
        .map(|column| format_ident!("{}_{}", prefix, column.name.to_shouty_snake_case()))
        .collect();
    let column_refs = table
        .columns
        .iter()
        .map(|column| txkit_core::column_ref(table_name, &column.name));

    let query_select = format_ident!("QUERY_{}_SELECT", prefix);
    let query_update = format_ident!("QUERY_{}_UPDATE", prefix);
    let query_insert = format_ident!("QUERY_{}_INSERT", prefix);
    let query_upsert = format_ident!("QUERY_{}_INSERT_OR_UPDATE", prefix);
    let query_delete = format_ident!("QUERY_{}_DELETE", prefix);

    let select_text = select_sql(table);
    let update_text = update_sql(table);
    let insert_text = insert_sql(table);
    let upsert_text = insert_or_update_sql(table);
    let delete_text = delete_sql(table);

    let row_fields = table.columns.iter().map(|column| {
        let field = ident(column.field_name());
        let name = &column.name;
        quote! { #field: row.get(#name)? }
    });

    let all_params = named_params(&table.columns);
    let key_params = named_params(table.find_column(&table.key));

    let insert_stamps = stamps(table, &[CREATED_AT, UPDATED_AT]);
    let update_stamps = stamps(table, &[UPDATED_AT]);

    let register_fn = format_ident!("register_{}", snake);
    let query_fn = format_ident!("query_{}s", snake);

    quote! {
        #type_doc
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #type_ident {
            #(#fields,)*
        }

        #(pub const #column_consts: &str = #column_refs;)*

        pub const #query_select: ::txkit_sqlite::Query =
            ::txkit_sqlite::Query::from_static(#select_text);
        pub const #query_update: ::txkit_sqlite::Query =
            ::txkit_sqlite::Query::from_static(#update_text);
        pub const #query_insert: ::txkit_sqlite::Query =
            ::txkit_sqlite::Query::from_static(#insert_text);
        pub const #query_upsert: ::txkit_sqlite::Query =
            ::txkit_sqlite::Query::from_static(#upsert_text);
        pub const #query_delete: ::txkit_sqlite::Query =
            ::txkit_sqlite::Query::from_static(#delete_text);

        impl ::txkit_sqlite::FromRow for #type_ident {
            fn from_row(
                row: &::txkit_sqlite::rusqlite::Row<'_>,
            ) -> ::txkit_sqlite::rusqlite::Result<Self> {
                ::std::result::Result::Ok(Self {
                    #(#row_fields,)*
                })
            }
        }

        impl ::txkit_sqlite::Getter for #type_ident {
            fn get(
                &mut self,
                tx: &mut ::txkit_sqlite::Tx<'_>,
                qx: &::txkit_sqlite::Queryx,
            ) -> ::txkit_sqlite::Result<()> {
                *self = tx.query_row(qx)?;
                ::std::result::Result::Ok(())
            }
        }

        impl ::txkit_sqlite::Updater for #type_ident {
            fn update(&mut self, tx: &mut ::txkit_sqlite::Tx<'_>) -> ::txkit_sqlite::Result<()> {
                #update_stamps
                tx.exec_named(&#query_update, #all_params)?;
                ::std::result::Result::Ok(())
            }
        }

        impl ::txkit_sqlite::InsertOrUpdater for #type_ident {
            fn insert_or_update(
                &mut self,
                tx: &mut ::txkit_sqlite::Tx<'_>,
            ) -> ::txkit_sqlite::Result<()> {
                #insert_stamps
                tx.exec_named(&#query_upsert, #all_params)?;
                ::std::result::Result::Ok(())
            }
        }

        impl ::txkit_sqlite::Inserter for #type_ident {
            fn insert(&mut self, tx: &mut ::txkit_sqlite::Tx<'_>) -> ::txkit_sqlite::Result<()> {
                #insert_stamps
                tx.exec_named(&#query_insert, #all_params)?;
                ::std::result::Result::Ok(())
            }
        }

        impl ::txkit_sqlite::Deleter for #type_ident {
            fn delete(&self, tx: &mut ::txkit_sqlite::Tx<'_>) -> ::txkit_sqlite::Result<()> {
                tx.exec_named(&#query_delete, #key_params)?;
                ::std::result::Result::Ok(())
            }
        }

        pub fn #register_fn(registry: &mut ::txkit_sqlite::Registry) {
            registry.register(::txkit_sqlite::Handlers::<#type_ident>::crud());
        }

        pub fn #query_fn() -> ::txkit_sqlite::SelectQuery {
            ::txkit_sqlite::SelectQuery::new(#table_name).fields([#(#column_consts),*])
        }
    }
}
