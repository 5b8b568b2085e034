//! SQL rendering for the PostgreSQL store
//!
//! Identifiers cannot be bound as parameters, so every table and column name
//! is validated and double-quoted here before it reaches a statement. Values
//! are always bound as text parameters and cast to the column's declared type
//! inside the statement.

use crate::domain::{
    FieldFilter, FilterOp, HattoriError, ModelMeta, ModelRef, Record, RecordQuery, Result,
};

/// PostgreSQL accepts at most this many bind parameters per statement
pub const MAX_BIND_PARAMETERS: usize = 65_535;

/// A statement and its text parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text with `$n` placeholders
    pub sql: String,

    /// Parameters, in placeholder order
    pub params: Vec<Option<String>>,
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates and quotes a column name
pub fn quote_ident(name: &str) -> Result<String> {
    if !is_identifier(name) {
        return Err(HattoriError::Validation(format!(
            "invalid identifier '{}': expected [A-Za-z_][A-Za-z0-9_]*",
            name
        )));
    }
    Ok(format!("\"{}\"", name))
}

/// Splits `schema.table` into its parts
pub fn split_table(table: &str) -> Result<(Option<&str>, &str)> {
    match table.split_once('.') {
        Some((schema, name)) if is_identifier(schema) && is_identifier(name) => {
            Ok((Some(schema), name))
        }
        None if is_identifier(table) => Ok((None, table)),
        _ => Err(HattoriError::Validation(format!(
            "invalid table name '{}': expected [schema.]table",
            table
        ))),
    }
}

/// Validates and quotes a possibly schema-qualified table name
pub fn quote_table(table: &str) -> Result<String> {
    match split_table(table)? {
        (Some(schema), name) => Ok(format!("\"{}\".\"{}\"", schema, name)),
        (None, name) => Ok(format!("\"{}\"", name)),
    }
}

/// Quotes a type reported by `information_schema` as `"schema"."name"`
///
/// Type names come from the catalog, not from configuration, so embedded
/// quotes are escaped rather than rejected.
pub fn quote_type(schema: &str, name: &str) -> String {
    format!(
        "\"{}\".\"{}\"",
        schema.replace('"', "\"\""),
        name.replace('"', "\"\"")
    )
}

/// `expr::type` when the type is known
fn cast(expr: &str, sql_type: Option<&str>) -> String {
    match sql_type {
        Some(sql_type) => format!("{}::{}", expr, sql_type),
        None => expr.to_string(),
    }
}

/// Column metadata lookup for a table
pub fn describe(model: &ModelRef) -> Result<Statement> {
    let (schema, table) = split_table(model.table())?;
    Ok(Statement {
        sql: "SELECT column_name::text, character_maximum_length::int4, \
              udt_schema::text, udt_name::text \
              FROM information_schema.columns \
              WHERE table_name = $1 AND table_schema = COALESCE($2::text, current_schema()) \
              ORDER BY ordinal_position"
            .to_string(),
        params: vec![Some(table.to_string()), schema.map(str::to_string)],
    })
}

fn render_filter(filter: &FieldFilter, params: &mut Vec<Option<String>>) -> Result<String> {
    filter.validate()?;
    let column = quote_ident(&filter.field)?;
    Ok(match filter.op {
        FilterOp::Eq | FilterOp::Ne => {
            params.push(filter.value.clone());
            let op = if filter.op == FilterOp::Eq { "=" } else { "<>" };
            format!("{}::text {} ${}", column, op, params.len())
        }
        FilterOp::IsNull => format!("{} IS NULL", column),
        FilterOp::IsNotNull => format!("{} IS NOT NULL", column),
    })
}

fn render_filters(query: &RecordQuery, params: &mut Vec<Option<String>>) -> Result<Vec<String>> {
    query
        .filters()
        .iter()
        .map(|filter| render_filter(filter, params))
        .collect()
}

fn where_clause(clauses: &[String]) -> String {
    if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

/// `SELECT COUNT(*)` over the query
pub fn count(query: &RecordQuery) -> Result<Statement> {
    let table = quote_table(query.model().table())?;
    let mut params = Vec::new();
    let clauses = render_filters(query, &mut params)?;
    Ok(Statement {
        sql: format!("SELECT COUNT(*) FROM {}{}", table, where_clause(&clauses)),
        params,
    })
}

/// One page of primary keys and field values, as text, ordered by primary key
///
/// The page starts strictly after `after`. The key parameter is cast to the
/// primary key's declared type so the comparison follows the same order as
/// `ORDER BY` and can use the primary key index.
pub fn fetch_page(
    query: &RecordQuery,
    meta: &ModelMeta,
    fields: &[String],
    after: Option<&str>,
    limit: usize,
) -> Result<Statement> {
    let table = quote_table(query.model().table())?;
    let pk = quote_ident(query.model().primary_key())?;
    let pk_type = meta.sql_type(query.model().primary_key())?;

    let mut columns = vec![format!("{}::text", pk)];
    for field in fields {
        columns.push(format!("{}::text", quote_ident(field)?));
    }

    let mut params = Vec::new();
    let mut clauses = render_filters(query, &mut params)?;
    if let Some(after) = after {
        let pk_type = pk_type.ok_or_else(|| {
            HattoriError::Validation(format!(
                "type of primary key '{}' of model '{}' is unknown",
                query.model().primary_key(),
                query.model()
            ))
        })?;
        params.push(Some(after.to_string()));
        clauses.push(format!("{} > ${}::text::{}", pk, params.len(), pk_type));
    }

    Ok(Statement {
        sql: format!(
            "SELECT {} FROM {}{} ORDER BY {} LIMIT {}",
            columns.join(", "),
            table,
            where_clause(&clauses),
            pk,
            limit
        ),
        params,
    })
}

/// Records per `UPDATE`, capped by the bind parameter limit
pub fn effective_chunk_size(chunk_size: usize, field_count: usize) -> usize {
    let per_record = field_count + 1;
    chunk_size.clamp(1, (MAX_BIND_PARAMETERS / per_record).max(1))
}

/// A single `UPDATE ... FROM (VALUES ...)` writing `fields` of `records`
///
/// Values are bound as text and cast to each column's declared type, and the
/// join compares the primary key in its own type.
pub fn bulk_update(meta: &ModelMeta, records: &[Record], fields: &[String]) -> Result<Statement> {
    let model = meta.model();
    let table = quote_table(model.table())?;
    let pk = quote_ident(model.primary_key())?;
    let pk_type = meta.sql_type(model.primary_key())?;

    let mut columns = Vec::with_capacity(fields.len());
    let mut assignments = Vec::with_capacity(fields.len());
    for field in fields {
        let column = quote_ident(field)?;
        let value = cast(&format!("v.{}", column), meta.sql_type(field)?);
        assignments.push(format!("{} = {}", column, value));
        columns.push(column);
    }

    let mut params = Vec::with_capacity(records.len() * (fields.len() + 1));
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let mut placeholders = Vec::with_capacity(fields.len() + 1);
        params.push(Some(record.pk().to_string()));
        placeholders.push(format!("${}", params.len()));
        for field in fields {
            params.push(record.get(field).map(str::to_string));
            placeholders.push(format!("${}", params.len()));
        }
        rows.push(format!("({})", placeholders.join(", ")));
    }

    let join = match pk_type {
        Some(_) => format!("target.{} = {}", pk, cast("v.__pk", pk_type)),
        None => format!("target.{}::text = v.__pk", pk),
    };

    Ok(Statement {
        sql: format!(
            "UPDATE {} AS target SET {} FROM (VALUES {}) AS v(__pk, {}) WHERE {}",
            table,
            assignments.join(", "),
            rows.join(", "),
            columns.join(", "),
            join
        ),
        params,
    })
}
