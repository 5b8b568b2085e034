//! PostgreSQL record store
//!
//! Implements [`RecordStore`] on top of [`PostgreSQLClient`]. Every value
//! crosses the wire as text and is cast to its column type by the statement;
//! statements come from [`super::sql`].

use super::client::PostgreSQLClient;
use super::sql::{self, Statement};
use crate::adapters::database::traits::RecordStore;
use crate::domain::{FieldMeta, HattoriError, ModelMeta, ModelRef, Record, RecordQuery, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

fn params(statement: &Statement) -> Vec<&(dyn ToSql + Sync)> {
    statement
        .params
        .iter()
        .map(|p| p as &(dyn ToSql + Sync))
        .collect()
}

fn db_error(context: &str) -> impl Fn(tokio_postgres::Error) -> HattoriError + '_ {
    move |e| HattoriError::Database(format!("{}: {}", context, e))
}

/// PostgreSQL implementation of [`RecordStore`]
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLStore {
    /// Create a new PostgreSQL store
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl RecordStore for PostgreSQLStore {
    fn name(&self) -> &str {
        "postgresql"
    }

    async fn describe(&self, model: &ModelRef) -> Result<ModelMeta> {
        let statement = sql::describe(model)?;
        let client = self.client.get_connection().await?;
        let rows = client
            .query(statement.sql.as_str(), &params(&statement))
            .await
            .map_err(db_error("Failed to read column metadata"))?;

        if rows.is_empty() {
            return Err(HattoriError::Database(format!(
                "table '{}' does not exist or has no visible columns",
                model.table()
            )));
        }

        let mut fields = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get(0).map_err(db_error("Invalid column name"))?;
            let max_length: Option<i32> =
                row.try_get(1).map_err(db_error("Invalid column length"))?;
            let type_schema: Option<String> =
                row.try_get(2).map_err(db_error("Invalid column type schema"))?;
            let type_name: Option<String> =
                row.try_get(3).map_err(db_error("Invalid column type"))?;

            let field = match max_length {
                Some(n) if n > 0 => FieldMeta::bounded(name, n as usize),
                _ => FieldMeta::unbounded(name),
            };
            fields.push(match (type_schema, type_name) {
                (Some(schema), Some(type_name)) => {
                    field.with_sql_type(sql::quote_type(&schema, &type_name))
                }
                _ => field,
            });
        }

        tracing::debug!(model = %model, fields = fields.len(), "Described model");
        Ok(ModelMeta::new(model.clone(), fields))
    }

    async fn count(&self, query: &RecordQuery) -> Result<usize> {
        let statement = sql::count(query)?;
        let client = self.client.get_connection().await?;
        let row = client
            .query_one(statement.sql.as_str(), &params(&statement))
            .await
            .map_err(db_error("Count query failed"))?;
        let count: i64 = row.try_get(0).map_err(db_error("Invalid count"))?;
        Ok(count.max(0) as usize)
    }

    async fn fetch_page(
        &self,
        query: &RecordQuery,
        meta: &Arc<ModelMeta>,
        fields: &[String],
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Record>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        for field in fields {
            meta.field(field)?;
        }

        let statement = sql::fetch_page(query, meta, fields, after, limit)?;
        let client = self.client.get_connection().await?;
        let rows = client
            .query(statement.sql.as_str(), &params(&statement))
            .await
            .map_err(db_error("Page query failed"))?;

        rows.iter()
            .map(|row| -> Result<Record> {
                let pk: String = row.try_get(0).map_err(db_error("Invalid primary key"))?;
                let mut record = Record::new(pk, meta.clone());
                for (index, field) in fields.iter().enumerate() {
                    let value: Option<String> = row
                        .try_get(index + 1)
                        .map_err(db_error("Invalid field value"))?;
                    record = record.with_value(field.as_str(), value);
                }
                Ok(record)
            })
            .collect()
    }

    async fn bulk_update(
        &self,
        meta: &ModelMeta,
        records: &[Record],
        fields: &[String],
        chunk_size: usize,
    ) -> Result<usize> {
        if records.is_empty() || fields.is_empty() {
            return Ok(0);
        }

        let chunk_size = sql::effective_chunk_size(chunk_size, fields.len());
        let mut client = self.client.get_connection().await?;
        let transaction = client
            .transaction()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let mut written = 0;
        for chunk in records.chunks(chunk_size) {
            let statement = sql::bulk_update(meta, chunk, fields)?;
            let updated = transaction
                .execute(statement.sql.as_str(), &params(&statement))
                .await
                .map_err(db_error("Bulk update failed"))?;
            written += updated as usize;
        }

        transaction
            .commit()
            .await
            .map_err(db_error("Failed to commit bulk update"))?;

        tracing::debug!(
            model = %meta.model(),
            records = records.len(),
            written,
            "Bulk update committed"
        );
        Ok(written)
    }
}
