//! In-memory record store
//!
//! [`MemoryStore`] keeps tables in process memory. It evaluates filters the
//! way SQL does, orders rows by primary key (numerically when both keys are
//! integers), pages by key the way the SQL store does and records every bulk-update call so tests can inspect exactly
//! what the runner asked to persist.

use crate::adapters::database::traits::RecordStore;
use crate::domain::{
    FieldFilter, FieldMeta, HattoriError, ModelMeta, ModelRef, Record, RecordQuery, Result,
};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

type Row = BTreeMap<String, Option<String>>;

#[derive(Debug, Default)]
struct MemoryTable {
    fields: Vec<FieldMeta>,
    rows: HashMap<String, Row>,
}

impl MemoryTable {
    fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

/// One recorded `bulk_update` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkUpdateCall {
    /// Table written
    pub table: String,

    /// Primary keys of the records, in call order
    pub pks: Vec<String>,

    /// Fields the call was scoped to
    pub fields: Vec<String>,

    /// Requested chunk size
    pub chunk_size: usize,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, MemoryTable>,
    calls: Vec<BulkUpdateCall>,
    fail_update_at: Option<usize>,
}

/// Record store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn compare_pks(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers a table with its field metadata, replacing any existing one
    pub fn create_table(&self, table: &str, fields: impl IntoIterator<Item = FieldMeta>) {
        self.lock().tables.insert(
            table.to_string(),
            MemoryTable {
                fields: fields.into_iter().collect(),
                rows: HashMap::new(),
            },
        );
    }

    /// Inserts or replaces a row
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not registered or a field is unknown.
    pub fn insert<'a>(
        &self,
        table: &str,
        pk: impl Into<String>,
        values: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
    ) -> Result<()> {
        let mut state = self.lock();
        let memory_table = table_mut(&mut state, table)?;

        let mut row = Row::new();
        for (field, value) in values {
            if !memory_table.has_field(field) {
                return Err(unknown_field(table, field));
            }
            row.insert(field.to_string(), value.map(str::to_string));
        }
        memory_table.rows.insert(pk.into(), row);
        Ok(())
    }

    /// Current value of a field, `None` for NULL or missing rows
    pub fn value(&self, table: &str, pk: &str, field: &str) -> Option<String> {
        self.lock()
            .tables
            .get(table)
            .and_then(|t| t.rows.get(pk))
            .and_then(|row| row.get(field).cloned().flatten())
    }

    /// Number of rows in a table
    pub fn len(&self, table: &str) -> usize {
        self.lock()
            .tables
            .get(table)
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }

    /// Whether a table has no rows
    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    /// Every recorded bulk-update call, oldest first
    pub fn bulk_update_calls(&self) -> Vec<BulkUpdateCall> {
        self.lock().calls.clone()
    }

    /// Makes the `n`th bulk-update call (1-based) fail without writing
    pub fn fail_bulk_update_at(&self, n: usize) {
        self.lock().fail_update_at = Some(n);
    }
}

fn unknown_field(table: &str, field: &str) -> HattoriError {
    HattoriError::UnknownField {
        model: table.to_string(),
        field: field.to_string(),
    }
}

fn table_mut<'a>(state: &'a mut State, table: &str) -> Result<&'a mut MemoryTable> {
    state
        .tables
        .get_mut(table)
        .ok_or_else(|| HattoriError::Database(format!("table '{}' does not exist", table)))
}

fn table_ref<'a>(state: &'a State, table: &str) -> Result<&'a MemoryTable> {
    state
        .tables
        .get(table)
        .ok_or_else(|| HattoriError::Database(format!("table '{}' does not exist", table)))
}

fn row_matches(
    model: &ModelRef,
    table: &MemoryTable,
    pk: &str,
    row: &Row,
    filters: &[FieldFilter],
) -> Result<bool> {
    for filter in filters {
        let actual = if filter.field == model.primary_key() {
            Some(pk)
        } else if table.has_field(&filter.field) {
            row.get(&filter.field).and_then(|v| v.as_deref())
        } else {
            return Err(unknown_field(model.table(), &filter.field));
        };
        if !filter.matches(actual) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn select<'a>(table: &'a MemoryTable, query: &RecordQuery) -> Result<Vec<(&'a String, &'a Row)>> {
    let mut selected = Vec::new();
    for (pk, row) in &table.rows {
        if row_matches(query.model(), table, pk, row, query.filters())? {
            selected.push((pk, row));
        }
    }
    selected.sort_by(|a, b| compare_pks(a.0, b.0));
    Ok(selected)
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn describe(&self, model: &ModelRef) -> Result<ModelMeta> {
        let state = self.lock();
        let table = table_ref(&state, model.table())?;
        Ok(ModelMeta::new(model.clone(), table.fields.iter().cloned()))
    }

    async fn count(&self, query: &RecordQuery) -> Result<usize> {
        let state = self.lock();
        let table = table_ref(&state, query.model().table())?;
        Ok(select(table, query)?.len())
    }

    async fn fetch_page(
        &self,
        query: &RecordQuery,
        meta: &Arc<ModelMeta>,
        fields: &[String],
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Record>> {
        for field in fields {
            meta.field(field)?;
        }

        let state = self.lock();
        let table = table_ref(&state, query.model().table())?;

        Ok(select(table, query)?
            .into_iter()
            .filter(|(pk, _)| {
                after.map_or(true, |last| compare_pks(pk, last) == Ordering::Greater)
            })
            .take(limit)
            .map(|(pk, row)| {
                fields.iter().fold(Record::new(pk.as_str(), meta.clone()), |record, field| {
                    record.with_value(field.as_str(), row.get(field).cloned().flatten())
                })
            })
            .collect())
    }

    async fn bulk_update(
        &self,
        meta: &ModelMeta,
        records: &[Record],
        fields: &[String],
        chunk_size: usize,
    ) -> Result<usize> {
        let mut state = self.lock();
        let table_name = meta.model().table().to_string();

        state.calls.push(BulkUpdateCall {
            table: table_name.clone(),
            pks: records.iter().map(|r| r.pk().to_string()).collect(),
            fields: fields.to_vec(),
            chunk_size,
        });
        if state.fail_update_at == Some(state.calls.len()) {
            return Err(HattoriError::Database(format!(
                "simulated failure of bulk update #{}",
                state.calls.len()
            )));
        }

        let table = table_mut(&mut state, &table_name)?;
        for field in fields {
            if !table.has_field(field) {
                return Err(unknown_field(&table_name, field));
            }
        }

        let mut written = 0;
        for record in records {
            if let Some(row) = table.rows.get_mut(record.pk()) {
                for field in fields {
                    row.insert(field.clone(), record.get(field).map(str::to_string));
                }
                written += 1;
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_table(
            "people",
            [
                FieldMeta::unbounded("id"),
                FieldMeta::bounded("name", 10),
                FieldMeta::unbounded("role"),
            ],
        );
        for (pk, name, role) in [
            ("10", "Jo", Some("admin")),
            ("2", "Al", None),
            ("1", "Bo", Some("user")),
        ] {
            store
                .insert("people", pk, [("name", Some(name)), ("role", role)])
                .unwrap();
        }
        store
    }

    fn model() -> ModelRef {
        ModelRef::new("people").unwrap()
    }

    #[tokio::test]
    async fn test_describe() {
        let meta = store().describe(&model()).await.unwrap();
        assert_eq!(meta.max_length("name").unwrap(), Some(10));
        assert!(meta.has_field("role"));
    }

    #[tokio::test]
    async fn test_describe_missing_table() {
        let result = store().describe(&ModelRef::new("missing").unwrap()).await;
        assert!(matches!(result, Err(HattoriError::Database(_))));
    }

    #[tokio::test]
    async fn test_fetch_orders_by_numeric_pk() {
        let store = store();
        let meta = Arc::new(store.describe(&model()).await.unwrap());
        let fields = vec!["name".to_string()];
        let query = RecordQuery::all(model());

        let records = store.fetch_page(&query, &meta, &fields, None, 10).await.unwrap();
        let pks: Vec<&str> = records.iter().map(|r| r.pk()).collect();
        assert_eq!(pks, vec!["1", "2", "10"]);

        let second = store.fetch_page(&query, &meta, &fields, Some("1"), 1).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].get("name"), Some("Al"));
    }

    #[tokio::test]
    async fn test_fetch_after_key_is_numeric() {
        let store = store();
        let meta = Arc::new(store.describe(&model()).await.unwrap());
        let fields = vec!["name".to_string()];
        let query = RecordQuery::all(model());

        let rest = store.fetch_page(&query, &meta, &fields, Some("2"), 10).await.unwrap();
        let pks: Vec<&str> = rest.iter().map(|r| r.pk()).collect();
        assert_eq!(pks, vec!["10"]);

        let none = store.fetch_page(&query, &meta, &fields, Some("10"), 10).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_rewritten_rows_do_not_shift_later_pages() {
        let store = store();
        let meta = Arc::new(store.describe(&model()).await.unwrap());
        let fields = vec!["role".to_string()];
        let query = RecordQuery::all(model()).filter(FieldFilter::ne("role", "gone"));

        let first = store.fetch_page(&query, &meta, &fields, None, 1).await.unwrap();
        assert_eq!(first[0].pk(), "1");
        let mut record = first[0].clone();
        record.set("role", "gone");
        store.bulk_update(&meta, &[record], &fields, 10).await.unwrap();

        // Row 1 no longer matches; the next page still starts after it
        let second = store.fetch_page(&query, &meta, &fields, Some("1"), 1).await.unwrap();
        assert_eq!(second[0].pk(), "10");
    }

    #[tokio::test]
    async fn test_filters() {
        let store = store();
        let all = RecordQuery::all(model());
        assert_eq!(store.count(&all).await.unwrap(), 3);

        let admins = all.clone().filter(FieldFilter::eq("role", "admin"));
        assert_eq!(store.count(&admins).await.unwrap(), 1);

        let not_admin = all.clone().filter(FieldFilter::ne("role", "admin"));
        assert_eq!(store.count(&not_admin).await.unwrap(), 1);

        let no_role = all.clone().filter(FieldFilter::is_null("role"));
        assert_eq!(store.count(&no_role).await.unwrap(), 1);

        let by_pk = all.filter(FieldFilter::eq("id", "10"));
        assert_eq!(store.count(&by_pk).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_filter_on_unknown_field() {
        let query = RecordQuery::all(model()).filter(FieldFilter::is_null("nickname"));
        let result = store().count(&query).await;
        assert!(matches!(result, Err(HattoriError::UnknownField { .. })));
    }

    #[tokio::test]
    async fn test_fetch_unknown_field() {
        let store = store();
        let meta = Arc::new(store.describe(&model()).await.unwrap());
        let fields = vec!["nickname".to_string()];
        let result = store
            .fetch_page(&RecordQuery::all(model()), &meta, &fields, None, 10)
            .await;
        assert!(matches!(result, Err(HattoriError::UnknownField { .. })));
    }

    #[tokio::test]
    async fn test_bulk_update_writes_only_named_fields() {
        let store = store();
        let meta = Arc::new(store.describe(&model()).await.unwrap());
        let mut record = Record::new("1", meta.clone())
            .with_value("name", None)
            .with_value("role", None);
        record.set("name", "Zed");
        record.set("role", "ignored");

        let fields = vec!["name".to_string()];
        let written = store.bulk_update(&meta, &[record], &fields, 100).await.unwrap();

        assert_eq!(written, 1);
        assert_eq!(store.value("people", "1", "name").as_deref(), Some("Zed"));
        assert_eq!(store.value("people", "1", "role").as_deref(), Some("user"));

        let calls = store.bulk_update_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].fields, fields);
        assert_eq!(calls[0].chunk_size, 100);
    }

    #[tokio::test]
    async fn test_bulk_update_empty_is_noop() {
        let store = store();
        let meta = store.describe(&model()).await.unwrap();
        let written = store
            .bulk_update(&meta, &[], &["name".to_string()], 10)
            .await
            .unwrap();
        assert_eq!(written, 0);
        assert_eq!(store.bulk_update_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let store = store();
        store.fail_bulk_update_at(1);
        let meta = store.describe(&model()).await.unwrap();
        let result = store.bulk_update(&meta, &[], &["name".to_string()], 10).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_unknown_field() {
        let store = store();
        assert!(store.insert("people", "4", [("nickname", Some("x"))]).is_err());
        assert!(store
            .insert("missing", "4", Vec::<(&str, Option<&str>)>::new())
            .is_err());
    }
}
