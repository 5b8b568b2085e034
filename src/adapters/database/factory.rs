//! Record store factory
//!
//! This module builds the record store described by the configuration.

use crate::adapters::database::traits::RecordStore;
use crate::adapters::postgresql::adapter::PostgreSQLStore;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::HattoriConfig;
use crate::domain::{HattoriError, Result};
use std::sync::Arc;

/// Create the record store for a configuration
///
/// Opens the PostgreSQL pool and checks that a connection can be made.
///
/// # Errors
///
/// Returns a configuration error if the `[database]` section is missing or
/// invalid, or a connection error if the database cannot be reached.
pub async fn create_record_store(config: &HattoriConfig) -> Result<Arc<dyn RecordStore>> {
    let database = config
        .require_database()
        .map_err(HattoriError::Configuration)?;

    tracing::info!("Creating PostgreSQL record store");
    let client = PostgreSQLClient::new(database.clone())?;
    client.test_connection().await?;

    Ok(Arc::new(PostgreSQLStore::new(client)) as Arc<dyn RecordStore>)
}
