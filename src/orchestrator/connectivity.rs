use log::{info, warn};

use super::LaunchError;
use crate::executor::connection::ConnectionError;
use crate::model::config::DatabaseConfig;
use crate::model::{DatabaseCredentials, Settings};

/// Connect, list the tables of one schema, close.
pub trait SchemaCatalog {
    fn list_tables(
        &self,
        credentials: &DatabaseCredentials,
        schema: &str,
    ) -> Result<Vec<String>, ConnectionError>;
}

/// Tables found in the schema, checked against the tables the app reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCheckResult {
    tables: Vec<String>,
    required: Vec<String>,
}

impl SchemaCheckResult {
    pub fn new(mut tables: Vec<String>, required: &[String]) -> Self {
        tables.sort();
        tables.dedup();
        Self {
            tables,
            required: required.to_vec(),
        }
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn is_present(&self, table: &str) -> bool {
        self.tables.binary_search_by(|t| t.as_str().cmp(table)).is_ok()
    }

    /// Each required table with its presence, in required order.
    pub fn required_status(&self) -> impl Iterator<Item = (&str, bool)> {
        self.required
            .iter()
            .map(|table| (table.as_str(), self.is_present(table)))
    }

    pub fn missing(&self) -> Vec<&str> {
        self.required_status()
            .filter(|(_, present)| !present)
            .map(|(table, _)| table)
            .collect()
    }
}

/// Check the database is reachable and report required tables.
///
/// Only a failed connection is an error; missing tables are warnings.
pub fn verify_connectivity(
    catalog: &dyn SchemaCatalog,
    settings: &Settings,
    config: &DatabaseConfig,
) -> Result<SchemaCheckResult, LaunchError> {
    let credentials = DatabaseCredentials::resolve(settings)
        .map_err(|e| LaunchError::DatabaseConnectionFailed(e.to_string()))?;

    info!("Checking database connection to {}", credentials);
    let tables = catalog
        .list_tables(&credentials, &config.schema)
        .map_err(|e| LaunchError::DatabaseConnectionFailed(e.to_string()))?;

    let result = SchemaCheckResult::new(tables, &config.required_tables);
    info!(
        "Connected: {} table(s) in schema '{}'",
        result.tables().len(),
        config.schema
    );

    for (table, present) in result.required_status() {
        if present {
            info!("  table {}: present", table);
        } else {
            warn!("  table {}: missing", table);
        }
    }

    Ok(result)
}
