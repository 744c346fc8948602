use log::{debug, info};
use odbc_api::{
    buffers::TextRowSet, Connection, ConnectionOptions, Cursor, Environment, Error as OdbcError,
};

use crate::model::config::DatabaseConfig;
use crate::model::DatabaseCredentials;
use crate::orchestrator::SchemaCatalog;

/// Rows fetched per round trip when listing tables.
const TABLE_BATCH_SIZE: usize = 256;
/// PostgreSQL identifiers are at most 63 bytes.
const MAX_NAME_LEN: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("ODBC error: {0}")]
    Odbc(#[from] OdbcError),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),
}

/// ODBC connection string for PostgreSQL through `driver`.
pub fn connection_string(driver: &str, credentials: &DatabaseCredentials) -> String {
    format!(
        "Driver={};Server={};Port={};Database={};Uid={};Pwd={};",
        braced(driver),
        escape_value(&credentials.host),
        credentials.port,
        escape_value(&credentials.dbname),
        escape_value(&credentials.user),
        escape_value(&credentials.password),
    )
}

fn braced(value: &str) -> String {
    format!("{{{}}}", value.replace('}', "}}"))
}

/// Values with separators, braces or edge whitespace must be braced.
fn escape_value(value: &str) -> String {
    let needs_braces = value.contains([';', '{', '}', '='])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);
    if needs_braces {
        braced(value)
    } else {
        value.to_string()
    }
}

/// Catalog query for the tables of one schema, sorted by name.
pub fn tables_query(schema: &str) -> String {
    format!(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = '{}' ORDER BY table_name",
        schema.replace('\'', "''")
    )
}

pub struct ConnectionManager {
    environment: Environment,
}

impl ConnectionManager {
    pub fn new() -> Result<Self, ConnectionError> {
        let environment = Environment::new()?;
        Ok(Self { environment })
    }

    pub fn connect(
        &self,
        connection_string: &str,
        login_timeout_sec: u32,
    ) -> Result<Connection<'_>, ConnectionError> {
        debug!(
            "Connecting to database with connection string length: {}",
            connection_string.len()
        );

        let options = ConnectionOptions {
            login_timeout_sec: Some(login_timeout_sec),
            ..ConnectionOptions::default()
        };
        let connection = self
            .environment
            .connect_with_connection_string(connection_string, options)
            .map_err(|e| {
                debug!("Connection attempt failed: {}", e);
                ConnectionError::ConnectionFailed(e.to_string())
            })?;

        info!("Successfully connected to database");
        Ok(connection)
    }

    /// Connect, list the schema's tables, then close the connection.
    pub fn list_tables(
        &self,
        connection_string: &str,
        login_timeout_sec: u32,
        schema: &str,
    ) -> Result<Vec<String>, ConnectionError> {
        let connection = self.connect(connection_string, login_timeout_sec)?;
        let tables = fetch_table_names(&connection, schema);
        drop(connection);
        debug!("Database connection closed");
        tables
    }
}

fn fetch_table_names(connection: &Connection<'_>, schema: &str) -> Result<Vec<String>, ConnectionError> {
    let query = tables_query(schema);
    debug!("Executing SQL statement: {}", query);

    let mut prepared = connection
        .prepare(&query)
        .map_err(|e| ConnectionError::QueryFailed(e.to_string()))?;

    let Some(mut cursor) = prepared
        .execute(())
        .map_err(|e| ConnectionError::QueryFailed(e.to_string()))?
    else {
        return Ok(Vec::new());
    };

    let mut buffer = TextRowSet::for_cursor(TABLE_BATCH_SIZE, &mut cursor, Some(MAX_NAME_LEN))?;
    let mut row_set_cursor = cursor.bind_buffer(&mut buffer)?;

    let mut tables = Vec::new();
    while let Some(batch) = row_set_cursor.fetch()? {
        for row in 0..batch.num_rows() {
            let name = batch
                .at_as_str(0, row)
                .map_err(|e| ConnectionError::QueryFailed(e.to_string()))?;
            if let Some(name) = name {
                tables.push(name.to_string());
            }
        }
    }

    Ok(tables)
}

/// `SchemaCatalog` over a PostgreSQL ODBC driver.
pub struct OdbcCatalog {
    driver: String,
    login_timeout_sec: u32,
}

impl OdbcCatalog {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            driver: config.driver.clone(),
            login_timeout_sec: config.connect_timeout_secs,
        }
    }
}

impl SchemaCatalog for OdbcCatalog {
    fn list_tables(
        &self,
        credentials: &DatabaseCredentials,
        schema: &str,
    ) -> Result<Vec<String>, ConnectionError> {
        let manager = ConnectionManager::new()?;
        let connection_string = connection_string(&self.driver, credentials);
        manager.list_tables(&connection_string, self.login_timeout_sec, schema)
    }
}
