mod pg;
mod sqlite;

use std::path::PathBuf;

use tracing::debug;

use crate::error::DbError;
use crate::types::{ConnectionDescriptor, Value};

pub use pg::PgConnection;
pub use sqlite::SqliteConnection;

/// Turns a connection descriptor into an open connection.
pub trait Connector {
    fn connect(&self, descriptor: &ConnectionDescriptor) -> Result<Box<dyn Connection>, DbError>;
}

/// An open connection. Dropping it closes it.
pub trait Connection {
    fn create_statement(&mut self) -> Result<Box<dyn Statement + '_>, DbError>;
}

pub trait Statement {
    /// Runs DDL or DML and returns the number of affected rows.
    fn execute_update(&mut self, sql: &str) -> Result<u64, DbError>;

    fn execute_query(&mut self, sql: &str) -> Result<Box<dyn ResultSet + '_>, DbError>;
}

/// A forward-only cursor over query results.
pub trait ResultSet {
    fn column_count(&self) -> usize;

    fn next_row(&mut self) -> Result<Option<&dyn Row>, DbError>;
}

pub trait Row {
    fn get_value(&self, index: usize) -> Result<Value, DbError>;
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Target {
    SqliteMemory,
    SqliteFile(PathBuf),
    Postgres(String),
}

/// Works out which backend a connection url points at. A leading `jdbc:` is
/// ignored so urls copied from JDBC tooling keep working.
pub fn resolve_url(url: &str) -> Result<Target, DbError> {
    let trimmed = url.trim();
    let without_jdbc = trimmed.strip_prefix("jdbc:").unwrap_or(trimmed);

    if let Some(rest) = without_jdbc.strip_prefix("sqlite:") {
        let path = rest.strip_prefix("//").unwrap_or(rest);
        return Ok(if path.is_empty() || path == ":memory:" {
            Target::SqliteMemory
        } else {
            Target::SqliteFile(PathBuf::from(path))
        });
    }

    if without_jdbc.starts_with("postgres://") || without_jdbc.starts_with("postgresql://") {
        return Ok(Target::Postgres(without_jdbc.to_string()));
    }

    Err(DbError::UnsupportedUrl(url.to_string()))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DriverManager;

impl Connector for DriverManager {
    fn connect(&self, descriptor: &ConnectionDescriptor) -> Result<Box<dyn Connection>, DbError> {
        match resolve_url(descriptor.url())? {
            Target::SqliteMemory => {
                ignore_credentials(descriptor);
                Ok(Box::new(SqliteConnection::open_in_memory()?))
            }
            Target::SqliteFile(path) => {
                ignore_credentials(descriptor);
                Ok(Box::new(SqliteConnection::open(&path)?))
            }
            Target::Postgres(url) => Ok(Box::new(PgConnection::connect(&url, descriptor)?)),
        }
    }
}

fn ignore_credentials(descriptor: &ConnectionDescriptor) {
    if descriptor.user().is_some() || descriptor.password().is_some() {
        debug!("sqlite has no authentication, ignoring credentials");
    }
}
