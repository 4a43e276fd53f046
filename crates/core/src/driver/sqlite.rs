use std::path::Path;

use super::{Connection, ResultSet, Row, Statement};
use crate::error::DbError;
use crate::types::Value;

pub struct SqliteConnection {
    connection: rusqlite::Connection,
}

impl SqliteConnection {
    pub fn open(path: &Path) -> Result<SqliteConnection, DbError> {
        Ok(SqliteConnection {
            connection: rusqlite::Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<SqliteConnection, DbError> {
        Ok(SqliteConnection {
            connection: rusqlite::Connection::open_in_memory()?,
        })
    }
}

impl Connection for SqliteConnection {
    fn create_statement(&mut self) -> Result<Box<dyn Statement + '_>, DbError> {
        Ok(Box::new(SqliteStatement {
            connection: &self.connection,
            prepared: None,
        }))
    }
}

// sqlite prepares per sql text, so the prepared statement lives here and the
// result set borrows it
struct SqliteStatement<'conn> {
    connection: &'conn rusqlite::Connection,
    prepared: Option<rusqlite::Statement<'conn>>,
}

impl Statement for SqliteStatement<'_> {
    fn execute_update(&mut self, sql: &str) -> Result<u64, DbError> {
        let changed = self.connection.execute(sql, [])?;
        Ok(u64::try_from(changed).unwrap_or(u64::MAX))
    }

    fn execute_query(&mut self, sql: &str) -> Result<Box<dyn ResultSet + '_>, DbError> {
        let prepared = self.connection.prepare(sql)?;
        let prepared = self.prepared.insert(prepared);

        let column_count = prepared.column_count();
        let rows = prepared.query([])?;

        Ok(Box::new(SqliteResultSet { rows, column_count }))
    }
}

struct SqliteResultSet<'stmt> {
    rows: rusqlite::Rows<'stmt>,
    column_count: usize,
}

impl ResultSet for SqliteResultSet<'_> {
    fn column_count(&self) -> usize {
        self.column_count
    }

    fn next_row(&mut self) -> Result<Option<&dyn Row>, DbError> {
        let row = self.rows.next()?;
        Ok(row.map(|row| row as &dyn Row))
    }
}

impl Row for rusqlite::Row<'_> {
    fn get_value(&self, index: usize) -> Result<Value, DbError> {
        let value: rusqlite::types::Value = self.get(index)?;
        Ok(value.into())
    }
}
