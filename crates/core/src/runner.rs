use tracing::debug;

use crate::driver::{Connection, Connector, DriverManager, ResultSet};
use crate::error::DbError;
use crate::timing::Stopwatch;
use crate::types::{ConnectionDescriptor, Outcome, QueryStats};

/// Runs one statement per connection and logs how long every step took.
///
/// Nothing is pooled: each call opens a fresh connection and closes it again
/// before returning, on success and on failure alike.
pub struct StatementRunner<C = DriverManager> {
    descriptor: ConnectionDescriptor,
    connector: C,
    stopwatch: Stopwatch,
}

impl StatementRunner {
    pub fn new(descriptor: ConnectionDescriptor) -> StatementRunner {
        StatementRunner::with_connector(descriptor, DriverManager)
    }
}

impl<C: Connector> StatementRunner<C> {
    pub fn with_connector(descriptor: ConnectionDescriptor, connector: C) -> StatementRunner<C> {
        StatementRunner {
            descriptor,
            connector,
            stopwatch: Stopwatch::new(),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    /// Runs DDL or DML. Failures are returned to the caller.
    pub fn execute_update(&self, sql: &str) -> Result<u64, DbError> {
        self.stopwatch.checkpoint(&format!("Executing query: {sql}"));
        // declared first so it is dropped after the connection
        let _closed = self.stopwatch.scope("Closed connection");

        let mut connection = self.open_connection()?;
        let mut statement = connection.create_statement()?;
        self.stopwatch.checkpoint("Time taken to create statement");

        let affected = statement.execute_update(sql)?;
        self.stopwatch.checkpoint("Time taken to execute query");
        debug!(affected, "update finished");

        Ok(affected)
    }

    /// Runs a query and drains every row and column without keeping
    /// anything. Failures are logged here and never returned.
    pub fn execute_statement(&self, sql: &str) -> Outcome {
        self.stopwatch.checkpoint(&format!("Executing query: {sql}"));
        let _closed = self.stopwatch.scope("Closed connection");

        match self.run_query(sql) {
            Ok(stats) => {
                debug!(columns = stats.columns, rows = stats.rows, "query drained");
                Outcome::Completed(stats)
            }
            Err(err) => {
                self.stopwatch.fail("Error executing query", &err);
                Outcome::Failed
            }
        }
    }

    fn open_connection(&self) -> Result<Box<dyn Connection>, DbError> {
        let connection = self.connector.connect(&self.descriptor)?;
        self.stopwatch.checkpoint("Time taken for getConnection");
        Ok(connection)
    }

    fn run_query(&self, sql: &str) -> Result<QueryStats, DbError> {
        let mut connection = self.open_connection()?;
        let mut statement = connection.create_statement()?;
        self.stopwatch.checkpoint("Time taken to create statement");

        let results = statement.execute_query(sql)?;
        self.stopwatch.checkpoint("Time taken to execute query");

        let _closed = self.stopwatch.scope("Closed resultSet");
        self.drain(results)
    }

    // takes the result set by value so it is closed before the scope above
    fn drain(&self, mut results: Box<dyn ResultSet + '_>) -> Result<QueryStats, DbError> {
        let columns = results.column_count();
        self.stopwatch.checkpoint("Time taken to get resultset metadata");

        let mut rows = 0;
        while let Some(row) = results.next_row()? {
            for index in 0..columns {
                let _value = row.get_value(index)?;
            }

            rows += 1;
            if rows == 1 {
                self.stopwatch.checkpoint("Processed first record");
            }
        }
        self.stopwatch.checkpoint("Processed all records");

        Ok(QueryStats { columns, rows })
    }
}
