use std::io::Write;

use tracing::info;

use crate::clause::{build_sql, TABLE_NAME};
use crate::driver::Connector;
use crate::error::{DbError, HarnessError};
use crate::runner::StatementRunner;

pub const ITERATIONS: usize = 15;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct StressSummary {
    pub completed: usize,
    pub failed: usize,
}

fn setup_statements() -> [String; 3] {
    [
        format!("DROP TABLE IF EXISTS {TABLE_NAME}"),
        format!("CREATE TABLE {TABLE_NAME} (i int)"),
        format!("INSERT INTO {TABLE_NAME} VALUES (1),(2),(3),(4),(5),(6),(7),(8),(9)"),
    ]
}

/// Recreates the stress table with nine rows. Stops at the first failure.
pub fn seed_table<C: Connector>(runner: &StatementRunner<C>) -> Result<(), DbError> {
    for sql in setup_statements() {
        runner.execute_update(&sql)?;
    }
    Ok(())
}

/// Seeds the table, then runs the OR-chain query for every count in
/// `1..=iterations`, echoing each iteration and its SQL to `out`.
///
/// Seeding errors are returned. Query errors are logged by the runner and
/// the loop moves on.
pub fn run<C: Connector, W: Write>(
    runner: &StatementRunner<C>,
    iterations: usize,
    out: &mut W,
) -> Result<StressSummary, HarnessError> {
    seed_table(runner)?;

    let mut summary = StressSummary::default();

    for iteration in 1..=iterations {
        let sql = build_sql(iteration);
        writeln!(out, "Iteration : {iteration}").map_err(HarnessError::Output)?;
        writeln!(out, "SQL : {sql}").map_err(HarnessError::Output)?;

        if runner.execute_statement(&sql).is_failed() {
            summary.failed += 1;
        } else {
            summary.completed += 1;
        }

        writeln!(out).map_err(HarnessError::Output)?;
        writeln!(out).map_err(HarnessError::Output)?;
    }

    info!(
        completed = summary.completed,
        failed = summary.failed,
        "stress run finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::{run, seed_table, StressSummary, ITERATIONS};
    use crate::driver::testing::RecordingConnector;
    use crate::error::HarnessError;
    use crate::runner::StatementRunner;
    use crate::types::{ConnectionDescriptor, Outcome, QueryStats};

    fn sqlite_runner(dir: &tempfile::TempDir) -> StatementRunner {
        let path = dir.path().join("stress.db");
        StatementRunner::new(ConnectionDescriptor::new(format!("sqlite:{}", path.display())))
    }

    #[test]
    fn test_seeding_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let runner = sqlite_runner(&dir);

        seed_table(&runner).unwrap();
        seed_table(&runner).unwrap();

        assert_eq!(
            runner.execute_statement("SELECT i FROM HIVE_15388"),
            Outcome::Completed(QueryStats {
                columns: 1,
                rows: 9
            })
        );
    }

    #[test]
    fn test_full_run_prints_every_iteration() {
        let dir = tempfile::tempdir().unwrap();
        let runner = sqlite_runner(&dir);
        let mut out = Vec::new();

        let summary = run(&runner, ITERATIONS, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(
            summary,
            StressSummary {
                completed: 15,
                failed: 0
            }
        );
        assert_eq!(printed.matches("Iteration : ").count(), 15);
        assert!(printed.contains("Iteration : 15\n"));
        assert!(!printed.contains("Iteration : 16"));
    }

    #[test]
    fn test_first_iteration_output() {
        let dir = tempfile::tempdir().unwrap();
        let runner = sqlite_runner(&dir);
        let mut out = Vec::new();

        run(&runner, 1, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Iteration : 1\nSQL : select * from HIVE_15388 where (i = 0) OR i = 0\n\n\n"
        );
    }

    #[test]
    fn test_seed_failure_is_fatal() {
        let runner = StatementRunner::new(ConnectionDescriptor::new("oracle:thin@localhost"));
        let mut out = Vec::new();

        let err = run(&runner, ITERATIONS, &mut out).unwrap_err();

        assert!(matches!(err, HarnessError::Database(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_query_failures_do_not_stop_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stress.db");
        let runner = StatementRunner::with_connector(
            ConnectionDescriptor::new(format!("sqlite:{}", path.display())),
            RecordingConnector::failing_queries_containing(") OR i = 0"),
        );
        let mut out = Vec::new();

        let summary = run(&runner, 3, &mut out).unwrap();

        assert_eq!(
            summary,
            StressSummary {
                completed: 0,
                failed: 3
            }
        );
        assert_eq!(String::from_utf8(out).unwrap().matches("Iteration : ").count(), 3);
        insta::assert_snapshot!(runner.connector().events().join("\n"), @r"
        connect
        update: DROP TABLE IF EXISTS HIVE_15388
        close
        connect
        update: CREATE TABLE HIVE_15388 (i int)
        close
        connect
        update: INSERT INTO HIVE_15388 VALUES (1),(2),(3),(4),(5),(6),(7),(8),(9)
        close
        connect
        query: select * from HIVE_15388 where (i = 0) OR i = 0
        close
        connect
        query: select * from HIVE_15388 where ((i = 0) OR i = 0) OR i = 0
        close
        connect
        query: select * from HIVE_15388 where (((i = 0) OR i = 0) OR i = 0) OR i = 0
        close
        ");
    }
}
