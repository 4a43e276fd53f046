use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{info, info_span};

use crate::driver::Connector;
use crate::error::HarnessError;
use crate::runner::StatementRunner;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct ScriptSummary {
    pub executed: usize,
    pub failed: usize,
    /// The file could not be read, so nothing ran.
    pub aborted: bool,
}

/// Turns one line of a script into a statement.
///
/// Whitespace is trimmed and a single trailing `;` removed. Blank lines give
/// `None`. Each line is one whole statement: there is no support for
/// statements spanning lines, comments or quoted semicolons.
pub fn statement_from_line(line: &str) -> Option<&str> {
    let line = line.trim();
    let line = line.strip_suffix(';').unwrap_or(line);

    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}

/// Statements in `contents` paired with their 1-based line number.
pub fn statements(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| statement_from_line(line).map(|sql| (index + 1, sql)))
}

/// Runs every statement in `path`, in order, through `runner`, writing a
/// blank line to `out` after each one.
///
/// A missing path is an error. A file that cannot be read is logged and
/// reported through [`ScriptSummary::aborted`].
pub fn execute_sql_file<C: Connector, W: Write>(
    runner: &StatementRunner<C>,
    path: &Path,
    out: &mut W,
) -> Result<ScriptSummary, HarnessError> {
    if !path.is_file() {
        return Err(HarnessError::InvalidFile(path.to_path_buf()));
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            runner.stopwatch().fail(
                &format!("Error in processing file {}", path.display()),
                &err,
            );
            return Ok(ScriptSummary {
                aborted: true,
                ..ScriptSummary::default()
            });
        }
    };

    let mut summary = ScriptSummary::default();

    for (line, sql) in statements(&contents) {
        let _span = info_span!("statement", line).entered();

        summary.executed += 1;
        if runner.execute_statement(sql).is_failed() {
            summary.failed += 1;
        }

        writeln!(out).map_err(HarnessError::Output)?;
    }

    info!(
        executed = summary.executed,
        failed = summary.failed,
        "finished {}",
        path.display()
    );

    Ok(summary)
}
