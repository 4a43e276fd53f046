use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use sql_harness::ConnectionDescriptor;

/// Run every statement of a SQL file against a database, timing each step
#[derive(Parser, Debug)]
#[command(name = "sql-runner", version, long_about = None)]
pub struct RunnerArgs {
    /// Provide connection url (sqlite:<path>, postgres://...)
    #[arg(long = "connectUrl", value_name = "connectUrl")]
    pub connect_url: String,

    /// Provide userName
    #[arg(long = "user", value_name = "user", env = "SQL_RUNNER_USER")]
    pub user: Option<String>,

    /// Provide password
    #[arg(
        long = "password",
        value_name = "password",
        env = "SQL_RUNNER_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Provide sqlFile, one statement per line
    #[arg(long = "sqlFile", value_name = "sqlFile")]
    pub sql_file: PathBuf,
}

impl RunnerArgs {
    pub fn descriptor(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::new(self.connect_url.clone())
            .with_credentials(self.user.clone(), self.password.clone())
    }
}

/// Parses runner flags. On a bad command line the full usage text goes to
/// standard output before the error is handed back.
pub fn parse_runner_args<I, T>(args: I) -> Result<RunnerArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    RunnerArgs::try_parse_from(args).inspect_err(|err| {
        if err.use_stderr() {
            println!("{}", RunnerArgs::command().render_help());
        }
    })
}

/// Recreate the HIVE_15388 table and time ever deeper OR-chained queries
/// against it
#[derive(Parser, Debug)]
#[command(name = "or-chain-stress", version, long_about = None)]
pub struct StressArgs {
    /// Connection url (sqlite:<path>, postgres://...)
    pub connect_url: String,
}

impl StressArgs {
    pub fn descriptor(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::new(self.connect_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::error::ErrorKind;
    use clap::Parser;

    use super::{parse_runner_args, StressArgs};

    #[test]
    fn test_parses_all_flags() {
        let args = parse_runner_args([
            "sql-runner",
            "--connectUrl",
            "postgres://localhost/hive",
            "--sqlFile",
            "queries.sql",
            "--user",
            "hive",
            "--password",
            "secret",
        ])
        .unwrap();

        assert_eq!(args.sql_file, PathBuf::from("queries.sql"));

        let descriptor = args.descriptor();
        assert_eq!(descriptor.url(), "postgres://localhost/hive");
        assert_eq!(descriptor.user(), Some("hive"));
        assert_eq!(descriptor.password(), Some("secret"));
    }

    #[test]
    fn test_missing_sql_file_is_rejected() {
        let err = parse_runner_args(["sql-runner", "--connectUrl", "sqlite::memory:"]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_missing_connect_url_is_rejected() {
        let err = parse_runner_args(["sql-runner", "--sqlFile", "q.sql"]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = parse_runner_args([
            "sql-runner",
            "--connectUrl",
            "sqlite::memory:",
            "--sqlFile",
            "q.sql",
            "--iterations",
            "3",
        ])
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_stress_takes_one_positional_url() {
        let args = StressArgs::parse_from(["or-chain-stress", "sqlite:/tmp/hive.db"]);
        assert_eq!(args.descriptor().url(), "sqlite:/tmp/hive.db");

        let err = StressArgs::try_parse_from(["or-chain-stress"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
