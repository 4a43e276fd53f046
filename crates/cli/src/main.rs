use sql_harness::{execute_sql_file, StatementRunner};
use sql_harness_cli::{args::parse_runner_args, logging};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = match parse_runner_args(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };

    logging::init();

    let runner = StatementRunner::new(args.descriptor());
    let summary = execute_sql_file(&runner, &args.sql_file, &mut std::io::stdout())?;

    if summary.aborted {
        info!("no statements executed");
    }

    Ok(())
}
