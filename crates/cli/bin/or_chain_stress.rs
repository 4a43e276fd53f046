use clap::Parser;
use sql_harness::{stress, StatementRunner};
use sql_harness_cli::{args::StressArgs, logging};

fn main() -> anyhow::Result<()> {
    let args = StressArgs::parse();

    logging::init();

    let runner = StatementRunner::new(args.descriptor());
    stress::run(&runner, stress::ITERATIONS, &mut std::io::stdout())?;

    Ok(())
}
