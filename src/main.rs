use clap::Parser;
use std::process::exit;

use web_harness::config::{self, Config};
use web_harness::error::Result;
use web_harness::logging;
use web_harness::report::{self, ReportRun};
use web_harness::runner::{DEFAULT_RUNNER_PROGRAM, RunCommand};

/// Run the test suite with all harness customization applied in one command
#[derive(Parser, Debug)]
#[command(
    name = "run-tests",
    about = "Run the external test runner with report directories and default flags prepared",
    after_help = "ENVIRONMENT VARIABLES:\n\
        QUIET                     Add quiet/short-traceback flags (true/false)\n\
        PARALLEL                  Request automatic parallel workers (true/false)\n\
        SAVE_HISTORICAL_REPORTS   Archive reports under a timestamped dir (true/false)\n\
        HEADLESS                  Run browsers headless (true/false)\n\
        LOG_CLI                   Emit logs to the console (true/false)\n\
        LOG_LEVEL                 DEBUG, INFO, WARNING, ERROR or CRITICAL\n\
        REPORTS_DIR               Base directory for report output"
)]
struct Args {
    /// Test-runner program to invoke
    #[arg(long, env = "TEST_RUNNER", default_value = DEFAULT_RUNNER_PROGRAM)]
    runner: String,

    /// Tokens forwarded to the test runner (after `--`)
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() {
    let args = Args::parse();
    let config = config::get();
    let run = report::current();

    match execute(&args, config, run) {
        Ok(code) => exit(code),
        Err(err) => {
            eprintln!("run-tests failed: {err}");
            exit(2);
        }
    }
}

/// Prepare directories, build the command, run it, archive the report.
///
/// Returns the runner's exit code; archiving never changes it.
fn execute(args: &Args, config: &Config, run: &ReportRun) -> Result<i32> {
    run.prepare()?;
    logging::init(config, Some(run))?;

    let mut command = RunCommand::new(args.args.clone());
    command.apply(config, run);
    println!(
        "Running test command: {} {}",
        args.runner,
        command.tokens().join(" ")
    );

    let status = command.spawn(&args.runner, config, run)?;
    run.archive_report();

    // A killed-by-signal runner has no code; treat it as a plain failure.
    Ok(status.code().unwrap_or(1))
}
