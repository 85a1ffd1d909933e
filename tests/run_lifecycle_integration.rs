//! Integration tests for the run command builder and report lifecycle.

use std::fs;

use tempfile::tempdir;
use web_harness::config::Config;
use web_harness::report::{REPORT_FILENAME, ReportRun};
use web_harness::runner::RunCommand;

#[test]
fn test_quiet_run_produces_expected_command_and_layout() {
    let base = tempdir().unwrap();
    let mut config = Config::defaults();
    config.run.quiet = true;
    config.run.save_historical_reports = true;

    let run = ReportRun::with_timestamp(base.path(), "2026-01-01_12-00-00", true);
    run.prepare().unwrap();
    assert!(run.latest_screenshot_dir.exists());
    assert!(run.timestamped_screenshot_dir.as_ref().unwrap().exists());

    let mut command = RunCommand::new(vec![]);
    command.apply(&config, &run);
    let tokens = command.tokens();

    assert!(tokens.contains(&"-q".to_string()));
    assert!(tokens.contains(&"--tb=short".to_string()));
    assert!(tokens.contains(&"-rF".to_string()));
    assert!(
        tokens
            .iter()
            .any(|t| t.starts_with("--html=") && t.ends_with(REPORT_FILENAME))
    );

    // Simulate the runner rendering its report, then archive it.
    fs::write(run.report_file(), "<html>ok</html>").unwrap();
    run.archive_report();
    let archived = run.timestamped_dir.as_ref().unwrap().join(REPORT_FILENAME);
    assert_eq!(fs::read_to_string(archived).unwrap(), "<html>ok</html>");
}

#[test]
fn test_rebuilding_from_own_output_is_stable() {
    let base = tempdir().unwrap();
    let config = Config::defaults();
    let run = ReportRun::with_timestamp(base.path(), "2026-01-01_12-00-01", false);

    let mut command = RunCommand::new(vec!["-m".to_string(), "smoke".to_string()]);
    command.apply(&config, &run);
    let first = command.tokens().to_vec();

    let mut rebuilt = RunCommand::new(first.clone());
    rebuilt.apply(&config, &run);
    assert_eq!(rebuilt.tokens(), first.as_slice());
}

#[cfg(unix)]
#[test]
fn test_spawn_mirrors_runner_exit_code() {
    let base = tempdir().unwrap();
    let config = Config::defaults();
    let run = ReportRun::with_timestamp(base.path(), "2026-01-01_12-00-02", false);
    run.prepare().unwrap();

    let command = RunCommand::new(vec!["-c".to_string(), "exit 7".to_string()]);
    let status = command.spawn("sh", &config, &run).unwrap();
    assert_eq!(status.code(), Some(7));
}

#[cfg(unix)]
#[test]
fn test_spawn_exports_report_environment() {
    let base = tempdir().unwrap();
    let config = Config::defaults();
    let run = ReportRun::with_timestamp(base.path(), "2026-01-01_12-00-03", true);
    run.prepare().unwrap();

    let script = concat!(
        "test \"$RUN_TIMESTAMP\" = \"2026-01-01_12-00-03\"",
        " && test -n \"$LATEST_REPORT_DIR\"",
        " && test -n \"$TIMESTAMPED_REPORT_DIR\"",
        " && test \"$SKIP_SECRETS\" = \"true\"",
    );
    let command = RunCommand::new(vec!["-c".to_string(), script.to_string()]);
    let status = command.spawn("sh", &config, &run).unwrap();
    assert!(status.success(), "runner did not see the exported environment");
}
