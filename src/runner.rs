//! Test-runner command construction and execution.
//!
//! [`RunCommand`] takes the tokens a user forwarded for the external test
//! runner and applies a fixed sequence of idempotent rewrite rules: ensure a
//! failure-summary flag, quiet flags, a skip-excluding marker expression, a
//! parallelism flag, an HTML report flag, and display flags. Unrecognized
//! tokens pass through unchanged, and a flag is never separated from its
//! argument span.
//!
//! The rule order is load-bearing: the marker rewrite collects every
//! non-flag token after `-m` as the expression, so flags inserted by earlier
//! rules must never land inside that span.

use std::process::{Command, ExitStatus};

use tracing::warn;

use crate::config::Config;
use crate::error::Result;
use crate::report::ReportRun;

/// Summary characters the `-r` flag must include (F = failed summary lines)
pub const REQUIRED_SUMMARY_FLAGS: &str = "F";

/// Default external test-runner program
pub const DEFAULT_RUNNER_PROGRAM: &str = "pytest";

/// An ordered test-runner argument list under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    tokens: Vec<String>,
}

impl RunCommand {
    /// Wrap user-supplied runner tokens.
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// The current token list.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Consume the builder and return the token list.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    /// Apply every rewrite rule, in order.
    pub fn apply(&mut self, config: &Config, report: &ReportRun) -> &mut Self {
        self.ensure_summary_flags(REQUIRED_SUMMARY_FLAGS);
        if config.run.quiet {
            self.ensure_quiet();
        }
        self.rewrite_marker_expression();
        if config.run.parallel {
            self.ensure_parallelism();
        }
        self.ensure_html_report(report);
        self.ensure_display_flags();
        self
    }

    /// Ensure the `-r` summary flag is present and includes `required`.
    ///
    /// An existing `-r` token keeps its characters and gains the missing
    /// ones. Insertion goes at the front of the list, which can never land
    /// inside a marker expression's argument span.
    fn ensure_summary_flags(&mut self, required: &str) {
        for token in self.tokens.iter_mut() {
            if let Some(existing) = token.strip_prefix("-r") {
                let missing: String = required
                    .chars()
                    .filter(|c| !existing.contains(*c))
                    .collect();
                if !missing.is_empty() {
                    token.push_str(&missing);
                }
                return;
            }
        }
        self.tokens.insert(0, format!("-r{required}"));
    }

    /// Ensure quiet output flags, then re-check the summary flag.
    fn ensure_quiet(&mut self) {
        if !self.tokens.iter().any(|t| t == "-q" || t == "--quiet") {
            self.tokens.insert(0, "-q".to_string());
        }
        if !self.tokens.iter().any(|t| t.starts_with("--tb")) {
            self.tokens.insert(0, "--tb=short".to_string());
        }
        // Quiet modes suppress per-test output, so the failure summary must
        // still be guaranteed after the insertions above.
        self.ensure_summary_flags(REQUIRED_SUMMARY_FLAGS);
    }

    /// Rewrite the marker expression so skip-marked tests are always excluded.
    ///
    /// The user's `-m` flag and its argument span (every following token up
    /// to the next `-`-leading token) are replaced in place by a single `-m`
    /// whose expression is `not skip`, combined with the user's original
    /// expression when one was given. An expression that already leads with
    /// the exclusion is kept as is, and a missing flag appends the pair at
    /// the end. Re-insertion at the flag's original position keeps the token
    /// ordering stable across repeated applications.
    fn rewrite_marker_expression(&mut self) {
        let (index, expression) = match self
            .tokens
            .iter()
            .position(|t| t.starts_with("-m") && !t.starts_with("--"))
        {
            Some(index) => {
                let mut end = index + 1;
                while end < self.tokens.len() && !self.tokens[end].starts_with('-') {
                    end += 1;
                }
                // Inline form: -mexpr or -m=expr
                let mut expr = self.tokens[index][2..].trim_start_matches('=').to_string();
                for token in &self.tokens[index + 1..end] {
                    if !expr.is_empty() {
                        expr.push(' ');
                    }
                    expr.push_str(token);
                }
                self.tokens.drain(index..end);
                let expr = expr.trim().to_string();
                (index, (!expr.is_empty()).then_some(expr))
            }
            None => (self.tokens.len(), None),
        };

        let marker = match expression {
            Some(expr) if expr == "not skip" || expr.starts_with("not skip and (") => expr,
            Some(expr) => format!("not skip and ({expr})"),
            None => "not skip".to_string(),
        };
        self.tokens.insert(index, marker);
        self.tokens.insert(index, "-m".to_string());
    }

    /// Ensure a parallelism flag requesting automatic worker selection.
    fn ensure_parallelism(&mut self) {
        let present = self
            .tokens
            .iter()
            .any(|t| t.starts_with("-n") || t.starts_with("--numprocesses"));
        if !present {
            self.tokens.insert(0, "auto".to_string());
            self.tokens.insert(0, "-n".to_string());
        }
        warn!("parallel execution may interleave or suppress console log output");
    }

    /// Ensure the HTML report flags, pointed at the run's latest report path.
    fn ensure_html_report(&mut self, report: &ReportRun) {
        if !self.tokens.iter().any(|t| t.starts_with("--html")) {
            self.tokens
                .push(format!("--html={}", report.report_file().display()));
        }
        if !self.tokens.iter().any(|t| t == "--self-contained-html") {
            self.tokens.push("--self-contained-html".to_string());
        }
    }

    /// Ensure warnings are suppressed and captured output is shown.
    fn ensure_display_flags(&mut self) {
        if !self.tokens.iter().any(|t| t == "--disable-warnings") {
            self.tokens.push("--disable-warnings".to_string());
        }
        if !self.tokens.iter().any(|t| t == "-s") {
            self.tokens.push("-s".to_string());
        }
    }

    /// Spawn the external test runner and wait for it to finish.
    ///
    /// The report directory variables are exported into the child's
    /// environment so the runner and its plugins agree on the layout. The
    /// returned status is the runner's own exit status, which the caller
    /// should mirror as the process exit code.
    pub fn spawn(&self, program: &str, config: &Config, report: &ReportRun) -> Result<ExitStatus> {
        let status = Command::new(program)
            .args(self.tokens())
            .envs(report.env_vars())
            .envs(config.child_env())
            .status()?;
        Ok(status)
    }
}
