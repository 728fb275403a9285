use crate::command::{CommandRunner, PlannedCommand};
use crate::logging::LogContext;
use tracing::{debug, error};

/// Result of one executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: PlannedCommand,
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    /// Spawn error or captured stderr of a failed command
    pub error: Option<String>,
}

/// Outcomes of a whole plan, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub outcomes: Vec<CommandOutcome>,
}

impl ExecutionReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CommandOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }
}

/// Runs planned commands one after another.
///
/// A failed command is logged and recorded; it never stops the rest of the plan.
pub struct Executor<'a, R: CommandRunner> {
    runner: &'a R,
    log: &'a LogContext,
}

impl<'a, R: CommandRunner> Executor<'a, R> {
    pub fn new(runner: &'a R, log: &'a LogContext) -> Self {
        Self { runner, log }
    }

    pub fn execute(&self, commands: Vec<PlannedCommand>, log_prefix: &str) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        for command in commands {
            let outcome = match self.runner.run(&command) {
                Ok(output) if output.success => {
                    debug!("{}{}", log_prefix, command);
                    CommandOutcome {
                        command,
                        succeeded: true,
                        exit_code: output.exit_code,
                        error: None,
                    }
                }
                Ok(output) => {
                    let stderr = output.stderr_text();
                    error!(
                        hook = self.log.ident(),
                        exit_code = ?output.exit_code,
                        stderr = %stderr,
                        "{}{} -> ERROR",
                        log_prefix,
                        command
                    );
                    CommandOutcome {
                        command,
                        succeeded: false,
                        exit_code: output.exit_code,
                        error: (!stderr.is_empty()).then_some(stderr),
                    }
                }
                Err(e) => {
                    error!(
                        hook = self.log.ident(),
                        error = %e,
                        "{}{} -> ERROR",
                        log_prefix,
                        command
                    );
                    CommandOutcome {
                        command,
                        succeeded: false,
                        exit_code: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        report
    }
}
