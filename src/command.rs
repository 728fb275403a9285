use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// One invocation of an external network-configuration tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl PlannedCommand {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for PlannedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit information of a finished tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Process boundary for every external tool the hook calls.
///
/// An `Err` means the tool could not be spawned at all; a tool that ran and
/// failed is reported through [`CommandOutput::success`].
pub trait CommandRunner {
    fn run(&self, command: &PlannedCommand) -> io::Result<CommandOutput>;
}

/// Runs tools as child processes and blocks until they exit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &PlannedCommand) -> io::Result<CommandOutput> {
        Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .output()
            .map(CommandOutput::from)
    }
}
