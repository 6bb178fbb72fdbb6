//! Local process execution.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{IacError, IacResult};

/// How the child process is wired to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// stdout/stderr go to the operator, stdin is closed.
    Inherit,
    /// stdin, stdout and stderr all go to the operator.
    Interactive,
    /// Output is discarded.
    Silent,
}

/// Description of a process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub stdio: StdioMode,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            stdio: StdioMode::Inherit,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn stdio(mut self, mode: StdioMode) -> Self {
        self.stdio = mode;
        self
    }

    /// Human readable command line, used in logs and errors.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs processes and reports their exit code.
pub trait CommandRunner: Send + Sync {
    /// Run the process to completion and return its exit code.
    ///
    /// A process killed by a signal reports `-1`.
    fn run(&self, spec: &ProcessSpec) -> IacResult<i32>;
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &ProcessSpec) -> IacResult<i32> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        if let Some(dir) = &spec.working_dir {
            cmd.current_dir(dir);
        }

        match spec.stdio {
            StdioMode::Inherit => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            StdioMode::Interactive => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            StdioMode::Silent => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
            }
        }

        debug!("Executing {} in {:?}", spec.command_line(), spec.working_dir);

        let status = cmd.status().map_err(|source| IacError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        Ok(status.code().unwrap_or(-1))
    }
}
