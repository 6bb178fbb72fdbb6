//! Recording command runner for testing.
//!
//! Captures every process the migration would start and answers with scripted
//! exit codes, so Terraform sequences can be verified without the binary.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::IacResult;
use crate::process::{CommandRunner, ProcessSpec, StdioMode};

/// Side effect executed for each captured call.
pub type CallHook = Arc<dyn Fn(&ProcessSpec) + Send + Sync>;

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub stdio: StdioMode,
}

impl CapturedCall {
    /// Arguments joined with spaces, e.g. `apply -auto-approve`.
    pub fn args_line(&self) -> String {
        self.args.join(" ")
    }
}

/// Command runner that records calls instead of spawning processes.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    /// Exit codes returned in order; once drained every call succeeds.
    exit_codes: Arc<RwLock<VecDeque<i32>>>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    hook: Option<CallHook>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an exit code for the next unanswered call.
    pub fn add_exit_code(self, code: i32) -> Self {
        self.exit_codes.write().push_back(code);
        self
    }

    /// Fail the call at `index` (zero based) with `code`; earlier calls succeed.
    pub fn fail_at(self, index: usize, code: i32) -> Self {
        {
            let mut codes = self.exit_codes.write();
            while codes.len() < index {
                codes.push_back(0);
            }
            codes.push_back(code);
        }
        self
    }

    /// Run `hook` for every call, before the exit code is returned.
    pub fn with_hook(mut self, hook: impl Fn(&ProcessSpec) + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// All calls captured so far.
    pub fn calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &ProcessSpec) -> IacResult<i32> {
        self.captured_calls.write().push(CapturedCall {
            program: spec.program.clone(),
            args: spec.args.clone(),
            working_dir: spec.working_dir.clone(),
            stdio: spec.stdio,
        });

        if let Some(hook) = &self.hook {
            hook(spec);
        }

        Ok(self.exit_codes.write().pop_front().unwrap_or(0))
    }
}
