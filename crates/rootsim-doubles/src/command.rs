use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use rootsim_core::{SimError, SimResult};
use serde::Serialize;
use tracing::debug;

/// Runs an external program. Orchestrators take this instead of spawning processes directly.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> SimResult<CommandOutput>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CommandCall {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandCall {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    fn matches(&self, program: &str, args: &[&str]) -> bool {
        self.program == program
            && self.args.len() == args.len()
            && self.args.iter().zip(args).all(|(left, right)| left == right)
    }
}

#[derive(Debug, Default)]
struct CommandDoubleState {
    calls: Vec<CommandCall>,
    responses: HashMap<CommandCall, CommandOutput>,
    errors: HashMap<CommandCall, String>,
}

/// Records every invocation and answers from pre-programmed responses.
///
/// Lookup order per call: forced error, canned response, then an empty success.
#[derive(Debug, Default)]
pub struct CommandDouble {
    state: Mutex<CommandDoubleState>,
}

impl CommandDouble {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, program: &str, args: &[&str], output: CommandOutput) {
        self.lock()
            .responses
            .insert(CommandCall::new(program, args), output);
    }

    pub fn fail(&self, program: &str, args: &[&str], message: impl Into<String>) {
        self.lock()
            .errors
            .insert(CommandCall::new(program, args), message.into());
    }

    /// Every invocation so far, in arrival order.
    pub fn calls(&self) -> Vec<CommandCall> {
        self.lock().calls.clone()
    }

    pub fn was_called(&self, program: &str, args: &[&str]) -> bool {
        self.lock()
            .calls
            .iter()
            .any(|call| call.matches(program, args))
    }

    pub fn call_count(&self, program: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.program == program)
            .count()
    }

    /// Drops recorded calls and every registered response.
    pub fn reset(&self) {
        *self.lock() = CommandDoubleState::default();
    }

    fn lock(&self) -> MutexGuard<'_, CommandDoubleState> {
        // A panic while holding the lock only happens inside a failing test.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CommandRunner for CommandDouble {
    fn run(&self, program: &str, args: &[&str]) -> SimResult<CommandOutput> {
        let call = CommandCall::new(program, args);
        let mut state = self.lock();
        state.calls.push(call.clone());
        debug!(program, ?args, "recorded command");

        if let Some(message) = state.errors.get(&call) {
            return Err(SimError::Injected {
                package: program.to_string(),
                message: message.clone(),
            });
        }
        Ok(state.responses.get(&call).cloned().unwrap_or_default())
    }
}
