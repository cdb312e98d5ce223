//! Scripted process runner for testing.
//!
//! `ScriptedRunner` implements [`ProcessRunner`] without spawning anything.
//! Responses are keyed by the program (`argv[0]`); programs without a
//! response behave as if they were not installed.
//!
//! # Example
//!
//! ```
//! use modpack_setup::shell::{ProcessRunner, ScriptedRunner};
//!
//! let mut runner = ScriptedRunner::new();
//! runner.respond("/opt/jdk/bin/java", 0, "openjdk version \"21.0.3\" 2024-04-16\n");
//!
//! let argv = vec!["/opt/jdk/bin/java".to_string(), "-version".to_string()];
//! let result = runner.capture(&argv).unwrap();
//! assert!(result.combined_output().contains("21.0.3"));
//! assert_eq!(runner.calls_to("/opt/jdk/bin/java"), 1);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::error::{Result, SetupError};

use super::command::{display_command, CommandResult, ProcessRunner};

#[derive(Debug, Clone)]
struct Scripted {
    exit_code: i32,
    output: String,
}

/// Fake [`ProcessRunner`] with canned responses per program.
///
/// Supports a fixed response (via `respond`) and queued responses
/// (via `queue`) for programs called several times.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, Scripted>,
    queues: RefCell<HashMap<String, VecDeque<Scripted>>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    /// Create a runner that knows no programs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `program` with `exit_code` and `output` on stderr.
    pub fn respond(&mut self, program: impl Into<String>, exit_code: i32, output: &str) {
        self.responses.insert(
            program.into(),
            Scripted {
                exit_code,
                output: output.to_string(),
            },
        );
    }

    /// Queue a one-shot response, consumed before any fixed response.
    pub fn queue(&mut self, program: impl Into<String>, exit_code: i32, output: &str) {
        self.queues
            .get_mut()
            .entry(program.into())
            .or_default()
            .push_back(Scripted {
                exit_code,
                output: output.to_string(),
            });
    }

    /// Every argv this runner was asked to run, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Number of calls whose `argv[0]` is `program`.
    pub fn calls_to(&self, program: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|argv| argv.first().map(String::as_str) == Some(program))
            .count()
    }

    fn answer(&self, argv: &[String]) -> Result<CommandResult> {
        self.calls.borrow_mut().push(argv.to_vec());

        let program = argv.first().cloned().unwrap_or_default();
        let queued = self
            .queues
            .borrow_mut()
            .get_mut(&program)
            .and_then(|queue| queue.pop_front());

        let Some(scripted) = queued.or_else(|| self.responses.get(&program).cloned()) else {
            return Err(SetupError::CommandFailed {
                command: display_command(argv),
                code: None,
            });
        };

        if scripted.exit_code == 0 {
            Ok(CommandResult::success(
                String::new(),
                scripted.output,
                Duration::ZERO,
            ))
        } else {
            Ok(CommandResult::failure(
                Some(scripted.exit_code),
                String::new(),
                scripted.output,
                Duration::ZERO,
            ))
        }
    }
}

impl ProcessRunner for ScriptedRunner {
    fn capture(&self, argv: &[String]) -> Result<CommandResult> {
        self.answer(argv)
    }

    fn status(&self, argv: &[String]) -> Result<CommandResult> {
        self.answer(argv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_program_fails_to_spawn() {
        let runner = ScriptedRunner::new();
        assert!(runner.capture(&argv(&["java", "-version"])).is_err());
        assert_eq!(runner.calls_to("java"), 1);
    }

    #[test]
    fn fixed_response_repeats() {
        let mut runner = ScriptedRunner::new();
        runner.respond("msiexec", 1603, "");
        for _ in 0..2 {
            let result = runner.status(&argv(&["msiexec", "/i", "jdk.msi"])).unwrap();
            assert_eq!(result.exit_code, Some(1603));
        }
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn queued_responses_come_first() {
        let mut runner = ScriptedRunner::new();
        runner.queue("java", 1, "");
        runner.respond("java", 0, "ok");
        assert!(!runner.capture(&argv(&["java"])).unwrap().success);
        assert!(runner.capture(&argv(&["java"])).unwrap().success);
        assert!(runner.capture(&argv(&["java"])).unwrap().success);
    }
}
