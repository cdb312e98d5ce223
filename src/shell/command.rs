//! External process execution.
//!
//! Probes capture output, installers inherit the terminal. Both go through
//! [`ProcessRunner`] so callers can be tested against [`super::ScriptedRunner`].

use crate::error::{Result, SetupError};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Stdout followed by stderr.
    ///
    /// `java -version` writes to stderr only, so its first line is the
    /// first line of this string.
    pub fn combined_output(&self) -> String {
        let mut combined = self.stdout.clone();
        if !combined.is_empty() && !self.stderr.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }
}

/// Runs external programs given as argv vectors.
pub trait ProcessRunner {
    /// Run to completion with stdout and stderr captured.
    fn capture(&self, argv: &[String]) -> Result<CommandResult>;

    /// Run to completion with stdio inherited from this process.
    fn status(&self, argv: &[String]) -> Result<CommandResult>;
}

/// [`ProcessRunner`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(argv: &[String]) -> Result<Command> {
        let (program, args) = argv.split_first().ok_or_else(|| SetupError::CommandFailed {
            command: String::new(),
            code: None,
        })?;
        let mut cmd = Command::new(program);
        cmd.args(args);
        Ok(cmd)
    }

    fn finish(output: Output, duration: Duration) -> CommandResult {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if output.status.success() {
            CommandResult::success(stdout, stderr, duration)
        } else {
            CommandResult::failure(output.status.code(), stdout, stderr, duration)
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn capture(&self, argv: &[String]) -> Result<CommandResult> {
        let start = Instant::now();
        let output = Self::command(argv)?
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|_| SetupError::CommandFailed {
                command: display_command(argv),
                code: None,
            })?;
        Ok(Self::finish(output, start.elapsed()))
    }

    fn status(&self, argv: &[String]) -> Result<CommandResult> {
        let start = Instant::now();
        tracing::debug!("Running: {}", display_command(argv));
        let status = Self::command(argv)?
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|_| SetupError::CommandFailed {
                command: display_command(argv),
                code: None,
            })?;
        let duration = start.elapsed();
        if status.success() {
            Ok(CommandResult::success(String::new(), String::new(), duration))
        } else {
            Ok(CommandResult::failure(
                status.code(),
                String::new(),
                String::new(),
                duration,
            ))
        }
    }
}

/// Render an argv vector for log and error messages, quoting arguments with spaces.
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.contains(' ') {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn combined_output_puts_stdout_first() {
        let result = CommandResult::success(
            "out".to_string(),
            "err line\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.combined_output(), "out\nerr line\n");
    }

    #[test]
    fn combined_output_with_only_stderr() {
        let result = CommandResult::failure(
            Some(1),
            String::new(),
            "openjdk version \"21.0.3\"\n".to_string(),
            Duration::ZERO,
        );
        assert!(result.combined_output().starts_with("openjdk version"));
        assert!(!result.success);
    }

    #[test]
    fn display_command_quotes_spaces() {
        let rendered = display_command(&argv(&[
            "msiexec",
            "/i",
            "C:\\Users\\Jo Doe\\jdk.msi",
        ]));
        assert_eq!(rendered, "msiexec /i \"C:\\Users\\Jo Doe\\jdk.msi\"");
    }

    #[test]
    fn empty_argv_is_an_error() {
        let runner = SystemRunner;
        assert!(matches!(
            runner.capture(&[]),
            Err(SetupError::CommandFailed { .. })
        ));
    }

    #[test]
    fn missing_program_is_an_error() {
        let runner = SystemRunner;
        let result = runner.capture(&argv(&["definitely-not-a-real-program-4821"]));
        assert!(matches!(result, Err(SetupError::CommandFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn capture_collects_stdout_and_stderr() {
        let runner = SystemRunner;
        let result = runner
            .capture(&argv(&["sh", "-c", "echo hello; echo oops >&2"]))
            .unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
        assert!(result.stderr.contains("oops"));
    }

    #[cfg(unix)]
    #[test]
    fn capture_reports_exit_code() {
        let runner = SystemRunner;
        let result = runner.capture(&argv(&["sh", "-c", "exit 3"])).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn status_reports_exit_code() {
        let runner = SystemRunner;
        assert!(runner.status(&argv(&["true"])).unwrap().success);
        let failed = runner.status(&argv(&["false"])).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.exit_code, Some(1));
    }
}
