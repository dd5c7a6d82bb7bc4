//! # Command Execution Module / 命令执行模块
//!
//! External processes (the compiler and the built artifacts) are reached
//! only through the [`ProcessRunner`] capability, so the matrix runner can be
//! driven by a fake in tests. [`SystemRunner`] is the real implementation on
//! top of `tokio::process`.

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// What the runner learns about a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessStatus {
    /// Exit code, or `None` if the process was killed by a signal or timed out.
    pub code: Option<i32>,
    /// Combined stdout and stderr.
    pub output: String,
    pub timed_out: bool,
}

impl ProcessStatus {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Launches an external process and waits for it to finish.
///
/// An `Err` means the process could not be started at all.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> impl Future<Output = std::io::Result<ProcessStatus>>;
}

/// Runs processes for real, with an optional wall-clock limit.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ProcessRunner for SystemRunner {
    /// Runs the program with stdin closed and both output streams captured.
    /// stdout comes first in [`ProcessStatus::output`], then stderr.
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessStatus> {
        let mut cmd = tokio::process::Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let finished = match self.timeout {
            // Dropping the output future drops the child, which kills it.
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(finished) => finished?,
                Err(_) => return Ok(ProcessStatus::timed_out()),
            },
            None => cmd.output().await?,
        };

        let mut output = String::from_utf8_lossy(&finished.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&finished.stderr));
        Ok(ProcessStatus {
            code: finished.status.code(),
            output,
            timed_out: false,
        })
    }
}
