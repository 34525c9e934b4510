//! External tool invocation.
//!
//! Generators, compilers, and registration tools are opaque programs whose
//! only contract is their exit status. Every spawn in the workspace goes
//! through [`ToolRunner`] so that pipelines can be exercised with a spy
//! ([`RecordingRunner`]) instead of real toolchains.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ProcessError;

/// How often a child with a deadline is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A fully-resolved command line for one external tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Program to execute (bare name resolved via `PATH`, or a path).
    pub program: PathBuf,
    /// Arguments, passed verbatim (no shell).
    pub args: Vec<String>,
    /// Working directory, if different from the caller's.
    pub current_dir: Option<PathBuf>,
    /// Extra environment variables.
    pub env: Vec<(String, String)>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Name of the program without its directory, for log banners.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.display().to_string()))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        format!("\"{s}\"")
    } else {
        s.to_string()
    }
}

/// Exit status of a finished tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    /// Exit code, or `None` if the tool was terminated by a signal.
    pub code: Option<i32>,
}

impl ToolStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ToolStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Runs external tools to completion.
///
/// Implementations block until the tool exits. A non-zero exit is *not* an
/// error at this layer; callers decide what a failed status means for the
/// artifact they were producing.
pub trait ToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolStatus, ProcessError>;
}

/// Spawns real processes, inheriting stdout/stderr.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// A runner that waits indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner that kills tools still running after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolStatus, ProcessError> {
        log::debug!("exec: {invocation}");

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }
        for (key, value) in &invocation.env {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        let status = match self.timeout {
            None => child.wait().map_err(|source| ProcessError::Wait {
                program: invocation.program.clone(),
                source,
            })?,
            Some(limit) => wait_with_deadline(&mut child, limit, &invocation.program)?,
        };

        Ok(status.into())
    }
}

fn wait_with_deadline(
    child: &mut Child,
    limit: Duration,
    program: &Path,
) -> Result<ExitStatus, ProcessError> {
    let started = Instant::now();
    loop {
        let polled = child.try_wait().map_err(|source| ProcessError::Wait {
            program: program.to_path_buf(),
            source,
        })?;
        if let Some(status) = polled {
            return Ok(status);
        }
        if started.elapsed() >= limit {
            if let Err(e) = child.kill() {
                log::warn!("failed to kill {}: {e}", program.display());
            }
            let _ = child.wait();
            return Err(ProcessError::TimedOut {
                program: program.to_path_buf(),
                after: limit,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

type Handler = Box<dyn Fn(&ToolInvocation) -> i32>;

/// A spy runner that records every invocation instead of spawning.
///
/// The handler decides each call's exit code and may simulate the tool's
/// side effects (e.g. writing generated sources into a staging directory).
pub struct RecordingRunner {
    calls: RefCell<Vec<ToolInvocation>>,
    handler: Handler,
}

impl RecordingRunner {
    /// Every invocation exits 0 without side effects.
    pub fn succeeding() -> Self {
        Self::with_handler(|_| 0)
    }

    /// Every invocation exits with `code`.
    pub fn failing(code: i32) -> Self {
        Self::with_handler(move |_| code)
    }

    pub fn with_handler(handler: impl Fn(&ToolInvocation) -> i32 + 'static) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            handler: Box::new(handler),
        }
    }

    /// Invocations seen so far, in order.
    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl fmt::Debug for RecordingRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingRunner")
            .field("calls", &self.calls.borrow().len())
            .finish()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolStatus, ProcessError> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok(ToolStatus::from_code((self.handler)(invocation)))
    }
}
