//! Running the external transform and reader tools.
//!
//! Commands are always argument vectors handed straight to the OS; nothing is ever
//! interpolated into a shell string. A non-zero exit is a normal [`ProcessResult`],
//! only a failure to start the program is an error.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::diagnostics::{HarnessError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Exit code reported when the child was terminated by a signal or killed on timeout.
pub const SIGNALED_EXIT_CODE: i32 = -1;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Captured output of one finished (or killed) invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub timed_out: bool,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }
}

/// Something that can execute a [`CommandLine`] to completion.
pub trait ProcessRunner {
    fn run(&self, command: &CommandLine) -> Result<ProcessResult>;
}

/// Runs commands as real child processes, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> Result<ProcessResult> {
        debug!(command = %command, "spawning");
        let deadline = Instant::now() + self.timeout;
        let mut child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                program: command.program().display().to_string(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let program = command.program().display().to_string();
        let (exit_code, exited) = wait_until(&mut child, deadline)
            .map_err(|source| HarnessError::Spawn { program, source })?;

        // A background grandchild can keep the pipes open after the child itself exits.
        let output = if exited {
            collect(&stdout, deadline).zip(collect(&stderr, deadline))
        } else {
            None
        };

        match output {
            Some((stdout, stderr)) => Ok(ProcessResult {
                stdout,
                stderr,
                exit_code,
                timed_out: false,
            }),
            None => {
                warn!(command = %command, timeout_secs = self.timeout.as_secs(), "process timed out");
                Ok(ProcessResult {
                    stdout: String::new(),
                    stderr: String::new(),
                    exit_code: if exited { exit_code } else { SIGNALED_EXIT_CODE },
                    timed_out: true,
                })
            }
        }
    }
}

fn drain<R>(pipe: Option<R>) -> Receiver<Vec<u8>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
    }
    rx
}

/// Waits for a drained pipe until `deadline`. `None` means the pipe was still open.
fn collect(pipe: &Receiver<Vec<u8>>, deadline: Instant) -> Option<String> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match pipe.recv_timeout(remaining) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

/// The parts of a child process the wait loop touches.
trait Reap {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>>;
    fn kill(&mut self) -> io::Result<()>;
    fn wait(&mut self) -> io::Result<ExitStatus>;
}

impl Reap for Child {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        Child::try_wait(self)
    }

    fn kill(&mut self) -> io::Result<()> {
        Child::kill(self)
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        Child::wait(self)
    }
}

/// Polls until the child exits or `deadline` passes. Returns the exit code and whether
/// the child exited on its own. The child is always reaped, on error paths too.
fn wait_until<C: Reap>(child: &mut C, deadline: Instant) -> io::Result<(i32, bool)> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code().unwrap_or(SIGNALED_EXIT_CODE), true)),
            Ok(None) => {}
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let status = child.wait()?;
            return Ok((status.code().unwrap_or(SIGNALED_EXIT_CODE), false));
        }
        thread::sleep(POLL_INTERVAL);
    }
}
