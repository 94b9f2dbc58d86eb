//! Hook runner invocation
//!
//! Launches the runner as a child process in its own process group, captures
//! stdout and stderr into one line stream, and races the child against the
//! configured budget. Once the runner has exited or the budget has expired,
//! the whole group is killed, so hooks spawned by the runner cannot outlive
//! the call.

use crate::config::RunnerConfig;
use crate::error::PipelineError;
use crate::git::RepoContext;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// How long to wait for a killed child to be reaped
const KILL_GRACE: Duration = Duration::from_secs(2);

/// How long to keep reading pipes after the child exited
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Everything observed from one runner process
#[derive(Debug, Clone, PartialEq)]
pub struct RawRunResult {
    /// Exit code; absent when the process was killed
    pub exit_code: Option<i32>,

    /// stdout and stderr lines, in the order they were read
    pub combined_output: String,

    /// The budget expired and the process group was killed
    pub timed_out: bool,

    /// Wall time from launch until output was drained
    pub elapsed: Duration,
}

/// Launches the hook runner with a bounded execution budget
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessInvoker {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(&config.executable, config.args.clone(), config.timeout())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the hook runner once inside `context`
    ///
    /// A non-zero exit or an expired budget is a normal result. Only a process
    /// that cannot be started at all is an error.
    pub async fn invoke(&self, context: &RepoContext) -> Result<RawRunResult, PipelineError> {
        let started = Instant::now();
        let mut child = self.spawn(context)?;

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut stdout_task = tokio::spawn(forward_lines(child.stdout.take(), tx.clone()));
        let mut stderr_task = tokio::spawn(forward_lines(child.stderr.take(), tx));
        let collector = tokio::spawn(async move {
            let mut lines = Vec::new();
            while let Some(line) = rx.recv().await {
                lines.push(line);
            }
            lines
        });

        // Captured before the wait: a reaped child no longer reports its id
        let group = child.id();

        let (exit_code, timed_out) = match tokio::time::timeout(self.timeout, child.wait()).await
        {
            Ok(Ok(status)) => (status.code(), false),
            Ok(Err(e)) => {
                kill_group(group);
                return Err(e.into());
            }
            Err(_) => {
                warn!(
                    "Hook runner exceeded {}s, killing its process group",
                    self.timeout.as_secs_f64()
                );
                terminate(&mut child, group).await;
                (None, true)
            }
        };

        // Hooks may have left background processes behind; none outlive the call
        kill_group(group);

        let drain = async {
            let _ = (&mut stdout_task).await;
            let _ = (&mut stderr_task).await;
        };
        if tokio::time::timeout(OUTPUT_DRAIN_GRACE, drain).await.is_err() {
            debug!("Output pipes still open after exit, abandoning them");
            stdout_task.abort();
            stderr_task.abort();
        }

        let lines = collector.await.unwrap_or_default();
        let elapsed = started.elapsed();

        debug!(
            "Hook runner finished: exit_code={:?} timed_out={} lines={} elapsed={:.3}s",
            exit_code,
            timed_out,
            lines.len(),
            elapsed.as_secs_f64()
        );

        Ok(RawRunResult {
            exit_code,
            combined_output: lines.join("\n"),
            timed_out,
            elapsed,
        })
    }

    fn spawn(&self, context: &RepoContext) -> Result<Child, PipelineError> {
        let mut std_cmd = std::process::Command::new(&self.program);
        std_cmd
            .args(&self.args)
            .current_dir(context.workdir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt as _;
            std_cmd.process_group(0);
        }

        let mut cmd = Command::from(std_cmd);
        cmd.kill_on_drop(true);

        debug!(
            "Launching {} {:?} in {}",
            self.program,
            self.args,
            context.workdir().display()
        );

        cmd.spawn().map_err(|source| PipelineError::LaunchFailure {
            program: self.program.clone(),
            source,
        })
    }
}

/// Kill the child and every process in its group, then reap it
async fn terminate(child: &mut Child, group: Option<u32>) {
    kill_group(group);

    if let Err(e) = child.start_kill() {
        debug!("start_kill after timeout: {}", e);
    }
    let _ = tokio::time::timeout(KILL_GRACE, child.wait()).await;
}

/// SIGKILL every process in the runner's group
///
/// The runner leads its own group (`process_group(0)`), so the group id is its
/// pid. Once every member is gone the call fails with ESRCH, which is fine.
fn kill_group(group: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pgid) = group {
            // SAFETY: plain syscall on a group id we created
            let rc = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
            if rc != 0 {
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() != Some(libc::ESRCH) {
                    debug!("killpg({}) failed: {}", pgid, err);
                }
            }
        }
    }

    #[cfg(not(unix))]
    let _ = group;
}

/// Forward every line of `reader` into `tx`, decoding lossily
async fn forward_lines<R>(reader: Option<R>, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\n', '\r'])
                    .to_string();
                if tx.send(line).is_err() {
                    break;
                }
            }
        }
    }
}
