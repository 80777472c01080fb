//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` spawns host processes with tokio, applying the
//! working directory and environment from each call's `ExecContext`.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::{CommandRunner, ExecContext};

/// Default timeout for short probe commands (`systemctl`, `docker ps`, ...).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(60);

/// Production `CommandRunner`.
///
/// Captured commands race a timer with `tokio::select!` and the child is
/// killed explicitly when the timer wins.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

fn command(ctx: &ExecContext, program: &str, args: &[&str]) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args)
        .current_dir(&ctx.working_dir)
        .envs(&ctx.env)
        .kill_on_drop(true);
    cmd
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, ctx: &ExecContext, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(ctx, program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        ctx: &ExecContext,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, ?args, cwd = %ctx.working_dir.display(), "running command");
        let mut child = command(ctx, program, args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let output = tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok::<_, anyhow::Error>(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result?,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                tracing::warn!(program, timeout_secs = timeout.as_secs(), "command timed out");
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        };

        tracing::debug!(program, status = %output.status, "command finished");
        Ok(output)
    }

    async fn run_status(
        &self,
        ctx: &ExecContext,
        program: &str,
        args: &[&str],
    ) -> Result<ExitStatus> {
        tracing::debug!(program, ?args, cwd = %ctx.working_dir.display(), "running command (inherited stdio)");
        let status = command(ctx, program, args)
            .stdin(Stdio::null())
            .status()
            .await
            .with_context(|| format!("failed to run {program}"))?;
        tracing::debug!(program, %status, "command finished");
        Ok(status)
    }
}
