//! Host introspection — implements the `HostProbe` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ExecContext, HostProbe};
use crate::domain::HostInfo;

const DEVICE_MODEL_PATH: &str = "/proc/device-tree/model";
const MEMINFO_PATH: &str = "/proc/meminfo";

/// Reads host facts from `/proc` and `df`.
pub struct SystemHost<'a, R> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> SystemHost<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    async fn free_disk_kb(&self) -> Result<u64> {
        let ctx = ExecContext::new("/");
        let output = self
            .runner
            .run(&ctx, "df", &["-k", "--output=avail", "/"])
            .await
            .context("running df")?;
        anyhow::ensure!(output.status.success(), "df exited with {}", output.status);
        parse_df_avail(&String::from_utf8_lossy(&output.stdout))
    }
}

impl<R: CommandRunner> HostProbe for SystemHost<'_, R> {
    async fn host_info(&self) -> Result<HostInfo> {
        let free_disk_kb = self.free_disk_kb().await?;
        let (meminfo, device_model) = tokio::task::spawn_blocking(|| {
            (
                std::fs::read_to_string(MEMINFO_PATH),
                std::fs::read_to_string(DEVICE_MODEL_PATH).ok(),
            )
        })
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?;
        let meminfo = meminfo.with_context(|| format!("reading {MEMINFO_PATH}"))?;
        let total_memory_mb = parse_meminfo_total_mb(&meminfo)?;

        Ok(HostInfo {
            device_model,
            free_disk_kb,
            total_memory_mb,
        })
    }

    async fn is_root(&self) -> Result<bool> {
        let output = self
            .runner
            .run(&ExecContext::new("/"), "id", &["-u"])
            .await
            .context("running id -u")?;
        anyhow::ensure!(output.status.success(), "id -u exited with {}", output.status);
        Ok(String::from_utf8_lossy(&output.stdout).trim() == "0")
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        let path = std::env::var_os("PATH")?;
        std::env::split_paths(&path)
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Parse the single value from `df -k --output=avail`.
///
/// # Errors
///
/// Returns an error if no numeric line follows the header.
pub fn parse_df_avail(stdout: &str) -> Result<u64> {
    stdout
        .lines()
        .skip(1)
        .find_map(|l| l.trim().parse::<u64>().ok())
        .ok_or_else(|| anyhow::anyhow!("unexpected df output: {stdout:?}"))
}

/// Parse `MemTotal` from `/proc/meminfo` into MB.
///
/// # Errors
///
/// Returns an error if the `MemTotal` line is missing or malformed.
pub fn parse_meminfo_total_mb(meminfo: &str) -> Result<u64> {
    meminfo
        .lines()
        .find_map(|l| l.strip_prefix("MemTotal:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb / 1024)
        .ok_or_else(|| anyhow::anyhow!("MemTotal not found in {MEMINFO_PATH}"))
}
