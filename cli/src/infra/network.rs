//! Network infrastructure — implements `Fetcher` and `HttpProbe` with
//! blocking `ureq` calls moved onto `spawn_blocking`.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{Fetcher, HttpProbe};
use crate::domain::RetryPolicy;

/// Timeout for a single status probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Production HTTP client.
pub struct UreqClient;

impl Fetcher for UreqClient {
    async fn fetch(&self, url: &str, dest: &Path, policy: &RetryPolicy) -> Result<()> {
        let url = url.to_string();
        let dest = dest.to_path_buf();
        let policy = *policy;
        tokio::task::spawn_blocking(move || fetch_blocking(&url, &dest, &policy))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
    }
}

fn fetch_blocking(url: &str, dest: &Path, policy: &RetryPolicy) -> Result<()> {
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(policy.connect_timeout)
        .timeout(policy.attempt_timeout)
        .build();

    let response = match agent.get(url).call() {
        Ok(r) => r,
        Err(ureq::Error::Status(code, _)) => anyhow::bail!("Download failed: HTTP {code}"),
        Err(e) => anyhow::bail!("requesting {url}: {e}"),
    };

    let mut body = Vec::new();
    std::io::copy(&mut response.into_reader(), &mut body).context("Download interrupted")?;

    let mut file = std::fs::File::create(dest)
        .with_context(|| format!("creating {}", dest.display()))?;
    file.write_all(&body)
        .with_context(|| format!("writing {}", dest.display()))?;
    tracing::debug!(url, bytes = body.len(), dest = %dest.display(), "fetched");
    Ok(())
}

impl HttpProbe for UreqClient {
    async fn get_status(&self, url: &str, bearer: Option<&str>) -> Result<u16> {
        let url = url.to_string();
        let auth = bearer.map(|token| format!("Bearer {token}"));
        tokio::task::spawn_blocking(move || {
            let agent = ureq::AgentBuilder::new().timeout(PROBE_TIMEOUT).build();
            let mut req = agent.get(&url);
            if let Some(auth) = &auth {
                req = req.set("Authorization", auth);
            }
            match req.call() {
                Ok(resp) => Ok(resp.status()),
                Err(ureq::Error::Status(code, _)) => Ok(code),
                Err(e) => Err(anyhow::anyhow!("{url} unreachable: {e}")),
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
    }
}
