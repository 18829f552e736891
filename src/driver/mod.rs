//! WebDriver server discovery and launch
//!
//! Resolves `chromedriver` / `geckodriver` from the config or PATH, starts
//! it on a local port and waits until `/status` reports ready. The child is
//! killed when the [`DriverProcess`] is dropped.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};

use crate::common::config::{DriverConfig, DriverKind};
use crate::common::wait::{self, WaitOptions};
use crate::common::{Error, Result};
use crate::webdriver::WebDriverClient;

/// Interval between readiness checks
const READY_POLL_MS: u64 = 100;

/// Locate the driver binary for `config`
///
/// An explicit `path` must exist; otherwise the kind's binary name is
/// searched on PATH.
pub fn resolve_binary(config: &DriverConfig) -> Result<PathBuf> {
    let name = config.kind.binary_name();

    if let Some(path) = &config.path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(Error::driver_not_found(name, &[path.display().to_string()]));
    }

    which::which(name).map_err(|_| Error::driver_not_found(name, &["PATH"]))
}

/// A locally spawned WebDriver server
#[derive(Debug)]
pub struct DriverProcess {
    child: Child,
    url: String,
}

impl DriverProcess {
    /// Spawn the driver and wait for it to accept sessions
    pub async fn spawn(config: &DriverConfig, startup_timeout: Duration) -> Result<Self> {
        let binary = resolve_binary(config)?;
        let port = config.effective_port();

        let child = spawn_child(&binary, config.kind, port)?;
        let url = format!("http://127.0.0.1:{}", port);
        let process = Self { child, url };

        tracing::info!(binary = %binary.display(), port, "Started WebDriver server");

        let client = WebDriverClient::new(&process.url)?;
        wait_ready(&client, startup_timeout).await?;

        Ok(process)
    }

    /// Base URL of the running driver
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Stop the driver
    pub async fn shutdown(mut self) -> Result<()> {
        self.child.kill().await?;
        tracing::debug!("WebDriver server stopped");
        Ok(())
    }
}

fn spawn_child(binary: &Path, kind: DriverKind, port: u16) -> Result<Child> {
    let mut cmd = Command::new(binary);
    match kind {
        DriverKind::Chromedriver => {
            cmd.arg(format!("--port={}", port));
        }
        DriverKind::Geckodriver => {
            cmd.arg("--port").arg(port.to_string());
        }
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            Error::DriverStartFailed(format!("Failed to start {}: {}", binary.display(), e))
        })
}

/// Poll the driver's status endpoint until it reports ready
pub async fn wait_ready(client: &WebDriverClient, timeout: Duration) -> Result<()> {
    let options = WaitOptions::new(timeout, Duration::from_millis(READY_POLL_MS));

    wait::until(options, "WebDriver ready", || async {
        // Connection refused just means the server is still starting
        match client.status().await {
            Ok(status) => Ok(status.ready),
            Err(Error::Http(_)) => Ok(false),
            Err(e) => Err(e),
        }
    })
    .await
    .map_err(|e| match e {
        Error::WaitTimeout { .. } => Error::DriverStartTimeout(timeout.as_secs()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_missing_explicit_path() {
        let config = DriverConfig {
            path: Some(PathBuf::from("/definitely/not/here/chromedriver")),
            ..Default::default()
        };
        match resolve_binary(&config).unwrap_err() {
            Error::DriverNotFound { name, searched } => {
                assert_eq!(name, "chromedriver");
                assert!(searched.contains("/definitely/not/here"));
            }
            other => panic!("Expected DriverNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_existing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("geckodriver");
        std::fs::write(&fake, b"").unwrap();

        let config = DriverConfig {
            kind: DriverKind::Geckodriver,
            path: Some(fake.clone()),
            ..Default::default()
        };
        assert_eq!(resolve_binary(&config).unwrap(), fake);
    }

    #[tokio::test]
    async fn test_wait_ready_times_out_without_server() {
        // Nothing listens on the discard port
        let client = WebDriverClient::new("http://127.0.0.1:9").unwrap();
        let err = wait_ready(&client, Duration::from_millis(250))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DriverStartTimeout(_)));
    }
}
