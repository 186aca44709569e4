// Internet throughput probe, cached and refreshed on a schedule.
//
// Measuring takes tens of seconds, so requests only ever read the cached
// result; a background refresher is the sole writer. Primary method is
// speedtest-cli; when it is absent or reports nothing usable, a bounded
// download of a fixed-size payload estimates the downlink instead.

use std::sync::Arc;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::{RwLock, watch};
use tokio::time::{Duration, Instant, interval, timeout};

use crate::config::SpeedtestConfig;
use crate::models::SpeedTestResult;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe command spawn failed: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("probe command exited with {0}")]
    CommandStatus(std::process::ExitStatus),
    #[error("no usable rates in probe output")]
    NoRates,
    #[error("download probe failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct SpeedtestRepo {
    cache: RwLock<SpeedTestResult>,
    config: SpeedtestConfig,
    /// Primary probe binary; overridable for test fixtures.
    primary_command: String,
}

impl SpeedtestRepo {
    pub fn new(config: SpeedtestConfig) -> Self {
        Self::with_primary_command(config, "speedtest-cli")
    }

    pub fn with_primary_command(config: SpeedtestConfig, command: impl Into<String>) -> Self {
        Self {
            cache: RwLock::new(SpeedTestResult::default()),
            config,
            primary_command: command.into(),
        }
    }

    /// Whole-value copy of the latest result. Unmeasured (available=false,
    /// zero rates) until the first refresh cycle completes.
    pub async fn get(&self) -> SpeedTestResult {
        self.cache.read().await.clone()
    }

    /// Run one measurement cycle and replace the cached result wholesale.
    /// Idempotent and safe to invoke concurrently with readers; every
    /// failure is absorbed here so the refresher loop never dies.
    pub async fn refresh(&self) {
        let mut result = SpeedTestResult::default();

        match self.run_primary().await {
            Ok((download, upload)) => {
                result.download_mbps = download;
                result.upload_mbps = upload;
                result.available = true;
            }
            Err(e) => {
                tracing::debug!(error = %e, "primary speed test unusable, trying fallback");
            }
        }

        if !result.available {
            match self.run_fallback().await {
                Ok(download) if download > 0.0 => {
                    result.download_mbps = download;
                    result.available = true;
                }
                Ok(_) => {
                    tracing::debug!("fallback download probe measured zero throughput");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "fallback download probe failed");
                }
            }
        }

        result.last_checked = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        tracing::info!(
            available = result.available,
            download_mbps = result.download_mbps,
            upload_mbps = result.upload_mbps,
            "speed test cache refreshed"
        );
        *self.cache.write().await = result;
    }

    async fn run_primary(&self) -> Result<(f64, f64), ProbeError> {
        let output = Command::new(&self.primary_command)
            .arg("--simple")
            .output()
            .await?;
        if !output.status.success() {
            return Err(ProbeError::CommandStatus(output.status));
        }
        let text = String::from_utf8_lossy(&output.stdout);
        let (download, upload) = parse_speedtest_output(&text);
        if download > 0.0 || upload > 0.0 {
            Ok((download, upload))
        } else {
            Err(ProbeError::NoRates)
        }
    }

    /// Download the configured payload within the configured time limit
    /// and estimate downlink Mbps from bytes transferred so far - hitting
    /// the deadline keeps the partial measurement.
    async fn run_fallback(&self) -> Result<f64, ProbeError> {
        let limit = Duration::from_secs(self.config.fallback_timeout_secs);
        let started = Instant::now();
        let deadline = started + limit;

        let client = reqwest::Client::new();
        let request = client.get(&self.config.fallback_url).send();
        let mut response = match timeout(limit, request).await {
            Ok(r) => r?,
            Err(_) => return Ok(0.0),
        };

        let mut bytes: u64 = 0;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match timeout(remaining, response.chunk()).await {
                Ok(Ok(Some(chunk))) => bytes += chunk.len() as u64,
                Ok(Ok(None)) => break,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => break,
            }
        }

        let elapsed = started.elapsed().as_secs_f64();
        Ok(throughput_mbps(bytes, elapsed))
    }
}

/// Parse `speedtest-cli --simple` output:
/// ```text
/// Ping: 12.345 ms
/// Download: 93.81 Mbit/s
/// Upload: 38.62 Mbit/s
/// ```
/// Unparseable or absent lines leave the corresponding rate at 0.
pub fn parse_speedtest_output(output: &str) -> (f64, f64) {
    let mut download = 0.0;
    let mut upload = 0.0;
    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("Download:") {
            download = parse_leading_float(rest);
        } else if let Some(rest) = line.strip_prefix("Upload:") {
            upload = parse_leading_float(rest);
        }
    }
    (download, upload)
}

fn parse_leading_float(s: &str) -> f64 {
    s.split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

/// Megabits per second from bytes transferred over elapsed seconds.
pub fn throughput_mbps(bytes: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    bytes as f64 * 8.0 / elapsed_secs / 1e6
}

/// Spawns the refresher: one cycle immediately, then every
/// refresh_interval_secs until shutdown.
pub fn spawn_refresher(
    repo: Arc<SpeedtestRepo>,
    refresh_interval_secs: u64,
    mut shutdown_rx: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(refresh_interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    repo.refresh().await;
                }
                _ = shutdown_rx.changed() => {
                    tracing::debug!("speed test refresher shutting down");
                    break;
                }
            }
        }
    })
}
