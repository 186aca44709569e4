// CPU usage via delta sampling of the aggregate /proc/stat counter line.
//
// A background task keeps a rolling pair of counter readings and publishes
// the rate computed over each tick, so request handlers read the latest
// precomputed value instead of blocking on a sampling pause.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tokio::time::{Duration, interval};

use crate::models::CpuInfo;

/// Jiffy counters from the aggregate "cpu " line, in file order:
/// user, nice, system, idle, iowait, irq, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuSample(pub Vec<u64>);

impl CpuSample {
    /// Parse the first line of /proc/stat. Returns None when the line is
    /// not the aggregate cpu line or carries no numeric fields.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let label = fields.next()?;
        if label != "cpu" {
            return None;
        }
        let vals: Vec<u64> = fields.map_while(|f| f.parse().ok()).collect();
        if vals.is_empty() { None } else { Some(Self(vals)) }
    }

    fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    fn idle(&self) -> u64 {
        self.0[3]
    }
}

/// Rate over the interval between two samples.
///
/// Returns zero CpuInfo when either sample has fewer than 4 fields or the
/// total did not advance. Deltas use saturating subtraction, so a counter
/// reset (e.g. reading a different host root between samples) clamps to
/// zero instead of producing a negative spike.
pub fn cpu_delta(prev: &CpuSample, cur: &CpuSample) -> CpuInfo {
    if prev.0.len() < 4 || cur.0.len() < 4 {
        return CpuInfo::default();
    }
    let d_total = cur.total().saturating_sub(prev.total());
    let d_idle = cur.idle().saturating_sub(prev.idle());
    if d_total == 0 {
        return CpuInfo::default();
    }
    let idle_percent = 100.0 * d_idle as f64 / d_total as f64;
    CpuInfo {
        usage_percent: 100.0 - idle_percent,
        idle_percent,
    }
}

/// Read one sample from {proc_path}/stat. Any read or parse failure is
/// reported as None; the sampler treats that tick as a miss.
pub fn read_sample(proc_path: &Path) -> Option<CpuSample> {
    let content = std::fs::read_to_string(proc_path.join("stat")).ok()?;
    CpuSample::parse(content.lines().next()?)
}

/// Shared cell holding the most recent computed CPU rate.
#[derive(Default)]
pub struct CpuTracker {
    current: RwLock<CpuInfo>,
}

impl CpuTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest precomputed rate; zero until the sampler has two readings.
    pub async fn get(&self) -> CpuInfo {
        *self.current.read().await
    }

    pub(crate) async fn set(&self, info: CpuInfo) {
        *self.current.write().await = info;
    }
}

/// Spawns the sampler: reads {proc}/stat every interval_ms, diffs against
/// the previous tick's reading and publishes the rate into the tracker.
/// A tick that fails to read drops the pair so the next delta spans two
/// good readings.
pub fn spawn_sampler(
    tracker: Arc<CpuTracker>,
    proc_path: std::path::PathBuf,
    interval_ms: u64,
    mut shutdown_rx: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut prev: Option<CpuSample> = None;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let path = proc_path.clone();
                    let sample = tokio::task::spawn_blocking(move || read_sample(&path))
                        .await
                        .ok()
                        .flatten();
                    match sample {
                        Some(cur) => {
                            if let Some(p) = &prev {
                                tracker.set(cpu_delta(p, &cur)).await;
                            }
                            prev = Some(cur);
                        }
                        None => {
                            tracing::debug!(operation = "cpu_sample", "cpu counters unreadable");
                            tracker.set(CpuInfo::default()).await;
                            prev = None;
                        }
                    }
                }
                _ = shutdown_rx.changed() => {
                    tracing::debug!("CPU sampler shutting down");
                    break;
                }
            }
        }
    })
}
