// Cached internet speed-test result

use serde::{Deserialize, Serialize};

/// Latest throughput probe result. The default value is the unmeasured
/// state served until the first refresh cycle completes; each refresh
/// replaces the whole value, never individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedTestResult {
    pub available: bool,
    pub download_mbps: f64,
    pub upload_mbps: f64,
    /// RFC 3339 UTC completion time of the last refresh; empty before it.
    pub last_checked: String,
}

impl Default for SpeedTestResult {
    fn default() -> Self {
        Self {
            available: false,
            download_mbps: 0.0,
            upload_mbps: 0.0,
            last_checked: String::new(),
        }
    }
}
