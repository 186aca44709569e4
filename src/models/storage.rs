// Disk space and disk I/O models

use serde::{Deserialize, Serialize};

/// Space usage for one mounted block-device filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskInfo {
    pub path: String,
    pub total_kb: u64,
    pub used_kb: u64,
    pub free_kb: u64,
    pub usage_percent: f64,
}

/// Cumulative I/O counters for one whole block device (partitions excluded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskIoStat {
    pub name: String,
    pub reads_completed: u64,
    pub writes_completed: u64,
    pub read_sectors: u64,
    pub write_sectors: u64,
}
