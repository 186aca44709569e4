// CPU, memory and full snapshot models

use serde::{Deserialize, Serialize};

use super::{ContainerInfo, DiskInfo, DiskIoStat, NetworkInterface, SpeedTestResult, ThermalZone};

/// Aggregate CPU load over the last sampling interval.
/// Both fields stay 0 until two counter samples have been taken.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CpuInfo {
    pub usage_percent: f64,
    pub idle_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_kb: u64,
    pub used_kb: u64,
    pub free_kb: u64,
    pub available_kb: u64,
    pub usage_percent: f64,
}

/// One complete health snapshot, assembled fresh per request.
/// Field names and nesting are the wire contract for GET /api/health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// ISO-8601 UTC assembly time.
    pub timestamp: String,
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disks: Vec<DiskInfo>,
    pub network: Vec<NetworkInterface>,
    pub disk_io: Vec<DiskIoStat>,
    pub temperature: Vec<ThermalZone>,
    /// Container listing; absent entirely when the docker collector is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker: Option<Vec<ContainerInfo>>,
    pub internet_speed: SpeedTestResult,
}
