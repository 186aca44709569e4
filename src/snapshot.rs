// Snapshot assembly: one pass over all collectors plus the cached probe.

use std::sync::Arc;

use crate::docker_repo::DockerRepo;
use crate::models::HealthSnapshot;
use crate::proc_repo::ProcRepo;
use crate::proc_repo::cpu::CpuTracker;
use crate::speedtest_repo::SpeedtestRepo;

/// Composition root handed to the routes. Owns no parsing itself; each
/// repo decides its own pass/fail and degraded collectors contribute
/// zero or empty values, so assembly never fails.
pub struct HealthService {
    proc_repo: Arc<ProcRepo>,
    cpu_tracker: Arc<CpuTracker>,
    /// None when the docker collector is disabled; the snapshot then
    /// omits the "docker" field entirely.
    docker_repo: Option<Arc<DockerRepo>>,
    speedtest_repo: Arc<SpeedtestRepo>,
}

impl HealthService {
    pub fn new(
        proc_repo: Arc<ProcRepo>,
        cpu_tracker: Arc<CpuTracker>,
        docker_repo: Option<Arc<DockerRepo>>,
        speedtest_repo: Arc<SpeedtestRepo>,
    ) -> Self {
        Self {
            proc_repo,
            cpu_tracker,
            docker_repo,
            speedtest_repo,
        }
    }

    pub async fn collect_snapshot(&self) -> HealthSnapshot {
        let cpu = self.cpu_tracker.get().await;
        let memory = self.proc_repo.get_memory_info().await;
        let disks = self.proc_repo.get_disk_info().await;
        let network = self.proc_repo.get_network_interfaces().await;
        let disk_io = self.proc_repo.get_disk_io_stats().await;
        let temperature = self.proc_repo.get_thermal_zones().await;
        let docker = match &self.docker_repo {
            Some(repo) => Some(repo.list_containers().await),
            None => None,
        };
        let internet_speed = self.speedtest_repo.get().await;

        HealthSnapshot {
            timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            cpu,
            memory,
            disks,
            network,
            disk_io,
            temperature,
            docker,
            internet_speed,
        }
    }
}
