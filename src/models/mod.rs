// Domain models (one value type per collector, assembled into HealthSnapshot)

mod container;
mod network;
mod speed;
mod storage;
mod system;
mod thermal;

pub use container::{ContainerInfo, HealthStatus};
pub use network::NetworkInterface;
pub use speed::SpeedTestResult;
pub use storage::{DiskInfo, DiskIoStat};
pub use system::{CpuInfo, HealthSnapshot, MemoryInfo};
pub use thermal::ThermalZone;
