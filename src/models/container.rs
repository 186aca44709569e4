// Docker container models

use serde::{Deserialize, Serialize};

/// Container health derived from the parenthesized suffix of `docker ps`
/// status text; serializes to lowercase JSON (e.g. "healthy").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Starting,
    None,
}

impl HealthStatus {
    /// Derive from a status string like "Up 2 hours (healthy)".
    ///
    /// Only the first parenthesized group is inspected: "healthy" and
    /// "unhealthy" match exactly, a "health:" prefix means the check is
    /// still starting, and anything else (including the exit code in
    /// "Exited (0) 3 hours ago") means no health check.
    pub fn from_status(status: &str) -> Self {
        let Some(open) = status.find('(') else {
            return HealthStatus::None;
        };
        let rest = &status[open + 1..];
        let inner = match rest.find(')') {
            Some(close) => &rest[..close],
            None => rest,
        };
        if inner == "healthy" {
            HealthStatus::Healthy
        } else if inner == "unhealthy" {
            HealthStatus::Unhealthy
        } else if inner.starts_with("health:") {
            HealthStatus::Starting
        } else {
            HealthStatus::None
        }
    }
}

/// One row of the container listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: String,
    pub image: String,
    pub names: String,
    pub status: String,
    pub state: String,
    pub health: HealthStatus,
}
