// Container listing via the docker CLI.
//
// `docker ps` with a tab-separated format keeps the parsing trivial and
// avoids depending on the daemon API. The collector is total: a missing
// binary, an unreachable daemon or garbled output all yield an empty
// list, never an error - a broken docker install must not break the
// health endpoint.

use tokio::process::Command;

use crate::models::{ContainerInfo, HealthStatus};

const PS_FORMAT: &str = "{{.ID}}\t{{.Image}}\t{{.Names}}\t{{.Status}}\t{{.State}}";

pub struct DockerRepo {
    /// Program invoked for the listing; configurable so a host-scoped
    /// wrapper (or a fake in tests) can stand in for `docker`.
    command: String,
}

impl Default for DockerRepo {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerRepo {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub async fn list_containers(&self) -> Vec<ContainerInfo> {
        let output = match Command::new(&self.command)
            .args(["ps", "--format", PS_FORMAT])
            .output()
            .await
        {
            Ok(o) => o,
            Err(e) => {
                tracing::debug!(error = %e, command = %self.command, "docker ps spawn failed");
                return Vec::new();
            }
        };
        if !output.status.success() {
            tracing::debug!(
                status = %output.status,
                "docker ps exited non-zero"
            );
            return Vec::new();
        }
        match String::from_utf8(output.stdout) {
            Ok(text) => parse_ps_output(&text),
            Err(e) => {
                tracing::warn!(error = %e, "docker ps produced non-UTF8 output");
                Vec::new()
            }
        }
    }
}

/// Parse the tab-separated `docker ps` listing. Lines with an empty id
/// are dropped; missing trailing fields become empty strings.
pub fn parse_ps_output(output: &str) -> Vec<ContainerInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');
            let mut next = || fields.next().unwrap_or("").to_string();
            let (id, image, names, status, state) = (next(), next(), next(), next(), next());
            if id.is_empty() {
                return None;
            }
            let health = HealthStatus::from_status(&status);
            Some(ContainerInfo {
                id,
                image,
                names,
                status,
                state,
                health,
            })
        })
        .collect()
}
