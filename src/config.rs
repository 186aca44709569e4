use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub speedtest: SpeedtestConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory holding the dashboard index.html served at GET /.
    pub web_root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9090,
            host: "0.0.0.0".into(),
            web_root: "/usr/share/healthdash".into(),
        }
    }
}

/// Base paths for the kernel pseudo-filesystems the collectors read.
/// Pointing these at a bind-mounted host root scopes metrics to the host
/// when running inside a container.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub proc_path: String,
    pub sys_path: String,
    /// Enable the docker collector (host mode only; the snapshot omits
    /// the "docker" field when false).
    pub docker: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            proc_path: "/proc".into(),
            sys_path: "/sys".into(),
            docker: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Tick of the background CPU sampler; also the delta window for the
    /// reported usage rate.
    pub cpu_interval_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            cpu_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeedtestConfig {
    pub refresh_interval_secs: u64,
    /// Fixed-size payload used when speedtest-cli is unavailable.
    pub fallback_url: String,
    pub fallback_timeout_secs: u64,
}

impl Default for SpeedtestConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 3600,
            fallback_url: "https://speed.cloudflare.com/__down?bytes=5000000".into(),
            fallback_timeout_secs: 20,
        }
    }
}

impl AppConfig {
    /// Load from the TOML file named by CONFIG_FILE (default config.toml).
    /// A missing file is not an error; the built-in defaults apply so the
    /// service runs unconfigured.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path, "config file not found, using defaults");
                let config = AppConfig::default();
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(anyhow::anyhow!("reading {}: {}", path, e)),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.sources.proc_path.is_empty(),
            "sources.proc_path must be non-empty"
        );
        anyhow::ensure!(
            !self.sources.sys_path.is_empty(),
            "sources.sys_path must be non-empty"
        );
        anyhow::ensure!(
            self.sampling.cpu_interval_ms >= 200,
            "sampling.cpu_interval_ms must be >= 200, got {}",
            self.sampling.cpu_interval_ms
        );
        anyhow::ensure!(
            self.speedtest.refresh_interval_secs > 0,
            "speedtest.refresh_interval_secs must be > 0, got {}",
            self.speedtest.refresh_interval_secs
        );
        anyhow::ensure!(
            !self.speedtest.fallback_url.is_empty(),
            "speedtest.fallback_url must be non-empty"
        );
        anyhow::ensure!(
            self.speedtest.fallback_timeout_secs > 0,
            "speedtest.fallback_timeout_secs must be > 0, got {}",
            self.speedtest.fallback_timeout_secs
        );
        Ok(())
    }
}
