use anyhow::Result;
use healthdash::*;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let proc_repo = Arc::new(proc_repo::ProcRepo::new(
        &app_config.sources.proc_path,
        &app_config.sources.sys_path,
    ));
    let cpu_tracker = Arc::new(proc_repo::cpu::CpuTracker::new());
    let docker_repo = app_config
        .sources
        .docker
        .then(|| Arc::new(docker_repo::DockerRepo::default()));
    let speedtest_repo = Arc::new(speedtest_repo::SpeedtestRepo::new(
        app_config.speedtest.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sampler_handle = proc_repo::cpu::spawn_sampler(
        cpu_tracker.clone(),
        proc_repo.proc_path().to_path_buf(),
        app_config.sampling.cpu_interval_ms,
        shutdown_rx.clone(),
    );
    let refresher_handle = speedtest_repo::spawn_refresher(
        speedtest_repo.clone(),
        app_config.speedtest.refresh_interval_secs,
        shutdown_rx,
    );

    let health = Arc::new(snapshot::HealthService::new(
        proc_repo,
        cpu_tracker,
        docker_repo,
        speedtest_repo,
    ));
    let app = routes::app(health, app_config.server.web_root.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c().await
                }
            } => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(true);
                let _ = sampler_handle.await;
                let _ = refresher_handle.await;
            }
        }
    }

    Ok(())
}
