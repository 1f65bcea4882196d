use anyhow::Result;
use dashboard_api::collector::MetricsCollector;
use dashboard_api::docker_repo::{ContainerRuntime, DockerRepo};
use dashboard_api::kube_repo::KubectlResolver;
use dashboard_api::power::Architecture;
use dashboard_api::sysinfo_repo::SysinfoRepo;
use dashboard_api::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
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
    let arch = Architecture::current();

    let sysinfo_repo = Arc::new(SysinfoRepo::new(Duration::from_millis(
        app_config.collection.cpu_sample_ms,
    )));
    let runtime = match DockerRepo::connect() {
        Ok(repo) => {
            if let Err(e) = repo.ping().await {
                tracing::warn!(error = %e, "Docker daemon not reachable; container list stays empty until it is");
            }
            Some(Arc::new(repo) as Arc<dyn ContainerRuntime>)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Docker client initialization failed; container features disabled");
            None
        }
    };
    let identity = Arc::new(KubectlResolver::new(&app_config.kubernetes, arch.clone()));
    let collector = Arc::new(MetricsCollector::new(
        sysinfo_repo,
        runtime.clone(),
        identity,
        arch.clone(),
    ));

    let active_streams = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let app = routes::app(
        collector,
        runtime,
        active_streams.clone(),
        shutdown_rx,
        app_config.clone(),
    );
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        architecture = %arch,
        "Listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    tracing::info!(
        active_streams = active_streams.load(Ordering::Relaxed),
        "Server stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
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
        let _ = tokio::signal::ctrl_c().await;
    }
}
