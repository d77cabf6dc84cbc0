use anyhow::Result;
use docker_monitor::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Resolves with the name of the signal that asked us to stop.
#[cfg(unix)]
async fn stop_requested() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
        tracing::warn!("SIGTERM handler unavailable; stopping on Ctrl-C only");
        let _ = tokio::signal::ctrl_c().await;
        return "SIGINT";
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn stop_requested() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "Ctrl-C"
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%dT%H:%M:%S%.3f%:z".to_string()))
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_config = config::AppConfig::load()?;
    let monitoring = &app_config.monitoring;
    let report = &app_config.report;

    let store = log_store::LogStore::open(app_config.logging.resolved_dir())?;
    let source =
        docker_repo::DockerRepo::connect(Duration::from_secs(monitoring.stats_timeout_secs))?;
    let notifier = notifier::ActiveNotifier::new(app_config.telegram.as_ref())
        .map_err(|e| anyhow::anyhow!("notifier: {}", e))?;
    if app_config.telegram.is_none() {
        tracing::warn!("no [telegram] section; alerts and reports go to the log only");
    }
    let trigger = scheduler::ReportTrigger::new(report.hour, report.minute)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %store.dir().display(),
        interval_secs = monitoring.interval_secs,
        cpu_threshold = monitoring.cpu_threshold,
        report_at = %format!("{:02}:{:02}", report.hour, report.minute),
        "{} running",
        env!("CARGO_PKG_NAME")
    );

    let config = scheduler::SchedulerConfig {
        interval: Duration::from_secs(monitoring.interval_secs),
        cpu_threshold: monitoring.cpu_threshold,
        io_totals: report.io_totals,
    };
    scheduler::Scheduler::new(source, notifier, store, config, trigger)
        .run(async {
            let signal = stop_requested().await;
            tracing::info!(signal, "shutting down");
        })
        .await;

    Ok(())
}
