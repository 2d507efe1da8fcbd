//! Worker lifecycle: start, supervise and stop.

mod shutdown;

use std::time::{Duration, Instant};

use sentio_pipeline::WorkerHandles;

use self::shutdown::shutdown_signal;
use crate::config::{RuntimeConfig, Services};
use crate::{TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};

/// Interval at which worker liveness is checked.
const SUPERVISE_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the pipeline workers until a shutdown signal arrives or a worker
/// stops on its own.
///
/// # Errors
///
/// Returns the first worker error, if any.
pub async fn run_workers(services: Services, config: &RuntimeConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let handles = WorkerHandles::spawn(&services.state, &services.nats);

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        "Workers running, waiting for shutdown signal"
    );

    tokio::select! {
        () = shutdown_signal() => {}
        () = worker_stopped(&handles) => {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                "A worker stopped unexpectedly, shutting down"
            );
        }
    }

    handles.shutdown();

    let timeout = config.shutdown_timeout();
    let result = match tokio::time::timeout(timeout, handles.wait_all()).await {
        Ok(result) => result.map_err(anyhow::Error::from),
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET_SHUTDOWN,
                timeout_secs = timeout.as_secs(),
                "Workers did not stop in time, abandoning them"
            );
            Ok(())
        }
    };

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        uptime_secs = start_time.elapsed().as_secs(),
        "Shutdown completed"
    );

    result
}

/// Resolves once any worker has finished.
async fn worker_stopped(handles: &WorkerHandles) {
    let mut interval = tokio::time::interval(SUPERVISE_INTERVAL);
    while handles.all_running() {
        interval.tick().await;
    }
}
