#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, DriverConfig};
use leibniz::Service;
use telemetry::init_telemetry;
use tokio::{signal, time::MissedTickBehavior};

// Using mimalloc for the per-term big integer allocations made on every
// worker thread, especially in musl environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = DriverConfig::try_from(args)?;

    init_telemetry(config.json_logs)?;
    log_startup_info(&config);

    let service = Service::with_config(config.service.clone())?;
    service.start()?;

    tokio::select! {
        () = print_results(&service, &config) => {},
        () = shutdown_signal() => {
            #[cfg(feature = "tracing")]
            tracing::info!("Shutdown signal received, stopping early...");
        },
    }

    service.stop()?;
    if tokio::time::timeout(config.drain_timeout, service.drained())
        .await
        .is_err()
    {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Drain timed out after {:?}; reporting the partial sum",
            config.drain_timeout
        );
    }

    let snapshot = service.snapshot();
    println!("Result : {}", snapshot.result);
    println!("Terms  : {}", snapshot.iterations);

    #[cfg(feature = "tracing")]
    tracing::info!("Service shut down successfully");
    Ok(())
}

/// Prints the running approximation once per poll interval.
async fn print_results(service: &Service, config: &DriverConfig) {
    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    for _ in 0..config.polls {
        ticker.tick().await;
        println!("Result : {}", service.result());
    }
}

fn log_startup_info(_config: &DriverConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!("Starting π service with full config: {:#?}", _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting π service with {} workers, printing {} results",
            _config.service.num_workers,
            _config.polls
        );
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }
}
