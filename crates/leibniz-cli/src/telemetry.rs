//! Console logging for the driver.
//!
//! Logs go through `tracing_subscriber::fmt`, filtered by `RUST_LOG`
//! (default `info`). With `--json-logs` (`LOG_JSON`), each event is a JSON object instead
//! of the pretty multi-line format.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry(json: bool) -> anyhow::Result<()> {
    let pretty = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_thread_ids(true)
            .with_line_number(true)
            .with_target(false)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
            .with_file(true)
            .pretty()
    });
    let json = json.then(|| {
        tracing_subscriber::fmt::layer()
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
            .json()
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(pretty)
        .with(json)
        .try_init()?;

    Ok(())
}
