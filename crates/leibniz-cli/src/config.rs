use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use leibniz::{
    DEFAULT_DIGITS, DEFAULT_NUM_WORKERS, DEFAULT_SCALE, DEFAULT_WORKER_QUEUE_DEPTH, FoldOrder,
    ServiceConfig,
};

/// Runtime configuration for the `leibniz-cli` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is honored), with defaults that reproduce the classic
/// "print the running value once a second for a minute" driver.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "leibniz-cli",
    version,
    about = "Approximates π from the Leibniz series in the background and prints the running value"
)]
pub struct CliArgs {
    /// Number of worker tasks evaluating series terms concurrently.
    ///
    /// Every batch hands one pair of denominators to each worker.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = DEFAULT_NUM_WORKERS)]
    pub num_workers: usize,

    /// Threads backing the service runtime. Defaults to the number of CPUs.
    ///
    /// Environment variable: `RUNTIME_THREADS`
    #[arg(long, env = "RUNTIME_THREADS")]
    pub runtime_threads: Option<usize>,

    /// Fractional decimal digits carried by every term and the running sum.
    ///
    /// Higher values cost more per term but postpone the point where
    /// rounding, rather than truncating the series, limits accuracy.
    ///
    /// Environment variable: `SCALE`
    #[arg(long, env = "SCALE", default_value_t = DEFAULT_SCALE)]
    pub scale: u32,

    /// Significant digits printed for each result.
    ///
    /// Environment variable: `DIGITS`
    #[arg(long, env = "DIGITS", default_value_t = DEFAULT_DIGITS)]
    pub digits: u64,

    /// Capacity of each worker's input queue.
    ///
    /// Environment variable: `WORKER_QUEUE_DEPTH`
    #[arg(long, env = "WORKER_QUEUE_DEPTH", default_value_t = DEFAULT_WORKER_QUEUE_DEPTH)]
    pub worker_queue_depth: usize,

    /// Capacity of the queue between the workers and the aggregator.
    /// Defaults to twice the number of workers.
    ///
    /// Environment variable: `TERM_BUFFER_SIZE`
    #[arg(long, env = "TERM_BUFFER_SIZE")]
    pub term_buffer_size: Option<usize>,

    /// Order in which evaluated terms are folded: `sequenced` or `arrival`.
    ///
    /// Environment variable: `FOLD_ORDER`
    #[arg(long, env = "FOLD_ORDER", default_value_t = FoldOrder::Sequenced)]
    pub fold_order: FoldOrder,

    /// Milliseconds between two printed results.
    ///
    /// Environment variable: `POLL_INTERVAL_MS`
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Number of results printed before the service is stopped.
    ///
    /// Environment variable: `POLLS`
    #[arg(long, env = "POLLS", default_value_t = 60)]
    pub polls: u64,

    /// Seconds to wait for in-flight terms to drain after stopping.
    ///
    /// Environment variable: `DRAIN_TIMEOUT_SECS`
    #[arg(long, env = "DRAIN_TIMEOUT_SECS", default_value_t = 10)]
    pub drain_timeout_secs: u64,

    /// Emit logs as JSON instead of human-readable text.
    ///
    /// Environment variable: `LOG_JSON`
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub json_logs: bool,
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub service: ServiceConfig,
    pub poll_interval: Duration,
    pub polls: u64,
    pub drain_timeout: Duration,
    pub json_logs: bool,
}

impl TryFrom<CliArgs> for DriverConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.poll_interval_ms == 0 {
            bail!("POLL_INTERVAL_MS must be greater than 0");
        }

        let term_buffer_size = match args.term_buffer_size {
            Some(size) => size,
            None => args
                .num_workers
                .checked_mul(2)
                .ok_or_else(|| anyhow::anyhow!("Overflow in term_buffer_size computation"))?,
        };

        let service = ServiceConfig {
            num_workers: args.num_workers,
            runtime_threads: args
                .runtime_threads
                .unwrap_or_else(|| ServiceConfig::default().runtime_threads),
            scale: args.scale,
            digits: args.digits,
            worker_queue_depth: args.worker_queue_depth,
            term_buffer_size,
            fold_order: args.fold_order,
        };
        service.validate()?;

        Ok(Self {
            service,
            poll_interval: Duration::from_millis(args.poll_interval_ms),
            polls: args.polls,
            drain_timeout: Duration::from_secs(args.drain_timeout_secs),
            json_logs: args.json_logs,
        })
    }
}
