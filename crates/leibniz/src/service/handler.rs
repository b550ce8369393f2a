//! Live-queryable π approximation backed by a background pipeline.
//!
//! This module defines [`Service`], which owns the shared accumulator and a
//! dedicated runtime hosting the generator, the worker pool and the
//! aggregator.
//!
//! ## Responsibilities
//!
//! - Enforce start-once / stop-once semantics and report misuse.
//! - Spawn the pipeline on `start()` and fire the stop signal on `stop()`.
//! - Answer result queries in any state with a consistent snapshot.

use super::{
    config::ServiceConfig,
    state::{Lifecycle, State},
};
use crate::{
    error::{Error, Result},
    fixed::{FixedPoint, approximate},
    pipeline::{aggregator::Accumulator, aggregator::fold_partials, coordinator::run_generator},
    pool::manager::WorkerPool,
};
use core::time::Duration;
use num_bigint::BigUint;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use tokio::{
    runtime::{Builder, Runtime},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A point-in-time view of the accumulator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Series terms folded on top of the leading `1`.
    pub iterations: BigUint,
    /// `4 × sum`, formatted like [`Service::result`].
    pub result: String,
}

/// Background approximation of π using the Leibniz series.
///
/// The accumulator starts at `1`, so a service that was never started
/// reports exactly `4`. After `start()`, a generator task hands pairs of
/// denominators to a pool of workers, and a single aggregator folds their
/// reciprocals into the running sum. `stop()` stops the generator; work that
/// was already dispatched still drains into the sum.
///
/// Every method takes `&self`, so a service can be shared across threads
/// behind an [`Arc`].
///
/// ```
/// use leibniz::Service;
///
/// let service = Service::new();
/// assert!(service.result().starts_with("4.0"));
///
/// service.start()?;
/// service.stop()?;
/// service.wait_drained(core::time::Duration::from_secs(5))?;
/// let settled = service.result();
/// assert_eq!(settled, service.result());
/// # Ok::<(), leibniz::Error>(())
/// ```
pub struct Service {
    config: ServiceConfig,
    fixed: Arc<FixedPoint>,
    accumulator: Arc<Mutex<Accumulator>>,
    lifecycle: Lifecycle,
    stop: CancellationToken,
    drained: CancellationToken,
    runtime: OnceLock<Runtime>,
}

impl Service {
    /// Creates an idle service with the default configuration.
    pub fn new() -> Self {
        Self::build(ServiceConfig::default())
    }

    /// Creates an idle service with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` does not validate.
    pub fn with_config(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ServiceConfig) -> Self {
        let fixed = Arc::new(FixedPoint::new(config.scale));
        let accumulator = Arc::new(Mutex::new(Accumulator::new(&fixed)));
        Self {
            config,
            fixed,
            accumulator,
            lifecycle: Lifecycle::new(),
            stop: CancellationToken::new(),
            drained: CancellationToken::new(),
            runtime: OnceLock::new(),
        }
    }

    /// Starts the background pipeline.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyStarted`] if the service is running.
    /// - [`Error::AlreadyStopped`] if the service was stopped.
    /// - [`Error::Runtime`] if the runtime could not be built; the service
    ///   is then stopped for good.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn start(&self) -> Result<()> {
        self.lifecycle.begin()?;

        let runtime = match self.build_runtime() {
            Ok(runtime) => runtime,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Failed to start service: {e}");
                self.lifecycle.abort();
                self.drained.cancel();
                return Err(e);
            }
        };
        let handle = runtime.handle().clone();

        let (terms_tx, terms_rx) = mpsc::channel(self.config.term_buffer_size);
        handle.spawn(fold_partials(
            terms_rx,
            Arc::clone(&self.accumulator),
            self.config.fold_order,
            self.drained.clone(),
        ));

        let pool = WorkerPool::spawn(
            &handle,
            self.config.num_workers,
            self.config.worker_queue_depth,
            terms_tx,
            Arc::clone(&self.fixed),
        );
        handle.spawn(run_generator(pool, self.stop.clone()));

        // `begin()` admits a single caller, so the cell is always empty here.
        let _ = self.runtime.set(runtime);

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Service started with {} workers at scale {}",
            self.config.num_workers,
            self.config.scale
        );
        Ok(())
    }

    /// Stops producing new terms. Already-dispatched work keeps draining.
    ///
    /// Never blocks. Safe to call from any thread, concurrently with
    /// [`Service::result`].
    ///
    /// # Errors
    ///
    /// - [`Error::NotStarted`] if the service was never started.
    /// - [`Error::AlreadyStopped`] if the service was already stopped.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn stop(&self) -> Result<()> {
        self.lifecycle.end()?;
        self.stop.cancel();

        #[cfg(feature = "tracing")]
        tracing::info!("Service stopping, draining in-flight work");
        Ok(())
    }

    /// Returns the current approximation of π as a decimal string with
    /// [`ServiceConfig::digits`] significant digits.
    ///
    /// Valid in every state. Blocks only for the accumulator lock.
    pub fn result(&self) -> String {
        let accumulator = self.accumulator.lock();
        approximate(&accumulator.sum, self.config.digits)
    }

    /// Returns the folded term count and the approximation read under a
    /// single lock acquisition.
    pub fn snapshot(&self) -> Snapshot {
        let accumulator = self.accumulator.lock();
        Snapshot {
            iterations: accumulator.iterations.clone(),
            result: approximate(&accumulator.sum, self.config.digits),
        }
    }

    /// Number of series terms folded so far, not counting the leading `1`.
    pub fn iterations(&self) -> BigUint {
        self.accumulator.lock().iterations.clone()
    }

    pub fn state(&self) -> State {
        self.lifecycle.load()
    }

    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// `true` once the pipeline has stopped and every dispatched term has
    /// been folded.
    pub fn is_drained(&self) -> bool {
        self.drained.is_cancelled()
    }

    /// Resolves once the pipeline has fully drained.
    ///
    /// Never resolves for a service that is never started and stopped.
    pub async fn drained(&self) {
        self.drained.cancelled().await;
    }

    /// Blocks the calling thread until the pipeline has drained.
    ///
    /// # Errors
    ///
    /// - [`Error::NotStarted`] if the service was never started.
    /// - [`Error::DrainTimeout`] if draining takes longer than `timeout`,
    ///   which is always the case while the service is still running or
    ///   has not finished starting.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous context; use
    /// [`Service::drained`] there instead.
    pub fn wait_drained(&self, timeout: Duration) -> Result<()> {
        if self.is_drained() {
            return Ok(());
        }
        let Some(runtime) = self.runtime.get() else {
            // `start()` publishes `Running` before it installs the runtime.
            return match self.state() {
                State::Created => Err(Error::NotStarted),
                State::Running | State::Stopped => Err(Error::DrainTimeout { timeout }),
            };
        };

        // The timer must be created inside the runtime, not on the caller.
        runtime
            .block_on(async { tokio::time::timeout(timeout, self.drained.cancelled()).await })
            .map_err(|_| Error::DrainTimeout { timeout })?;

        #[cfg(feature = "tracing")]
        tracing::info!("Service drained after {} terms", self.iterations());
        Ok(())
    }

    fn build_runtime(&self) -> Result<Runtime> {
        Builder::new_multi_thread()
            .worker_threads(self.config.runtime_threads)
            .thread_name("leibniz-worker")
            .enable_time()
            .build()
            .map_err(Error::from)
    }
}

impl Default for Service {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Service {
    fn drop(&mut self) {
        self.stop.cancel();
        // Never block in drop: the owner may itself be running on a runtime.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
