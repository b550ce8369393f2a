use crate::{
    fixed::FixedPoint,
    pipeline::{
        processor::evaluate_unit,
        request::{Partial, WorkUnit},
    },
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Worker task responsible for evaluating [`WorkUnit`] messages.
///
/// The worker listens on its own queue and forwards one [`Partial`] per unit
/// to the aggregator. It never touches the accumulator and never waits on
/// another worker.
///
/// # Arguments
///
/// - `_worker_id`: Identifier for this worker (used for logs/tracing).
/// - `rx`: Receiver through which [`WorkUnit`]s arrive.
/// - `tx`: Shared queue into the aggregator.
/// - `fixed`: Scale shared read-only by every worker.
///
/// The loop ends when `rx` is closed and empty, or when the aggregator has
/// gone away.
#[allow(clippy::used_underscore_binding)]
pub async fn worker_loop(
    _worker_id: usize,
    mut rx: mpsc::Receiver<WorkUnit>,
    tx: mpsc::Sender<Partial>,
    fixed: Arc<FixedPoint>,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} started");

    while let Some(unit) = rx.recv().await {
        let partial = evaluate_unit(unit, &fixed);

        if let Err(_e) = tx.send(partial).await {
            #[cfg(feature = "tracing")]
            tracing::debug!("Worker {_worker_id} failed to forward partial: {_e}");
            break;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} stopped");
}
