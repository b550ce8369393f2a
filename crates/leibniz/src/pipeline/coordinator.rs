use super::request::WorkUnit;
use crate::{error::Result, pool::manager::WorkerPool, sequence::Denominators};
use tokio_util::sync::CancellationToken;

/// Feeds denominator pairs to the worker pool until the stop signal fires.
///
/// Each round pulls one batch of `pool.width()` pairs from the cursor and
/// dispatches them round-robin, so every worker receives one pair per batch.
/// The stop signal is checked before every batch and raced against every
/// send; once it fires, no further unit is dispatched.
///
/// Returns the number of units dispatched. Dropping the pool on return closes
/// every worker queue, letting workers drain what they already hold.
///
/// # Errors
///
/// Returns [`Error::ChannelError`] if a worker queue closed while the
/// generator was still running.
///
/// [`Error::ChannelError`]: crate::Error::ChannelError
pub async fn feed_units(
    pool: WorkerPool,
    mut cursor: Denominators,
    stop: CancellationToken,
) -> Result<u64> {
    let mut seq = 0_u64;

    while !stop.is_cancelled() {
        for pair in cursor.next_batch(pool.width()) {
            let unit = WorkUnit { seq, pair };
            tokio::select! {
                biased;
                () = stop.cancelled() => return Ok(seq),
                res = pool.send_to_next_worker(unit) => res?,
            }
            seq += 1;
        }
    }

    Ok(seq)
}

/// Task entry point for the generator.
pub async fn run_generator(pool: WorkerPool, stop: CancellationToken) {
    #[cfg(feature = "tracing")]
    tracing::debug!("Generator started with {} workers", pool.width());

    match feed_units(pool, Denominators::new(), stop).await {
        Ok(_units) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Generator stopped after dispatching {_units} units");
        }
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Generator exited early: {_e}");
        }
    }
}
