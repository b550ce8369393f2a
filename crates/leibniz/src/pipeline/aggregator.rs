use super::request::Partial;
use crate::{fixed::FixedPoint, service::FoldOrder};
use bigdecimal::BigDecimal;
use num_bigint::BigUint;
use num_traits::Zero;
use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Running partial sum of the series, before scaling by the multiplier.
///
/// The sum starts at `1`, the first series term, so `iterations` counts the
/// reciprocal terms folded on top of it.
#[derive(Clone, Debug)]
pub struct Accumulator {
    pub sum: BigDecimal,
    pub iterations: BigUint,
}

impl Accumulator {
    pub fn new(fixed: &FixedPoint) -> Self {
        Self {
            sum: fixed.one(),
            iterations: BigUint::zero(),
        }
    }

    pub fn fold(&mut self, partial: Partial) {
        self.sum += partial.value;
        self.iterations += partial.terms;
    }
}

/// Parks partials that arrive ahead of their turn.
#[derive(Debug, Default)]
pub struct Reorder {
    next: u64,
    parked: BTreeMap<u64, Partial>,
}

impl Reorder {
    pub fn park(&mut self, partial: Partial) {
        self.parked.insert(partial.seq, partial);
    }

    /// Releases the partial whose turn it is, if it has arrived.
    pub fn pop_ready(&mut self) -> Option<Partial> {
        let partial = self.parked.remove(&self.next)?;
        self.next += 1;
        Some(partial)
    }

    pub fn len(&self) -> usize {
        self.parked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parked.is_empty()
    }

    /// Hands back whatever is still parked, in sequence order.
    pub fn drain(&mut self) -> impl Iterator<Item = Partial> {
        core::mem::take(&mut self.parked).into_values()
    }
}

/// Folds every partial from `rx` into `accumulator` until the queue closes.
///
/// The lock is taken once per partial and released before the next receive,
/// so result queries never wait on queue state. Once the queue is closed and
/// empty, `drained` is cancelled to announce the end of the pipeline.
pub async fn fold_partials(
    mut rx: mpsc::Receiver<Partial>,
    accumulator: Arc<Mutex<Accumulator>>,
    order: FoldOrder,
    drained: CancellationToken,
) {
    #[cfg(feature = "tracing")]
    tracing::debug!("Aggregator started ({order} order)");

    let mut reorder = Reorder::default();

    while let Some(partial) = rx.recv().await {
        match order {
            FoldOrder::Arrival => accumulator.lock().fold(partial),
            FoldOrder::Sequenced => {
                reorder.park(partial);
                while let Some(ready) = reorder.pop_ready() {
                    accumulator.lock().fold(ready);
                }
            }
        }
    }

    // Only reachable with a gap in the sequence, i.e. a worker died mid-unit.
    if !reorder.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Folding {} partials past a sequence gap",
            reorder.len()
        );
        for partial in reorder.drain() {
            accumulator.lock().fold(partial);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Aggregator drained");
    drained.cancel();
}
