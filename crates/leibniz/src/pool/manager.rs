//! Asynchronous worker pool for term evaluation.
//!
//! This module defines the [`WorkerPool`] struct, which owns the sending half
//! of every worker's input queue. Units are distributed round-robin. The pool
//! has no shutdown method of its own: dropping it closes every queue, and
//! each worker exits once it has drained what it already received.
//!
//! Each worker listens on its own bounded [`mpsc::Receiver`] and evaluates
//! units independently, so workers never contend with each other.

use super::worker::worker_loop;
use crate::{
    error::{Error, Result},
    fixed::FixedPoint,
    pipeline::request::{Partial, WorkUnit},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::{runtime::Handle, sync::mpsc};

/// A pool of asynchronous workers that evaluate [`WorkUnit`]s.
pub struct WorkerPool {
    workers: Vec<mpsc::Sender<WorkUnit>>,
    next_worker: AtomicUsize,
}

impl WorkerPool {
    /// Spawns `width` workers on `handle`, each with an input queue of
    /// `queue_depth` units, all forwarding into `terms_tx`.
    ///
    /// The pool's copy of `terms_tx` is dropped once every worker has its
    /// own clone, so the term queue closes as soon as the last worker exits.
    pub fn spawn(
        handle: &Handle,
        width: usize,
        queue_depth: usize,
        terms_tx: mpsc::Sender<Partial>,
        fixed: Arc<FixedPoint>,
    ) -> Self {
        let mut workers = Vec::with_capacity(width);

        for worker_id in 0..width {
            // The generator dispatches one pair per worker per batch, so a
            // depth of 1 already keeps every worker busy while the next batch
            // is being prepared.
            let (tx, rx) = mpsc::channel(queue_depth);
            workers.push(tx);

            handle.spawn(worker_loop(
                worker_id,
                rx,
                terms_tx.clone(),
                Arc::clone(&fixed),
            ));
        }

        Self::new(workers)
    }

    /// Constructs a [`WorkerPool`] from already-initialized worker channels.
    pub const fn new(workers: Vec<mpsc::Sender<WorkUnit>>) -> Self {
        Self {
            workers,
            next_worker: AtomicUsize::new(0),
        }
    }

    /// Number of workers in the pool.
    pub fn width(&self) -> usize {
        self.workers.len()
    }

    /// Returns the index of the next worker to receive work (round-robin).
    ///
    /// Uses a relaxed atomic increment to minimize contention.
    pub fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Sends a [`WorkUnit`] to the next worker in the pool, waiting for room
    /// in its queue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelError`] if the worker's queue is closed.
    pub async fn send_to_next_worker(&self, unit: WorkUnit) -> Result<()> {
        let worker_idx = self.next_worker_index();
        let worker = &self.workers[worker_idx];

        match worker.send(unit).await {
            Ok(()) => Ok(()),
            Err(_) => Err(Error::ChannelError {
                context: format!("Worker {worker_idx} channel closed"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Denominators;

    #[tokio::test]
    async fn round_robin_wraps_around() {
        let (a, _ra) = mpsc::channel(1);
        let (b, _rb) = mpsc::channel(1);
        let (c, _rc) = mpsc::channel(1);
        let pool = WorkerPool::new(vec![a, b, c]);

        let picks: Vec<_> = (0..7).map(|_| pool.next_worker_index()).collect();
        assert_eq!(picks, [0, 1, 2, 0, 1, 2, 0]);
    }

    #[tokio::test]
    async fn closed_worker_is_reported() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let pool = WorkerPool::new(vec![tx]);

        let unit = WorkUnit {
            seq: 0,
            pair: Denominators::new().next_pair(),
        };
        assert!(matches!(
            pool.send_to_next_worker(unit).await,
            Err(Error::ChannelError { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn term_queue_closes_when_pool_is_dropped() {
        let (tx, mut rx) = mpsc::channel(16);
        let pool = WorkerPool::spawn(&Handle::current(), 4, 1, tx, Arc::new(FixedPoint::new(10)));

        let mut cursor = Denominators::new();
        for seq in 0..8 {
            let unit = WorkUnit {
                seq,
                pair: cursor.next_pair(),
            };
            pool.send_to_next_worker(unit).await.unwrap();
        }
        drop(pool);

        let mut seqs = Vec::new();
        while let Some(partial) = rx.recv().await {
            seqs.push(partial.seq);
        }
        seqs.sort_unstable();
        assert_eq!(seqs, (0..8).collect::<Vec<_>>());
    }
}
