use crate::error::{Error, Result};
use core::{fmt, str::FromStr};

/// Default number of worker tasks evaluating terms.
pub const DEFAULT_NUM_WORKERS: usize = 10;

/// Default number of fractional digits carried by every term.
pub const DEFAULT_SCALE: u32 = 64;

/// Default number of significant digits in a formatted result.
pub const DEFAULT_DIGITS: u64 = 50;

/// Default capacity of each worker's input queue.
pub const DEFAULT_WORKER_QUEUE_DEPTH: usize = 1;

/// Order in which the aggregator folds evaluated units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FoldOrder {
    /// Units are folded strictly in generation order. Every observable
    /// result is an exact prefix sum of the series.
    #[default]
    Sequenced,
    /// Units are folded as workers finish. Mid-run results may include a
    /// later unit before an earlier one; drained results are identical to
    /// [`FoldOrder::Sequenced`].
    Arrival,
}

impl fmt::Display for FoldOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequenced => write!(f, "sequenced"),
            Self::Arrival => write!(f, "arrival"),
        }
    }
}

impl FromStr for FoldOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequenced" => Ok(Self::Sequenced),
            "arrival" => Ok(Self::Arrival),
            other => Err(Error::InvalidConfig {
                reason: format!("unknown fold order '{other}' (expected 'sequenced' or 'arrival')"),
            }),
        }
    }
}

/// Tuning knobs for a [`Service`].
///
/// [`Service`]: crate::Service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Number of worker tasks. Each batch hands one denominator pair to
    /// every worker.
    pub num_workers: usize,
    /// Threads backing the service's dedicated runtime.
    pub runtime_threads: usize,
    /// Fractional decimal digits carried by every term and the running sum.
    pub scale: u32,
    /// Significant digits in the string returned by `result()`.
    ///
    /// At most `scale + 1`: one integer digit plus the carried fraction.
    pub digits: u64,
    /// Capacity of each worker's input queue.
    pub worker_queue_depth: usize,
    /// Capacity of the shared queue between workers and the aggregator.
    pub term_buffer_size: usize,
    pub fold_order: FoldOrder,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            num_workers: DEFAULT_NUM_WORKERS,
            runtime_threads: num_cpus::get(),
            scale: DEFAULT_SCALE,
            digits: DEFAULT_DIGITS,
            worker_queue_depth: DEFAULT_WORKER_QUEUE_DEPTH,
            term_buffer_size: 2 * DEFAULT_NUM_WORKERS,
            fold_order: FoldOrder::default(),
        }
    }
}

impl ServiceConfig {
    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("num_workers", self.num_workers),
            ("runtime_threads", self.runtime_threads),
            ("worker_queue_depth", self.worker_queue_depth),
            ("term_buffer_size", self.term_buffer_size),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(Error::InvalidConfig {
                reason: format!("{name} must be greater than 0"),
            });
        }
        if self.scale == 0 {
            return Err(Error::InvalidConfig {
                reason: "scale must be greater than 0".to_string(),
            });
        }
        if self.digits == 0 {
            return Err(Error::InvalidConfig {
                reason: "digits must be greater than 0".to_string(),
            });
        }
        if self.digits > u64::from(self.scale) + 1 {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "digits ({}) exceeds the {} significant digits carried at scale {}",
                    self.digits,
                    u64::from(self.scale) + 1,
                    self.scale
                ),
            });
        }
        Ok(())
    }
}
