use rayon::prelude::*;
use serde::Serialize;

use crate::config::BatchConfig;
use crate::domain::utils::cancellation::CancellationToken;
use crate::error::{Error, Result};

/// A pair that failed inside a batch. The batch itself carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairError {
    pub source: String,
    pub destination: String,
    pub reason: String,
}

enum PairOutcome<T> {
    Done(T),
    Failed(PairError),
    Skipped,
}

pub(crate) struct BatchOutcome<T> {
    /// Finished items in input order.
    pub results: Vec<T>,
    pub errors: Vec<PairError>,
    pub cancelled: bool,
}

/// Runs `work` over `items` on the rayon pool.
///
/// The token is polled before each item; items not started by then are skipped. A
/// failing item becomes a `PairError` labelled by `describe`. Output order follows
/// input order regardless of scheduling.
pub(crate) fn run_pairs<P, T, F, D>(items: &[P], cancel: &CancellationToken, work: F, describe: D) -> BatchOutcome<T>
where
    P: Sync,
    T: Send,
    F: Fn(&P) -> Result<T> + Sync,
    D: Fn(&P) -> (String, String) + Sync,
{
    let outcomes: Vec<PairOutcome<T>> = items
        .par_iter()
        .map(|item| {
            if cancel.is_cancelled() {
                return PairOutcome::Skipped;
            }

            match work(item) {
                Ok(value) => PairOutcome::Done(value),
                Err(e) => {
                    let (source, destination) = describe(item);
                    log::debug!("Pair {} => {} failed: {}", source, destination, e);
                    PairOutcome::Failed(PairError { source, destination, reason: e.to_string() })
                }
            }
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut errors = Vec::new();
    let mut cancelled = false;

    for outcome in outcomes {
        match outcome {
            PairOutcome::Done(value) => results.push(value),
            PairOutcome::Failed(error) => errors.push(error),
            PairOutcome::Skipped => cancelled = true,
        }
    }

    BatchOutcome { results, errors, cancelled }
}

/// Applies the partial-result policy once a batch is done.
pub(crate) fn check_cancelled(cancelled: bool, completed: usize, total: usize, config: &BatchConfig) -> Result<()> {
    if !cancelled {
        return Ok(());
    }

    if config.keep_partial_on_cancel {
        log::warn!("Batch cancelled: returning {} of {} pairs.", completed, total);
        Ok(())
    } else {
        log::warn!("Batch cancelled after {} of {} pairs; partial results discarded.", completed, total);
        Err(Error::Cancelled)
    }
}
