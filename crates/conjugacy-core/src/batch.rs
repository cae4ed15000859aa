//! Evaluating many independent datasets.
//!
//! Each dataset is loaded and computed on its own; a failure is recorded in
//! that dataset's [`DatasetOutcome`] and never touches the others. Work is
//! spread over scoped threads and outcomes come back in input order.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;

use crate::dataset::PairSource;
use crate::engine::{Conjugacy, ConjugacyEngine};
use crate::error::Error;

/// Result for one named dataset.
#[derive(Debug)]
pub struct DatasetOutcome {
    pub name: String,
    pub result: Result<Conjugacy, Error>,
}

impl DatasetOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[DatasetOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

/// Load one source and compute it.
pub fn evaluate<S: PairSource + ?Sized>(
    source: &S,
    engine: &ConjugacyEngine,
) -> Result<Conjugacy, Error> {
    let pairs = source.load()?;
    let result = engine.compute(&pairs)?;
    Ok(result)
}

/// Evaluate every source on up to `workers` threads (0 = one per core).
///
/// Always returns exactly one outcome per source, in input order. A dataset
/// whose evaluation panics gets [`Error::Aborted`].
pub fn evaluate_all<S: PairSource + Sync>(
    sources: &[S],
    engine: &ConjugacyEngine,
    workers: usize,
) -> Vec<DatasetOutcome> {
    if sources.is_empty() {
        return Vec::new();
    }
    let workers = effective_workers(workers, sources.len());
    log::info!(
        "evaluating {} dataset(s) on {workers} worker(s)",
        sources.len()
    );

    let mut slots: Vec<Option<DatasetOutcome>> = Vec::with_capacity(sources.len());
    slots.resize_with(sources.len(), || None);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                s.spawn(move || {
                    sources
                        .iter()
                        .enumerate()
                        .skip(w)
                        .step_by(workers)
                        .map(|(idx, source)| (idx, run_guarded(source, engine)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(done) => {
                    for (idx, outcome) in done {
                        slots[idx] = Some(outcome);
                    }
                }
                Err(_) => log::error!("batch worker panicked"),
            }
        }
    });

    slots
        .into_iter()
        .zip(sources)
        .map(|(slot, source)| {
            slot.unwrap_or_else(|| DatasetOutcome {
                name: source.name().to_string(),
                result: Err(Error::Aborted("worker panicked".to_string())),
            })
        })
        .collect()
}

fn run_guarded<S: PairSource + ?Sized>(source: &S, engine: &ConjugacyEngine) -> DatasetOutcome {
    catch_unwind(AssertUnwindSafe(|| run_one(source, engine))).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic".to_string());
        let name = source.name().to_string();
        log::error!("{name}: evaluation panicked: {reason}");
        DatasetOutcome {
            name,
            result: Err(Error::Aborted(reason)),
        }
    })
}

fn run_one<S: PairSource + ?Sized>(source: &S, engine: &ConjugacyEngine) -> DatasetOutcome {
    let name = source.name().to_string();
    let result = evaluate(source, engine);
    match &result {
        Ok(r) => log::info!("{name}: n={} conjugacy={:.4}", r.n, r.conjugacy),
        Err(e) => log::warn!("{name}: {e}"),
    }
    DatasetOutcome { name, result }
}

fn effective_workers(requested: usize, jobs: usize) -> usize {
    let requested = if requested == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        requested
    };
    requested.clamp(1, jobs.max(1))
}
