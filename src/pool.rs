//! Worker Pool / Race Controller (component G): runs the Generation Loop on
//! several workers against the same seed (diverging by worker index), the
//! first to finish wins and cancels the rest.
//!
//! The source models this with a `multiprocessing.Event` and `mp.Queue`
//! pair (see `original_source/MainPrograms/main.py`, `Queue.py`); here it's
//! reimplemented as OS threads sharing an `AtomicBool` and an `mpsc` channel
//! rather than ported literally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use crate::error::GenError;
use crate::generation::{self, GenerationOutcome};
use crate::params::{GenerationParams, Variant};

/// Race `n_workers` (or, if 0, the host's available parallelism) independent
/// attempts at the same `(variant, params, seed)` against distinct worker
/// indices. The first worker to finish — successfully or with a genuine
/// error — sets the shared cancellation flag and publishes its result;
/// workers that observe cancellation mid-loop return nothing.
pub fn generate_race(
    variant: Variant,
    params: &GenerationParams,
    seed: &str,
    n_workers: usize,
) -> Result<GenerationOutcome, GenError> {
    let n_workers = if n_workers == 0 {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    } else {
        n_workers
    };

    let cancelled = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel::<Result<GenerationOutcome, GenError>>();

    std::thread::scope(|scope| {
        for worker_index in 0..n_workers {
            let tx = tx.clone();
            let cancelled = &cancelled;
            scope.spawn(move || {
                let result = generation::generate_once(variant, params, seed, worker_index, Some(cancelled), None);
                match result {
                    Err(GenError::Cancelled) => {
                        log::debug!("worker {worker_index} observed cancellation");
                    }
                    other => {
                        if !cancelled.swap(true, Ordering::SeqCst) {
                            log::info!("worker {worker_index} published the winning result");
                            let _ = tx.send(other);
                        } else {
                            log::debug!("worker {worker_index} lost the race, discarding its result");
                        }
                    }
                }
            });
        }
        drop(tx);
        rx.recv().unwrap_or(Err(GenError::Cancelled))
    })
}
