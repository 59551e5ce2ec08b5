//! Candidate Generator (component B): produces the ordered position stream
//! the Board Assembler draws mines (and, for space-supporting variants,
//! spaces) from.

use std::collections::BTreeSet;

use crate::error::GenError;
use crate::rng::SeededRng;
use crate::types::{AdjacencyTable, TilePosition};

/// Build the ordered candidate sequence for one placement pass.
///
/// `includes` are placed first (carried over from a prior partial reset, see
/// the Generation Loop); the remainder of the admissible positions follow in
/// shuffled order. `excludes` is enlarged here to cover the closed
/// neighborhood of `start` (when present) so the opening click always
/// resolves to a 0. `worker_index` scales the number of shuffle passes,
/// decorrelating workers that share a seed.
///
/// Sets are `BTreeSet`, not `HashSet`: std's default hasher is randomized per
/// process, so iterating a `HashSet` would silently break the determinism
/// this whole module exists to guarantee.
pub fn candidates(
    width: usize,
    height: usize,
    table: &AdjacencyTable,
    start: Option<TilePosition>,
    includes: &BTreeSet<TilePosition>,
    excludes: &BTreeSet<TilePosition>,
    required: usize,
    rng: &mut SeededRng,
    worker_index: usize,
) -> Result<Vec<TilePosition>, GenError> {
    let mut excludes = excludes.clone();
    if let Some(start) = start {
        excludes.insert(start);
        for &n in table.get(start) {
            excludes.insert(n);
        }
    }

    let mut extras: Vec<TilePosition> = Vec::new();
    for row in 0..height {
        for col in 0..width {
            let pos = (row, col);
            if !includes.contains(&pos) && !excludes.contains(&pos) {
                extras.push(pos);
            }
        }
    }

    let available = includes.len() + extras.len();
    if available < required {
        return Err(GenError::Infeasible {
            available,
            requested: required,
        });
    }

    log::trace!(
        "shuffling {} candidates {} time(s) for worker {worker_index}",
        extras.len(),
        worker_index + 1
    );
    for _ in 0..=worker_index {
        rng.shuffle(&mut extras);
    }

    let mut ordered: Vec<TilePosition> = includes.iter().copied().collect();
    ordered.extend(extras);
    Ok(ordered)
}
