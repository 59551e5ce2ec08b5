//! No-guess Minesweeper board generation and solving.
//!
//! Generates rectangular boards where the opening reveal, together with a
//! pure logical+matrix deduction solver, is always sufficient to clear the
//! board without a guess. See [`generate`] and [`generate_race`] for the
//! public entry points and [`Variant`] for the supported generation modes.

pub mod board;
pub mod candidate;
pub mod error;
pub mod generation;
pub mod logical;
pub mod matrix;
pub mod params;
pub mod pool;
pub mod puzzle;
pub mod rational;
pub mod rng;
pub mod solver;
pub mod types;

pub use error::GenError;
pub use generation::GenerationOutcome;
pub use params::{GenerationParams, Variant};
pub use types::{Board, TilePosition};

/// Generate one board on the current thread.
///
/// `seed` may be empty, in which case a fresh seed is drawn from system
/// entropy and returned on [`GenerationOutcome::seed`] for the caller to log
/// or persist for replay.
pub fn generate(variant: Variant, params: &GenerationParams, seed: &str) -> Result<GenerationOutcome, GenError> {
    let resolved_seed = rng::resolve_seed(seed)?;
    generation::generate_once(variant, params, &resolved_seed, 0, None, None)
}

/// Generate one board, giving up with [`GenError::SolverExhausted`] after
/// `iteration_budget` generate/solve attempts instead of retrying forever.
pub fn generate_with_budget(
    variant: Variant,
    params: &GenerationParams,
    seed: &str,
    iteration_budget: u64,
) -> Result<GenerationOutcome, GenError> {
    let resolved_seed = rng::resolve_seed(seed)?;
    generation::generate_once(variant, params, &resolved_seed, 0, None, Some(iteration_budget))
}

/// Race `n_workers` independent attempts (or, if `n_workers == 0`, one per
/// available core) at the same request; the first to finish wins and
/// cancels the rest. See [`pool::generate_race`].
pub fn generate_race(
    variant: Variant,
    params: &GenerationParams,
    seed: &str,
    n_workers: usize,
) -> Result<GenerationOutcome, GenError> {
    let resolved_seed = rng::resolve_seed(seed)?;
    pool::generate_race(variant, params, &resolved_seed, n_workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(variant: Variant) -> GenerationParams {
        GenerationParams {
            width: 8,
            height: 8,
            mines: 6,
            spaces: 0,
            start: if matches!(variant, Variant::Puzzle | Variant::OffsetPuzzle) {
                None
            } else {
                Some((4, 4))
            },
            difficulty: 2,
            offsets: None,
        }
    }

    #[test]
    fn empty_seed_is_resolved_and_returned() {
        let outcome = generate(Variant::Standard, &params(Variant::Standard), "").unwrap();
        assert!(!outcome.seed.is_empty());
    }

    #[test]
    fn invalid_seed_is_rejected_before_generation_starts() {
        let result = generate(Variant::Standard, &params(Variant::Standard), "way too long a seed");
        assert!(matches!(result, Err(GenError::InvalidSeed(_))));
    }

    #[test]
    fn race_and_single_threaded_generation_agree_on_board_shape() {
        let p = params(Variant::Standard);
        let solo = generate(Variant::Standard, &p, "ShapeSeed1").unwrap();
        let raced = generate_race(Variant::Standard, &p, "ShapeSeed2", 2).unwrap();
        assert_eq!(solo.board.width, raced.board.width);
        assert_eq!(solo.board.height, raced.board.height);
    }
}
