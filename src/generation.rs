//! Generation Loop (component F): iterates candidate placement and solving,
//! applying the count-based partial/full reset cadence, until a solvable
//! board is found or the run is cancelled or exhausted.
//!
//! Grounded on `original_source/MainPrograms/BoardGeneratorPrograms/BoardGenerator.py`
//! (`generate_no_guess_board`'s reset cadence), reusing the generate-then-verify
//! retry shape of a `generate_solvable_board`-style loop.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::board::{place_chain_mines, place_mines, place_spaces};
use crate::candidate::candidates;
use crate::error::GenError;
use crate::params::{GenerationParams, Variant};
use crate::puzzle;
use crate::rng::SeededRng;
use crate::solver::{self, SolverConfig};
use crate::types::{Adjacency, AdjacencyTable, Board, TilePosition};

/// The board (and, for puzzle variants, the pre-revealed tile set) produced
/// by one successful generation request.
pub struct GenerationOutcome {
    pub board: Board,
    pub revealed: Option<BTreeSet<TilePosition>>,
    pub seed: String,
}

fn start_neighborhood(start: TilePosition, table: &AdjacencyTable) -> BTreeSet<TilePosition> {
    std::iter::once(start).chain(table.get(start).iter().copied()).collect()
}

/// Assemble one candidate board for `variant`, returning it alongside the
/// initial solver frontier and the space placement (threaded back to the
/// caller so it can be carried forward across generation-loop attempts, the
/// same way `includes` carries forward solved mines).
fn assemble(
    variant: Variant,
    params: &GenerationParams,
    table: &AdjacencyTable,
    orth: &AdjacencyTable,
    reversed_table: &AdjacencyTable,
    includes: &BTreeSet<TilePosition>,
    space_includes: &BTreeSet<TilePosition>,
    rng: &mut SeededRng,
    worker_index: usize,
) -> Result<Option<(Board, BTreeSet<TilePosition>, BTreeSet<TilePosition>)>, GenError> {
    let (width, height) = (params.width, params.height);
    let start = if variant.is_puzzle() { None } else { params.start };

    let mut board = Board::zeroed(width, height);

    let mines = if variant == Variant::Chain {
        let pool = candidates(
            width,
            height,
            table,
            start,
            &BTreeSet::new(),
            &BTreeSet::new(),
            params.mines,
            rng,
            worker_index,
        )?;
        let admissible: BTreeSet<TilePosition> = pool.into_iter().collect();
        place_chain_mines(&mut board, &admissible, params.mines, table, orth, rng)?
    } else {
        let counting_table = if variant.is_offset() { reversed_table } else { table };
        let cands = candidates(width, height, table, start, includes, &BTreeSet::new(), params.mines, rng, worker_index)?;
        place_mines(&mut board, &cands, params.mines, counting_table)
    };

    let spaces = if params.spaces > 0 {
        let space_cands = candidates(
            width,
            height,
            table,
            start,
            space_includes,
            &mines,
            params.spaces,
            rng,
            worker_index,
        )?;
        place_spaces(&mut board, &space_cands, params.spaces, &mines)
    } else {
        BTreeSet::new()
    };

    let initial_revealed = if variant.is_puzzle() {
        let target = puzzle::target_cap(params.difficulty, width, height);
        match puzzle::reveal_initial(&board, table, rng, target)? {
            Some(revealed) => revealed,
            None => return Ok(None),
        }
    } else {
        start_neighborhood(start.expect("non-puzzle variants are validated to carry a start"), table)
    };

    Ok(Some((board, initial_revealed, spaces)))
}

/// Run the Generation Loop once to completion for one `(variant, params,
/// seed, worker_index)` combination. `cancelled`, if provided, is polled at
/// the top of every outer iteration (the Race Controller's cooperative
/// cancellation point); `iteration_budget` caps the number of attempts
/// before giving up with [`GenError::SolverExhausted`].
pub fn generate_once(
    variant: Variant,
    params: &GenerationParams,
    seed: &str,
    worker_index: usize,
    cancelled: Option<&AtomicBool>,
    iteration_budget: Option<u64>,
) -> Result<GenerationOutcome, GenError> {
    let adjacency = params.validate(variant)?;
    let table = AdjacencyTable::new(params.width, params.height, &adjacency);
    let orth = AdjacencyTable::new(params.width, params.height, &Adjacency::orthogonal());
    let reversed_table = AdjacencyTable::new(params.width, params.height, &adjacency.reversed());
    let mut rng = SeededRng::new(seed, worker_index);

    let config = SolverConfig {
        use_one_two: !variant.is_offset(),
        chain_mode: variant == Variant::Chain,
    };

    let mut includes: BTreeSet<TilePosition> = BTreeSet::new();
    // Carries the space placement forward across every attempt, including a full
    // reset: the original only resets the board/mine positions on count == 3, never
    // the spaces.
    let mut space_includes: BTreeSet<TilePosition> = BTreeSet::new();
    let mut count = 0u32;
    let mut iterations: u64 = 0;

    loop {
        if let Some(flag) = cancelled {
            if flag.load(Ordering::SeqCst) {
                return Err(GenError::Cancelled);
            }
        }
        if let Some(budget) = iteration_budget {
            if iterations >= budget {
                return Err(GenError::SolverExhausted { iterations });
            }
        }
        iterations += 1;

        if count == 3 {
            log::debug!("generation full reset at iteration {iterations}");
            includes.clear();
            count = 0;
        } else {
            count += 1;
        }

        let Some((board, initial_revealed, spaces)) = assemble(
            variant,
            params,
            &table,
            &orth,
            &reversed_table,
            &includes,
            &space_includes,
            &mut rng,
            worker_index,
        )?
        else {
            // Puzzle revealer ran dry before reaching its cap; force a full reset.
            includes.clear();
            count = 0;
            continue;
        };
        space_includes = spaces;

        let outcome = solver::solve(&board, &table, &orth, params.mines, &initial_revealed, config);

        if outcome.solvable {
            if let Some(flag) = cancelled {
                if flag.load(Ordering::SeqCst) {
                    return Err(GenError::Cancelled);
                }
            }
            let revealed = if variant.is_puzzle() {
                let mut revealed = initial_revealed;
                let target = puzzle::target_cap(params.difficulty, params.width, params.height);
                puzzle::reveal_additional(&board, &mut rng, &mut revealed, target)?;
                Some(revealed)
            } else {
                None
            };
            log::info!("generation succeeded after {iterations} iteration(s)");
            return Ok(GenerationOutcome {
                board,
                revealed,
                seed: seed.to_string(),
            });
        }

        includes = outcome.mines_found;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_params() -> GenerationParams {
        GenerationParams {
            width: 6,
            height: 6,
            mines: 4,
            spaces: 0,
            start: Some((2, 2)),
            difficulty: 1,
            offsets: None,
        }
    }

    #[test]
    fn standard_generation_produces_solvable_board() {
        let params = standard_params();
        let outcome = generate_once(Variant::Standard, &params, "TEST000001", 0, None, Some(500)).unwrap();
        assert_eq!(outcome.board.cells.iter().filter(|&&c| c == crate::types::cell::MINE).count(), 4);
        assert_eq!(outcome.board.get((2, 2)), 0);
        assert!(outcome.revealed.is_none());
    }

    #[test]
    fn chain_generation_pairs_every_mine() {
        let mut params = standard_params();
        params.mines = 4;
        let outcome = generate_once(Variant::Chain, &params, "ChainSeed1", 0, None, Some(500)).unwrap();
        let orth = AdjacencyTable::new(params.width, params.height, &Adjacency::orthogonal());
        let mines: Vec<TilePosition> = outcome
            .board
            .positions()
            .filter(|&p| outcome.board.get(p) == crate::types::cell::MINE)
            .collect();
        assert_eq!(mines.len(), 4);
        for &m in &mines {
            assert!(orth.get(m).iter().any(|n| mines.contains(n)));
        }
    }

    #[test]
    fn space_variant_places_both_mines_and_spaces() {
        let mut params = standard_params();
        params.spaces = 3;
        let outcome = generate_once(Variant::Space, &params, "SpaceSeed1", 0, None, Some(500)).unwrap();
        let mines = outcome.board.cells.iter().filter(|&&c| c == crate::types::cell::MINE).count();
        let spaces = outcome.board.cells.iter().filter(|&&c| c == crate::types::cell::SPACE).count();
        assert_eq!(mines, 4);
        assert_eq!(spaces, 3);
    }

    #[test]
    fn puzzle_variant_reveals_exactly_the_target_cardinality() {
        let mut params = standard_params();
        params.start = None;
        params.spaces = 0;
        params.difficulty = 1;
        let outcome = generate_once(Variant::Puzzle, &params, "PuzzleSeed1", 0, None, Some(2000)).unwrap();
        let target = puzzle::target_cap(params.difficulty, params.width, params.height);
        let revealed = outcome.revealed.expect("puzzle variants return a revealed set");
        assert_eq!(revealed.len(), target);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let params = standard_params();
        let a = generate_once(Variant::Standard, &params, "TEST000001", 0, None, Some(500)).unwrap();
        let b = generate_once(Variant::Standard, &params, "TEST000001", 0, None, Some(500)).unwrap();
        assert_eq!(a.board.cells, b.board.cells);
    }

    #[test]
    fn exhausted_budget_surfaces_as_error() {
        let params = standard_params();
        let result = generate_once(Variant::Standard, &params, "TEST000001", 0, None, Some(0));
        assert!(matches!(result, Err(GenError::SolverExhausted { .. })));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn seed_strategy() -> impl Strategy<Value = String> {
            "[A-Za-z0-9]{1,10}"
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]

            /// Every revealed clue equals the number of mines among its forward-adjacency
            /// neighbors, regardless of which counting table the assembler used to place them.
            #[test]
            fn clue_values_match_mine_adjacency_under_forward_table(seed in seed_strategy()) {
                let params = standard_params();
                let result = generate_once(Variant::Standard, &params, &seed, 0, None, Some(2000));
                prop_assume!(result.is_ok());
                let outcome = result.unwrap();
                let table = AdjacencyTable::new(params.width, params.height, &Adjacency::standard());
                for pos in outcome.board.positions() {
                    let value = outcome.board.get(pos);
                    if value >= 0 {
                        let mine_neighbors = table
                            .get(pos)
                            .iter()
                            .filter(|&&n| outcome.board.get(n) == crate::types::cell::MINE)
                            .count() as i8;
                        prop_assert_eq!(value, mine_neighbors);
                    }
                }
            }

            #[test]
            fn mine_count_matches_requested_exactly(seed in seed_strategy()) {
                let params = standard_params();
                let result = generate_once(Variant::Standard, &params, &seed, 0, None, Some(2000));
                prop_assume!(result.is_ok());
                let outcome = result.unwrap();
                let mines = outcome.board.cells.iter().filter(|&&c| c == crate::types::cell::MINE).count();
                prop_assert_eq!(mines, params.mines);
            }

            #[test]
            fn same_seed_is_bit_identical_across_two_runs(seed in seed_strategy()) {
                let params = standard_params();
                let a = generate_once(Variant::Standard, &params, &seed, 0, None, Some(2000));
                let b = generate_once(Variant::Standard, &params, &seed, 0, None, Some(2000));
                prop_assert_eq!(a.is_ok(), b.is_ok());
                if let (Ok(a), Ok(b)) = (a, b) {
                    prop_assert_eq!(a.board.cells, b.board.cells);
                }
            }

            #[test]
            fn start_cell_always_resolves_to_zero(seed in seed_strategy()) {
                let params = standard_params();
                let result = generate_once(Variant::Standard, &params, &seed, 0, None, Some(2000));
                prop_assume!(result.is_ok());
                let outcome = result.unwrap();
                prop_assert_eq!(outcome.board.get(params.start.unwrap()), 0);
            }

            /// Chain-variant mines come only in isolated orthogonal pairs: each mine has
            /// exactly one orthogonal mine neighbor, never two (which would merge two pairs).
            #[test]
            fn chain_mines_form_isolated_pairs(seed in seed_strategy()) {
                let mut params = standard_params();
                params.mines = 4;
                let result = generate_once(Variant::Chain, &params, &seed, 0, None, Some(2000));
                prop_assume!(result.is_ok());
                let outcome = result.unwrap();
                let orth = AdjacencyTable::new(params.width, params.height, &Adjacency::orthogonal());
                for pos in outcome.board.positions() {
                    if outcome.board.get(pos) == crate::types::cell::MINE {
                        let mine_neighbors = orth
                            .get(pos)
                            .iter()
                            .filter(|&&n| outcome.board.get(n) == crate::types::cell::MINE)
                            .count();
                        prop_assert_eq!(mine_neighbors, 1);
                    }
                }
            }

            /// Puzzle variants always reveal exactly their difficulty/area-derived cap,
            /// never more and never less, on every successful generation.
            #[test]
            fn puzzle_reveals_exactly_the_target_cap(seed in seed_strategy()) {
                let mut params = standard_params();
                params.start = None;
                params.difficulty = 1;
                let result = generate_once(Variant::Puzzle, &params, &seed, 0, None, Some(4000));
                prop_assume!(result.is_ok());
                let outcome = result.unwrap();
                let target = puzzle::target_cap(params.difficulty, params.width, params.height);
                prop_assert_eq!(outcome.revealed.unwrap().len(), target);
            }
        }
    }
}
