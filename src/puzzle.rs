//! Puzzle Revealer (component H): for Puzzle/OffsetPuzzle variants, chooses
//! which tiles start pre-revealed so the partially visible board is the
//! Logical/Matrix Solver's initial frontier instead of a start-click
//! neighborhood.
//!
//! Grounded on `original_source/MainPrograms/BoardGeneratorPrograms/PuzzleBoardGenerator.py`
//! (`_add_tile`, the `tiles_required` cap formula).

use std::collections::BTreeSet;

use crate::error::GenError;
use crate::rng::SeededRng;
use crate::types::{cell, AdjacencyTable, Board, TilePosition};

/// `T = min(ceil(log10((d+1) * W * H)) * d, floor(W*H/5))`.
pub fn target_cap(difficulty: u8, width: usize, height: usize) -> usize {
    let area = (width * height) as f64;
    let log = (((difficulty as f64 + 1.0) * area).log10()).ceil().max(0.0) as usize;
    let scaled = log * difficulty as usize;
    let capped = (width * height) / 5;
    scaled.min(capped)
}

fn frame_cells(width: usize, height: usize) -> BTreeSet<TilePosition> {
    let mut out = BTreeSet::new();
    for col in 0..width {
        out.insert((0, col));
        out.insert((height - 1, col));
    }
    for row in 0..height {
        out.insert((row, 0));
        out.insert((row, width - 1));
    }
    out
}

/// Tiles that may never be revealed: the outer frame, mines, and spaces.
fn base_excluded(board: &Board) -> BTreeSet<TilePosition> {
    let mut excluded = frame_cells(board.width, board.height);
    for pos in board.positions() {
        let v = board.get(pos);
        if v == cell::MINE || v == cell::SPACE {
            excluded.insert(pos);
        }
    }
    excluded
}

/// Grow a revealed set by random-walk island growth up to `target` tiles.
/// Returns `None` if the board runs out of admissible tiles before reaching
/// `target`; the caller should treat this as "full reset needed".
pub fn reveal_initial(
    board: &Board,
    table: &AdjacencyTable,
    rng: &mut SeededRng,
    target: usize,
) -> Result<Option<BTreeSet<TilePosition>>, GenError> {
    let excluded_base = base_excluded(board);
    let mut revealed: BTreeSet<TilePosition> = BTreeSet::new();
    let mut frontier: BTreeSet<TilePosition> = BTreeSet::new();

    while revealed.len() < target {
        let admissible = |p: &TilePosition| !excluded_base.contains(p) && !revealed.contains(p);

        let candidate = {
            let from_frontier: Vec<TilePosition> = frontier.iter().copied().filter(admissible).collect();
            if !from_frontier.is_empty() {
                from_frontier
            } else {
                board.positions().filter(|p| admissible(p)).collect()
            }
        };
        if candidate.is_empty() {
            return Ok(None);
        }
        let chosen = *rng.choose(&candidate)?;
        revealed.insert(chosen);
        frontier.remove(&chosen);
        for &n in table.get(chosen) {
            if !excluded_base.contains(&n) && !revealed.contains(&n) {
                frontier.insert(n);
            }
        }
    }

    Ok(Some(revealed))
}

/// After a successful solve, reveal additional safe, non-frame tiles up to
/// `target` "to ease play," mirroring the tail of `generate_no_guess_board`.
pub fn reveal_additional(
    board: &Board,
    rng: &mut SeededRng,
    revealed: &mut BTreeSet<TilePosition>,
    target: usize,
) -> Result<(), GenError> {
    let excluded = base_excluded(board);
    loop {
        if revealed.len() >= target {
            return Ok(());
        }
        let pool: Vec<TilePosition> = board
            .positions()
            .filter(|p| !excluded.contains(p) && !revealed.contains(p))
            .collect();
        if pool.is_empty() {
            return Ok(());
        }
        let chosen = *rng.choose(&pool)?;
        revealed.insert(chosen);
    }
}
