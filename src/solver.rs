//! The unified Solver capability: alternates the Logical Solver and the
//! Matrix Solver over a working copy of the board until either everything
//! is deduced or both make no progress.
//!
//! A single parameterized function replaces the source's
//! `MatrixSolver -> LogicalSolver -> ChainLogicalSolver` /
//! `-> SpaceBoardLogicalSolver -> OffsetBoardSolver -> PuzzleSolver` class
//! hierarchy: the mode differences collapse to two booleans (`use_one_two`,
//! `chain_mode`) plus which cells start revealed.

use std::collections::{BTreeSet, VecDeque};

use crate::logical;
use crate::matrix::{self, covered_neighbors, Equation};
use crate::types::{cell, AdjacencyTable, Board, TilePosition};

/// Mode flags distinguishing the six generation variants at the solver
/// level. Board shape and adjacency are carried by the two tables.
#[derive(Clone, Copy)]
pub struct SolverConfig {
    /// False for Offset/OffsetPuzzle: the 1-2 pattern needs orthogonal
    /// adjacency, which an arbitrary offset set does not guarantee.
    pub use_one_two: bool,
    /// True for Chain: enables chain-pairing deduction and the per-unpaired-
    /// mine matrix rows.
    pub chain_mode: bool,
}

pub struct SolveOutcome {
    pub mines_found: BTreeSet<TilePosition>,
    pub solvable: bool,
}

/// Reveal `pos` on the working board from the answer board, cascading
/// through connected zero-value cells the way an interactive reveal would.
fn reveal(working: &mut Board, answer: &Board, table: &AdjacencyTable, pos: TilePosition) {
    if working.get(pos) != cell::COVERED && working.get(pos) != cell::FLAG {
        return;
    }
    let mut queue = VecDeque::new();
    queue.push_back(pos);
    while let Some(p) = queue.pop_front() {
        let value = answer.get(p);
        if working.get(p) != cell::COVERED && working.get(p) != cell::FLAG {
            continue;
        }
        working.set(p, value);
        if value == 0 {
            for &n in table.get(p) {
                if working.get(n) == cell::COVERED {
                    queue.push_back(n);
                }
            }
        }
    }
}

fn unpaired_mine_equations(
    working: &Board,
    orthogonal: &AdjacencyTable,
    mines_found: &BTreeSet<TilePosition>,
) -> Vec<Equation> {
    mines_found
        .iter()
        .filter(|&&m| !orthogonal.get(m).iter().any(|n| mines_found.contains(n)))
        .map(|&m| Equation {
            vars: covered_neighbors(m, working, orthogonal),
            rhs: 1,
        })
        .collect()
}

/// Run the solver to completion (or exhaustion) starting from `initial_revealed`.
///
/// Space cells from `answer` are copied onto the working board up front,
/// since they are inert visible terrain, never covered tiles.
pub fn solve(
    answer: &Board,
    table: &AdjacencyTable,
    orthogonal: &AdjacencyTable,
    total_mines: usize,
    initial_revealed: &BTreeSet<TilePosition>,
    config: SolverConfig,
) -> SolveOutcome {
    let mut working = Board::new(answer.width, answer.height);
    for pos in answer.positions() {
        if answer.get(pos) == cell::SPACE {
            working.set(pos, cell::SPACE);
        }
    }
    for &pos in initial_revealed {
        reveal(&mut working, answer, table, pos);
    }

    let mut mines_found: BTreeSet<TilePosition> = BTreeSet::new();

    loop {
        let covered_remaining = matrix::covered_tiles(&working);
        if covered_remaining.is_empty() {
            return SolveOutcome {
                mines_found,
                solvable: true,
            };
        }

        let borders = matrix::border_tiles(&working, table);
        if borders.is_empty() {
            return SolveOutcome {
                mines_found,
                solvable: false,
            };
        }

        let logical_result = logical::pass(
            &working,
            table,
            orthogonal,
            &borders,
            config.use_one_two,
            config.chain_mode,
            &mines_found,
        );

        if logical::made_progress(&logical_result) {
            for pos in logical_result.mines {
                working.set(pos, cell::FLAG);
                mines_found.insert(pos);
            }
            for pos in logical_result.safes {
                reveal(&mut working, answer, table, pos);
            }
            continue;
        }

        let extra = if config.chain_mode {
            unpaired_mine_equations(&working, orthogonal, &mines_found)
        } else {
            Vec::new()
        };
        let equations = matrix::build_equations(&working, table, &borders, total_mines, &extra);
        let matrix_result = matrix::solve(&equations, &mines_found, &BTreeSet::new());

        if matrix_result.mines.is_empty() && matrix_result.safes.is_empty() {
            return SolveOutcome {
                mines_found,
                solvable: false,
            };
        }

        for pos in matrix_result.mines {
            working.set(pos, cell::FLAG);
            mines_found.insert(pos);
        }
        for pos in matrix_result.safes {
            reveal(&mut working, answer, table, pos);
        }
    }
}
