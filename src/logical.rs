//! Logical Solver (component E): the cheap combinatorial rules run before
//! falling back to the Matrix Solver.
//!
//! Grounded on `original_source/MainPrograms/Solvers/LogicalSolver.py`
//! (`_check_resolved_tile`, `_check_one_two_pattern`) and
//! `ChainLogicalSolver.py` (`_resolve_chain`).

use std::collections::BTreeSet;

use crate::matrix::{covered_neighbors, effective_value};
use crate::types::{cell, AdjacencyTable, Board, TilePosition};

#[derive(Default)]
pub struct LogicalResult {
    pub mines: BTreeSet<TilePosition>,
    pub safes: BTreeSet<TilePosition>,
}

impl LogicalResult {
    fn is_empty(&self) -> bool {
        self.mines.is_empty() && self.safes.is_empty()
    }

    fn merge(&mut self, other: LogicalResult) {
        self.mines.extend(other.mines);
        self.safes.extend(other.safes);
    }
}

/// Trivial resolution: a border cell whose covered neighbors exactly match
/// its effective value has them all as mines; a border cell with no
/// remaining effective mines has them all as safes.
fn trivial(working: &Board, table: &AdjacencyTable, borders: &BTreeSet<TilePosition>) -> LogicalResult {
    let mut out = LogicalResult::default();
    for &pos in borders {
        let covered = covered_neighbors(pos, working, table);
        if covered.is_empty() {
            continue;
        }
        let effective = effective_value(pos, working, table);
        if covered.len() as i64 == effective {
            out.mines.extend(covered);
        } else if effective == 0 {
            out.safes.extend(covered);
        }
    }
    out
}

/// The 1-2 pattern: orthogonally adjacent border cells with effective values
/// 2 and 1. When the "2" cell's covered neighbors minus the cells shared with
/// the "1" cell leaves exactly one tile, that tile is a mine and every
/// covered neighbor the "1" cell has that the "2" cell lacks is safe.
fn one_two_pattern(
    working: &Board,
    table: &AdjacencyTable,
    orthogonal: &AdjacencyTable,
    borders: &BTreeSet<TilePosition>,
) -> LogicalResult {
    let mut out = LogicalResult::default();
    for &c1 in borders {
        if effective_value(c1, working, table) != 2 {
            continue;
        }
        let cov1 = covered_neighbors(c1, working, table);
        for &c2 in orthogonal.get(c1) {
            if !borders.contains(&c2) || effective_value(c2, working, table) != 1 {
                continue;
            }
            let cov2 = covered_neighbors(c2, working, table);
            let unique_to_one: Vec<TilePosition> = cov1.difference(&cov2).copied().collect();
            if unique_to_one.len() == 1 {
                out.mines.insert(unique_to_one[0]);
                out.safes.extend(cov2.difference(&cov1).copied());
            }
        }
    }
    out
}

/// Chain pairing (Chain variant only): any already-known mine orthogonally
/// adjacent to another known mine forces every *other* orthogonal neighbor
/// of both to be safe.
pub fn chain_pairing(
    working: &Board,
    orthogonal: &AdjacencyTable,
    known_mines: &BTreeSet<TilePosition>,
) -> LogicalResult {
    let mut out = LogicalResult::default();
    for &m in known_mines {
        for &partner in orthogonal.get(m) {
            if !known_mines.contains(&partner) {
                continue;
            }
            for &other in orthogonal.get(m) {
                if other != partner && working.get(other) == cell::COVERED {
                    out.safes.insert(other);
                }
            }
            for &other in orthogonal.get(partner) {
                if other != m && working.get(other) == cell::COVERED {
                    out.safes.insert(other);
                }
            }
        }
    }
    out
}

/// Run every logical rule that applies to this mode once, returning the
/// union of everything deduced.
///
/// `use_one_two` is false for Offset variants: the 1-2 pattern assumes
/// orthogonal adjacency, which does not generalize to an arbitrary offset
/// set, matching `OffsetBoardSolver`'s override in the original.
pub fn pass(
    working: &Board,
    table: &AdjacencyTable,
    orthogonal: &AdjacencyTable,
    borders: &BTreeSet<TilePosition>,
    use_one_two: bool,
    chain_mode: bool,
    known_mines: &BTreeSet<TilePosition>,
) -> LogicalResult {
    let mut out = trivial(working, table, borders);
    if use_one_two {
        out.merge(one_two_pattern(working, table, orthogonal, borders));
    }
    if chain_mode {
        out.merge(chain_pairing(working, orthogonal, known_mines));
    }
    out
}

pub fn made_progress(result: &LogicalResult) -> bool {
    !result.is_empty()
}
