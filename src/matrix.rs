//! Matrix Solver (component D): extracts the border frontier, builds the
//! linear system of clue constraints over the covered tiles, row-reduces it
//! exactly, and reads off forced mines/safes from bound analysis.
//!
//! Grounded on `original_source/MainPrograms/Solvers/MatrixSolver.py` for the
//! row/bound semantics (effective value, global minecount row, bottom-up
//! bound sweep), with the overall RREF/bound-analysis shape carried over from
//! a prior float-based Gaussian elimination solver. Every entry here is an
//! exact [`crate::rational::Rational`] instead of a float with ad hoc
//! integer coercion, so row reduction and bound comparisons never drift.
//!
//! Border extraction here is a full recompute each call rather than the
//! incremental add/remove the original describes, since both produce the
//! identical set and a recompute is far simpler to get right; see
//! `DESIGN.md`.

use std::collections::BTreeSet;

use crate::rational::Rational;
use crate::types::{cell, AdjacencyTable, Board, TilePosition};

/// One row of the constraint system: `sum(vars) = rhs`, all coefficients
/// implicitly 1 before reduction.
#[derive(Clone)]
pub struct Equation {
    pub vars: BTreeSet<TilePosition>,
    pub rhs: i64,
}

/// The outcome of one matrix-solving pass.
#[derive(Default)]
pub struct MatrixResult {
    pub mines: BTreeSet<TilePosition>,
    pub safes: BTreeSet<TilePosition>,
}

/// Numbered cells with at least one covered neighbor.
pub fn border_tiles(working: &Board, table: &AdjacencyTable) -> BTreeSet<TilePosition> {
    working
        .positions()
        .filter(|&pos| working.get(pos) >= 0)
        .filter(|&pos| table.get(pos).iter().any(|&n| working.get(n) == cell::COVERED))
        .collect()
}

/// All currently covered (unresolved) tiles.
pub fn covered_tiles(working: &Board) -> BTreeSet<TilePosition> {
    working.positions().filter(|&pos| working.get(pos) == cell::COVERED).collect()
}

/// A clue's value minus the number of its already-flagged adjacent mines.
pub(crate) fn effective_value(pos: TilePosition, working: &Board, table: &AdjacencyTable) -> i64 {
    let value = working.get(pos) as i64;
    let flagged = table.get(pos).iter().filter(|&&n| working.get(n) == cell::FLAG).count() as i64;
    value - flagged
}

pub(crate) fn covered_neighbors(pos: TilePosition, working: &Board, table: &AdjacencyTable) -> BTreeSet<TilePosition> {
    table
        .get(pos)
        .iter()
        .copied()
        .filter(|&n| working.get(n) == cell::COVERED)
        .collect()
}

/// Build one equation per border cell, plus an optional global minecount row
/// when every remaining covered tile borders a clue.
pub fn build_equations(
    working: &Board,
    table: &AdjacencyTable,
    borders: &BTreeSet<TilePosition>,
    total_mines: usize,
    extra: &[Equation],
) -> Vec<Equation> {
    let mut equations: Vec<Equation> = borders
        .iter()
        .map(|&pos| Equation {
            vars: covered_neighbors(pos, working, table),
            rhs: effective_value(pos, working, table),
        })
        .collect();
    equations.extend(extra.iter().cloned());

    let covered = covered_tiles(working);
    let vars: BTreeSet<TilePosition> = equations.iter().flat_map(|e| e.vars.iter().copied()).collect();
    if !vars.is_empty() && covered == vars {
        let flagged = working.cells.iter().filter(|&&c| c == cell::FLAG).count();
        let remaining = total_mines as i64 - flagged as i64;
        equations.push(Equation { vars, rhs: remaining });
    }

    equations
}

/// Row-reduce the system and extract forced mines/safes via bound analysis.
/// `known_mines`/`known_safes` seed variables already classified by the
/// logical solver or a prior matrix pass in the same iteration; they are
/// folded into every row's bound instead of treated as free.
pub fn solve(
    equations: &[Equation],
    known_mines: &BTreeSet<TilePosition>,
    known_safes: &BTreeSet<TilePosition>,
) -> MatrixResult {
    if equations.is_empty() {
        return MatrixResult::default();
    }

    let var_list: Vec<TilePosition> = {
        let mut vars: BTreeSet<TilePosition> = equations.iter().flat_map(|e| e.vars.iter().copied()).collect();
        vars.retain(|v| !known_mines.contains(v) && !known_safes.contains(v));
        vars.into_iter().collect()
    };
    if var_list.is_empty() {
        return MatrixResult::default();
    }
    let col_index: std::collections::HashMap<TilePosition, usize> =
        var_list.iter().enumerate().map(|(i, &p)| (p, i)).collect();

    let ncols = var_list.len() + 1;
    let mut matrix: Vec<Vec<Rational>> = equations
        .iter()
        .map(|eq| {
            let mut row = vec![Rational::ZERO; ncols];
            let mut rhs = Rational::from_int(eq.rhs);
            for &v in &eq.vars {
                if known_mines.contains(&v) {
                    rhs = rhs - Rational::ONE;
                } else if known_safes.contains(&v) {
                    // contributes 0
                } else if let Some(&c) = col_index.get(&v) {
                    row[c] = Rational::ONE;
                }
            }
            row[ncols - 1] = rhs;
            row
        })
        .collect();

    reduce_to_row_echelon(&mut matrix, var_list.len());

    let mut mines: BTreeSet<TilePosition> = BTreeSet::new();
    let mut safes: BTreeSet<TilePosition> = BTreeSet::new();

    for row in matrix.iter().rev() {
        let rhs = row[ncols - 1];
        let mut low = Rational::ZERO;
        let mut high = Rational::ZERO;
        let mut free: Vec<(usize, Rational)> = Vec::new();

        for (c, &coeff) in row[..var_list.len()].iter().enumerate() {
            if coeff.is_zero() {
                continue;
            }
            let var = var_list[c];
            if mines.contains(&var) {
                low = low + coeff;
                high = high + coeff;
            } else if safes.contains(&var) {
                // contributes 0 to both bounds
            } else if coeff.is_negative() {
                low = low + coeff;
                free.push((c, coeff));
            } else {
                high = high + coeff;
                free.push((c, coeff));
            }
        }

        if free.is_empty() {
            continue;
        }
        if rhs == low {
            for &(c, coeff) in &free {
                let var = var_list[c];
                if coeff.is_positive() {
                    safes.insert(var);
                } else {
                    mines.insert(var);
                }
            }
        } else if rhs == high {
            for &(c, coeff) in &free {
                let var = var_list[c];
                if coeff.is_positive() {
                    mines.insert(var);
                } else {
                    safes.insert(var);
                }
            }
        }
    }

    MatrixResult { mines, safes }
}

/// Forward-then-backward Gaussian elimination with partial pivoting on
/// magnitude, exact throughout.
fn reduce_to_row_echelon(matrix: &mut [Vec<Rational>], nvars: usize) {
    let nrows = matrix.len();
    let mut pivot_row = 0;

    for col in 0..nvars {
        if pivot_row >= nrows {
            break;
        }
        let Some(best) = (pivot_row..nrows).max_by_key(|&r| {
            let v = matrix[r][col];
            if v.is_negative() { -v } else { v }
        }) else {
            continue;
        };
        if matrix[best][col].is_zero() {
            continue;
        }
        matrix.swap(pivot_row, best);

        let pivot_val = matrix[pivot_row][col];
        let inv = pivot_val.reciprocal();
        for cell in matrix[pivot_row].iter_mut() {
            *cell = *cell * inv;
        }

        for r in 0..nrows {
            if r == pivot_row {
                continue;
            }
            let factor = matrix[r][col];
            if factor.is_zero() {
                continue;
            }
            for c in 0..matrix[r].len() {
                matrix[r][c] = matrix[r][c] - factor * matrix[pivot_row][c];
            }
        }

        pivot_row += 1;
    }
}
