//! Core data types: the board grid, cell codes, and the adjacency table.
//!
//! All grid types use flat `Vec` storage with row-major layout:
//! `cells[row * width + col]`, matching the `(row, col)` addressing used
//! throughout this crate.

use serde::{Deserialize, Serialize};

/// A `(row, col)` coordinate into a [`Board`].
pub type TilePosition = (usize, usize);

/// Cell codes used on a [`Board`]. `0..=8` (outside this module, any
/// non-negative `i8`) means "revealed, this many adjacent mines."
pub mod cell {
    /// Covered, unknown to the solver.
    pub const COVERED: i8 = -2;
    /// A mine.
    pub const MINE: i8 = -1;
    /// Forbidden terrain: holds no mine, contributes to no adjacent count.
    pub const SPACE: i8 = -3;
    /// Solver-internal: a covered cell flagged as a deduced mine.
    pub const FLAG: i8 = -4;
    /// Puzzle-internal: a covered cell pre-revealed as safe before solving starts.
    pub const HINT_SAFE: i8 = -5;
}

/// A rectangular grid of cell codes, stored row-major.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<i8>,
}

impl Board {
    /// A board with every cell covered.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![cell::COVERED; width * height],
        }
    }

    /// A board with every cell set to 0 (used while assembling clue counts).
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    #[inline(always)]
    fn index(&self, pos: TilePosition) -> usize {
        pos.0 * self.width + pos.1
    }

    #[inline(always)]
    pub fn get(&self, pos: TilePosition) -> i8 {
        self.cells[self.index(pos)]
    }

    #[inline(always)]
    pub fn set(&mut self, pos: TilePosition, val: i8) {
        let idx = self.index(pos);
        self.cells[idx] = val;
    }

    #[inline(always)]
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Increment a clue cell's count, a no-op on mines/spaces/negative codes.
    #[inline(always)]
    pub fn increment(&mut self, pos: TilePosition) {
        let idx = self.index(pos);
        if self.cells[idx] >= 0 {
            self.cells[idx] += 1;
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = TilePosition> + '_ {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| (row, col)))
    }
}

/// A set of relative offsets defining which cells are "adjacent" for the
/// purposes of clue counting and solving. Excludes `(0, 0)`.
#[derive(Clone, Debug)]
pub struct Adjacency(Vec<(i32, i32)>);

impl Adjacency {
    /// The standard 8-neighborhood.
    pub fn standard() -> Self {
        let mut offsets = Vec::with_capacity(8);
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr != 0 || dc != 0 {
                    offsets.push((dr, dc));
                }
            }
        }
        Self(offsets)
    }

    /// The four orthogonal neighbors, used by Chain-mode pairing and 1-2 pattern matching.
    pub fn orthogonal() -> Self {
        Self(vec![(1, 0), (-1, 0), (0, 1), (0, -1)])
    }

    /// A caller-supplied offset set, used by Offset variants. Rejects an empty set
    /// or one containing `(0, 0)`.
    pub fn custom(offsets: Vec<(i32, i32)>) -> Option<Self> {
        if offsets.is_empty() || offsets.iter().any(|&(dr, dc)| dr == 0 && dc == 0) {
            return None;
        }
        Some(Self(offsets))
    }

    /// The offset set with every direction negated: a mine at `m` is adjacent to
    /// clue `c` under `D` iff `c` is adjacent to `m` under `D.reversed()`.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().map(|&(dr, dc)| (-dr, -dc)).collect())
    }

    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.0
    }

    /// True if every cell of a `radius x radius` centered grid is reachable from the
    /// center by repeated application of these offsets (plus their inverses), which is
    /// the connectivity precondition Offset variants must satisfy.
    pub fn is_connected(&self, radius: i32) -> bool {
        use std::collections::{HashSet, VecDeque};
        let mut steps: Vec<(i32, i32)> = self.0.clone();
        for &(dr, dc) in &self.0 {
            steps.push((-dr, -dc));
        }
        let mut seen: HashSet<(i32, i32)> = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert((0, 0));
        queue.push_back((0, 0));
        while let Some((r, c)) = queue.pop_front() {
            for &(dr, dc) in &steps {
                let (nr, nc) = (r + dr, c + dc);
                if nr.abs() <= radius && nc.abs() <= radius && seen.insert((nr, nc)) {
                    queue.push_back((nr, nc));
                }
            }
        }
        let side = (2 * radius + 1) as usize;
        seen.len() == side * side
    }
}

/// Pre-computed neighbor lists for every cell of a fixed-size board under a fixed
/// [`Adjacency`]. Built once per board and shared by the assembler and both solvers.
pub struct AdjacencyTable {
    width: usize,
    height: usize,
    data: Vec<TilePosition>,
    offsets: Vec<usize>,
}

impl AdjacencyTable {
    pub fn new(width: usize, height: usize, adjacency: &Adjacency) -> Self {
        let total = width * height;
        let mut data = Vec::with_capacity(total * adjacency.offsets().len());
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..height {
            for col in 0..width {
                offsets.push(data.len());
                for &(dr, dc) in adjacency.offsets() {
                    let nr = row as i32 + dr;
                    let nc = col as i32 + dc;
                    if nr >= 0 && nr < height as i32 && nc >= 0 && nc < width as i32 {
                        data.push((nr as usize, nc as usize));
                    }
                }
            }
        }
        offsets.push(data.len());

        Self {
            width,
            height,
            data,
            offsets,
        }
    }

    #[inline(always)]
    fn index(&self, pos: TilePosition) -> usize {
        pos.0 * self.width + pos.1
    }

    #[inline(always)]
    pub fn get(&self, pos: TilePosition) -> &[TilePosition] {
        let idx = self.index(pos);
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.data[start..end]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}
