//! Board Assembler (component C): turns a placement (mines, and for
//! space-supporting variants, spaces) into a numeric board.
//!
//! Generalized from a fixed 8-neighborhood `place_mines_random`/`calculate_numbers`
//! split to an arbitrary [`Adjacency`], and extended with the Offset (reversed
//! adjacency) and Chain (paired mines) placement rules from the original Python
//! generators.

use std::collections::BTreeSet;

use crate::error::GenError;
use crate::rng::SeededRng;
use crate::types::{cell, AdjacencyTable, Board, TilePosition};

/// Place mines from an ordered candidate sequence, incrementing clue counts
/// via `counting_table` (the variant's forward adjacency, or its reverse for
/// Offset variants — see [`crate::types::Adjacency::reversed`]).
pub fn place_mines(
    board: &mut Board,
    candidates: &[TilePosition],
    count: usize,
    counting_table: &AdjacencyTable,
) -> BTreeSet<TilePosition> {
    let mut mines = BTreeSet::new();
    for &pos in candidates {
        if mines.len() == count {
            break;
        }
        if board.get(pos) == cell::MINE {
            continue;
        }
        board.set(pos, cell::MINE);
        mines.insert(pos);
        for &n in counting_table.get(pos) {
            board.increment(n);
        }
    }
    mines
}

/// Place spaces from a candidate sequence that already excludes mines and
/// the start neighborhood. Spaces overwrite whatever clue value sat there.
pub fn place_spaces(
    board: &mut Board,
    candidates: &[TilePosition],
    count: usize,
    mines: &BTreeSet<TilePosition>,
) -> BTreeSet<TilePosition> {
    let mut spaces = BTreeSet::new();
    for &pos in candidates {
        if spaces.len() == count {
            break;
        }
        if mines.contains(&pos) {
            continue;
        }
        board.set(pos, cell::SPACE);
        spaces.insert(pos);
    }
    spaces
}

/// Place `count` mines (must be even) as orthogonally adjacent pairs, keeping
/// distinct chains isolated by excluding every orthogonal neighbor of a
/// placed pair from future candidates. Grounded on
/// `ChainBoardGenerator._generate_board`.
pub fn place_chain_mines(
    board: &mut Board,
    admissible: &BTreeSet<TilePosition>,
    count: usize,
    counting_table: &AdjacencyTable,
    orthogonal_table: &AdjacencyTable,
    rng: &mut SeededRng,
) -> Result<BTreeSet<TilePosition>, GenError> {
    debug_assert!(count % 2 == 0, "chain variant requires an even mine count");

    let mut mines: BTreeSet<TilePosition> = BTreeSet::new();
    let mut safes: BTreeSet<TilePosition> = BTreeSet::new();

    while mines.len() < count {
        let mut loc_safes: BTreeSet<TilePosition> = BTreeSet::new();
        let (mine_one, mine_two) = loop {
            let exclude_one: BTreeSet<TilePosition> =
                mines.union(&safes).chain(loc_safes.iter()).copied().collect();
            let pool_one: Vec<TilePosition> =
                admissible.difference(&exclude_one).copied().collect();
            let mine_one = *rng.choose(&pool_one).map_err(|_| GenError::Infeasible {
                available: 0,
                requested: count - mines.len(),
            })?;

            let orth_one: BTreeSet<TilePosition> =
                orthogonal_table.get(mine_one).iter().copied().collect();
            let exclude_two: BTreeSet<TilePosition> =
                mines.union(&safes).chain(loc_safes.iter()).copied().collect();
            let pool_two: Vec<TilePosition> =
                orth_one.difference(&exclude_two).copied().collect();

            match rng.choose(&pool_two) {
                Ok(&mine_two) => break (mine_one, mine_two),
                Err(_) => {
                    loc_safes.insert(mine_one);
                    continue;
                }
            }
        };

        safes.extend(loc_safes);
        for &m in &[mine_one, mine_two] {
            mines.insert(m);
            board.set(m, cell::MINE);
        }
        safes.extend(orthogonal_table.get(mine_one).iter().copied());
        safes.extend(orthogonal_table.get(mine_two).iter().copied());

        for &m in &[mine_one, mine_two] {
            for &n in counting_table.get(m) {
                board.increment(n);
            }
        }
    }

    Ok(mines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::candidates;
    use crate::types::Adjacency;

    #[test]
    fn placing_mines_leaves_exact_count_and_nonnegative_clues() {
        let table = AdjacencyTable::new(6, 6, &Adjacency::standard());
        let mut rng = SeededRng::new("seed", 0);
        let cands = candidates(6, 6, &table, Some((0, 0)), &BTreeSet::new(), &BTreeSet::new(), 5, &mut rng, 0)
            .unwrap();
        let mut board = Board::zeroed(6, 6);
        let mines = place_mines(&mut board, &cands, 5, &table);
        assert_eq!(mines.len(), 5);
        for pos in board.positions() {
            if !mines.contains(&pos) {
                assert!(board.get(pos) >= 0);
            }
        }
    }

    #[test]
    fn spaces_overwrite_clues_but_not_mines() {
        let table = AdjacencyTable::new(6, 6, &Adjacency::standard());
        let mut rng = SeededRng::new("seed", 1);
        let mine_cands =
            candidates(6, 6, &table, Some((0, 0)), &BTreeSet::new(), &BTreeSet::new(), 3, &mut rng, 0).unwrap();
        let mut board = Board::zeroed(6, 6);
        let mines = place_mines(&mut board, &mine_cands, 3, &table);

        let space_cands =
            candidates(6, 6, &table, Some((0, 0)), &BTreeSet::new(), &mines, 3, &mut rng, 0).unwrap();
        let spaces = place_spaces(&mut board, &space_cands, 3, &mines);
        assert_eq!(spaces.len(), 3);
        for s in &spaces {
            assert_eq!(board.get(*s), cell::SPACE);
        }
        assert!(mines.is_disjoint(&spaces));
    }

    #[test]
    fn chain_mines_are_pairwise_orthogonally_adjacent() {
        let table = AdjacencyTable::new(8, 8, &Adjacency::standard());
        let orth = AdjacencyTable::new(8, 8, &Adjacency::orthogonal());
        let mut rng = SeededRng::new("ChainSeed1", 0);
        let admissible: BTreeSet<TilePosition> = (0..8)
            .flat_map(|r| (0..8).map(move |c| (r, c)))
            .filter(|&p| p != (0, 0))
            .collect();
        let mut board = Board::zeroed(8, 8);
        let mines = place_chain_mines(&mut board, &admissible, 8, &table, &orth, &mut rng).unwrap();
        assert_eq!(mines.len(), 8);
        for &m in &mines {
            let partner_exists = orth.get(m).iter().any(|n| mines.contains(n));
            assert!(partner_exists, "mine {:?} has no orthogonal partner", m);
        }
    }
}
