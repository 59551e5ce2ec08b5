//! Public configuration surface: which generation variant, board shape, and
//! the density/connectivity preconditions each variant imposes.

use crate::error::GenError;
use crate::types::{Adjacency, TilePosition};

/// Minimum/maximum board side length and the area cap, per the external
/// interface contract.
const MIN_SIDE: usize = 5;
const MAX_SIDE: usize = 99;
const MAX_AREA: usize = 9801;

/// Which of the six generation modes to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Variant {
    Standard,
    Chain,
    Offset,
    OffsetPuzzle,
    Puzzle,
    Space,
}

impl Variant {
    pub fn is_puzzle(self) -> bool {
        matches!(self, Variant::Puzzle | Variant::OffsetPuzzle)
    }

    pub fn is_offset(self) -> bool {
        matches!(self, Variant::Offset | Variant::OffsetPuzzle)
    }

    pub fn supports_spaces(self) -> bool {
        matches!(
            self,
            Variant::Space | Variant::Puzzle | Variant::OffsetPuzzle | Variant::Offset
        )
    }
}

/// Configuration for one generation request.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GenerationParams {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    /// Only meaningful for variants where [`Variant::supports_spaces`] is true.
    pub spaces: usize,
    /// Required for non-puzzle variants; ignored (must be `None`) for puzzle variants.
    pub start: Option<TilePosition>,
    /// Puzzle difficulty, `1..=5`. Ignored for non-puzzle variants.
    pub difficulty: u8,
    /// Custom adjacency offsets, required for Offset/OffsetPuzzle, ignored otherwise.
    pub offsets: Option<Vec<(i32, i32)>>,
}

impl GenerationParams {
    /// Validate this configuration against `variant`'s preconditions, returning the
    /// resolved [`Adjacency`] to use for clue counting and solving.
    pub fn validate(&self, variant: Variant) -> Result<Adjacency, GenError> {
        let area = self
            .width
            .checked_mul(self.height)
            .ok_or_else(|| GenError::InvalidParameters("width * height overflows".into()))?;

        if !(MIN_SIDE..=MAX_SIDE).contains(&self.width)
            || !(MIN_SIDE..=MAX_SIDE).contains(&self.height)
        {
            return Err(GenError::InvalidParameters(format!(
                "width and height must each be in {MIN_SIDE}..={MAX_SIDE}"
            )));
        }
        if area > MAX_AREA {
            return Err(GenError::InvalidParameters(format!(
                "width * height = {area} exceeds the {MAX_AREA} cell cap"
            )));
        }
        if self.mines == 0 {
            return Err(GenError::InvalidParameters("mines must be at least 1".into()));
        }
        if variant == Variant::Chain && self.mines % 2 != 0 {
            return Err(GenError::InvalidParameters(
                "chain variant requires an even mine count".into(),
            ));
        }

        let spaces = if variant.supports_spaces() { self.spaces } else { 0 };
        if !variant.supports_spaces() && self.spaces != 0 {
            return Err(GenError::InvalidParameters(format!(
                "{variant:?} does not support spaces"
            )));
        }

        let density = (self.mines + spaces) as f64 / area as f64;
        let density_cap = if spaces > 0 { 0.19 } else { 0.20 };
        if density > density_cap {
            return Err(GenError::InvalidParameters(format!(
                "mine/space density {density:.3} exceeds the {density_cap:.2} cap"
            )));
        }

        if variant.is_puzzle() {
            if self.start.is_some() {
                return Err(GenError::InvalidParameters(
                    "puzzle variants derive their own starting frontier and take no start position".into(),
                ));
            }
            if !(1..=5).contains(&self.difficulty) {
                return Err(GenError::InvalidParameters(
                    "puzzle difficulty must be in 1..=5".into(),
                ));
            }
        } else {
            let (row, col) = self.start.ok_or_else(|| {
                GenError::InvalidParameters("non-puzzle variants require a start position".into())
            })?;
            if row >= self.height || col >= self.width {
                return Err(GenError::InvalidParameters(
                    "start position is outside the board".into(),
                ));
            }
        }

        let adjacency = if variant.is_offset() {
            let offsets = self.offsets.clone().ok_or_else(|| {
                GenError::InvalidParameters("offset variants require explicit offsets".into())
            })?;
            let adjacency = Adjacency::custom(offsets).ok_or_else(|| {
                GenError::InvalidParameters("offsets must be non-empty and exclude (0, 0)".into())
            })?;
            if !adjacency.is_connected(5) {
                return Err(GenError::InvalidParameters(
                    "offsets must connect every cell of a 10x10 neighborhood to its center".into(),
                ));
            }
            adjacency
        } else {
            if self.offsets.is_some() {
                return Err(GenError::InvalidParameters(format!(
                    "{variant:?} does not accept custom offsets"
                )));
            }
            Adjacency::standard()
        };

        Ok(adjacency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(variant: Variant) -> GenerationParams {
        GenerationParams {
            width: 10,
            height: 10,
            mines: 10,
            spaces: if variant.supports_spaces() { 5 } else { 0 },
            start: if variant.is_puzzle() { None } else { Some((0, 0)) },
            difficulty: 2,
            offsets: if variant.is_offset() {
                Some(vec![(1, 0), (-1, 0), (0, 1), (0, -1)])
            } else {
                None
            },
        }
    }

    #[test]
    fn standard_ok() {
        assert!(base(Variant::Standard).validate(Variant::Standard).is_ok());
    }

    #[test]
    fn dense_standard_rejected() {
        let mut p = base(Variant::Standard);
        p.mines = 21;
        assert!(matches!(
            p.validate(Variant::Standard),
            Err(GenError::InvalidParameters(_))
        ));
    }

    #[test]
    fn chain_odd_minecount_rejected() {
        let mut p = base(Variant::Chain);
        p.mines = 9;
        assert!(p.validate(Variant::Chain).is_err());
    }

    #[test]
    fn offset_requires_connected_directions() {
        let mut p = base(Variant::Offset);
        p.offsets = Some(vec![(1, 0), (-1, 0)]);
        assert!(p.validate(Variant::Offset).is_err());
    }

    #[test]
    fn puzzle_rejects_explicit_start() {
        let mut p = base(Variant::Puzzle);
        p.start = Some((0, 0));
        assert!(p.validate(Variant::Puzzle).is_err());
    }

    #[test]
    fn puzzle_difficulty_out_of_range_rejected() {
        let mut p = base(Variant::Puzzle);
        p.difficulty = 0;
        assert!(p.validate(Variant::Puzzle).is_err());
        p.difficulty = 6;
        assert!(p.validate(Variant::Puzzle).is_err());
    }

    #[test]
    fn oversized_board_rejected() {
        let mut p = base(Variant::Standard);
        p.width = 99;
        p.height = 99;
        p.mines = 1900;
        assert!(p.validate(Variant::Standard).is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// `validate`'s connectivity check for Offset variants must agree exactly with
            /// `Adjacency::is_connected` on arbitrary small offset sets: connected offsets are
            /// always accepted, disconnected ones always rejected.
            #[test]
            fn offset_validation_tracks_adjacency_connectivity(
                raw in prop::collection::vec((-2i32..=2, -2i32..=2), 1..6)
            ) {
                let offsets: Vec<(i32, i32)> = raw.into_iter().filter(|&(dr, dc)| dr != 0 || dc != 0).collect();
                prop_assume!(!offsets.is_empty());

                let mut p = base(Variant::Offset);
                p.offsets = Some(offsets.clone());
                let connected = Adjacency::custom(offsets).unwrap().is_connected(5);
                let accepted = p.validate(Variant::Offset).is_ok();
                prop_assert_eq!(connected, accepted);
            }
        }
    }
}
