//! Seeded, worker-indexed random source for the Candidate Generator.
//!
//! Uses `rand`'s `StdRng`, whose algorithm is a documented part of the crate's
//! public contract, rather than `SmallRng`, whose algorithm is explicitly
//! allowed to change between releases. Reproducibility of a seed string
//! across runs and ports rests entirely on this choice plus the seed-to-u64
//! folding below.

use rand::seq::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::GenError;

/// Maximum length of a caller-supplied seed string.
const MAX_SEED_LEN: usize = 10;

fn is_valid_seed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' '
}

/// Fold a seed string and a worker index into a single `u64` via FNV-1a, so
/// that distinct workers sharing a seed diverge immediately (per the
/// `σ ⊕ worker_index` requirement) while remaining a pure, deterministic
/// function of its inputs.
fn fold_seed(seed: &str, worker_index: usize) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for byte in seed.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    for byte in worker_index.to_le_bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Generate a fresh random seed string of [`MAX_SEED_LEN`] alphanumeric characters.
fn random_seed_string() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = StdRng::from_os_rng();
    (0..MAX_SEED_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Validate a caller-supplied seed string (grammar only; empty strings are
/// valid and mean "generate a fresh seed").
pub fn validate_seed(seed: &str) -> Result<(), GenError> {
    if seed.len() > MAX_SEED_LEN || !seed.chars().all(is_valid_seed_char) {
        return Err(GenError::InvalidSeed(seed.to_string()));
    }
    Ok(())
}

/// Resolve a caller-supplied seed (possibly empty) to a concrete seed string,
/// generating one from system entropy if none was given.
pub fn resolve_seed(seed: &str) -> Result<String, GenError> {
    validate_seed(seed)?;
    if seed.is_empty() {
        Ok(random_seed_string())
    } else {
        Ok(seed.to_string())
    }
}

/// The Candidate Generator's private PRNG. Owned exclusively by one worker;
/// never shared or stored globally.
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    /// Construct a worker's PRNG from a resolved seed string and its worker index.
    pub fn new(seed: &str, worker_index: usize) -> Self {
        Self {
            inner: StdRng::seed_from_u64(fold_seed(seed, worker_index)),
        }
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Uniform random element of `items`. Fails with [`GenError::EmptyDomain`]
    /// if `items` is empty, per the `choose(set)` contract.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, GenError> {
        items.choose(&mut self.inner).ok_or(GenError::EmptyDomain)
    }

    /// Uniform random integer in `[0, n)`. Panics if `n == 0`, matching
    /// `rand`'s own contract for `random_range`.
    pub fn range(&mut self, n: usize) -> usize {
        self.inner.random_range(0..n)
    }
}
