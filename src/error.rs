//! The crate's single error taxonomy. No public function panics on
//! caller-supplied input; internal invariants use `debug_assert!` instead.

/// Everything that can go wrong generating a board.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("invalid seed {0:?}: must be at most 10 alphanumeric/space characters")]
    InvalidSeed(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("choose() called against an empty set")]
    EmptyDomain,

    #[error("infeasible: {available} admissible positions cannot host {requested} mines")]
    Infeasible { available: usize, requested: usize },

    #[error("solver exhausted: no progress after {iterations} iterations")]
    SolverExhausted { iterations: u64 },

    #[error("cancelled before a result was produced")]
    Cancelled,
}
