/// Classical reference that enumerates every assignment
mod exhaustive;
pub use exhaustive::ExhaustiveSearch;

/// Baseline that weights every assignment equally
mod uniform;
pub use uniform::UniformSampler;

use crate::RankError;
use pqs_core::models::DistributionError;

/// The ways in which the reference eigensolvers may fail
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// Error when the objective is too large to enumerate, or otherwise invalid
    #[error(transparent)]
    Rank(#[from] RankError),
    /// Error when the resulting distribution cannot be constructed
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}
