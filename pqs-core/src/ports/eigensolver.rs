use crate::models::{Distribution, QuadraticObjective};

/// Interface for solvers that search the assignment space of a quadratic objective.
///
/// An eigensolver takes the objective (equivalently, the diagonal Hamiltonian
/// it defines) and reports a distribution over all `2ⁿ` assignments. An exact
/// classical solver reports all of its weight on the minimizer; a variational
/// solver reports the sampled measurement probabilities of its final state.
/// The caller is agnostic to how the distribution was produced, and is
/// responsible for imposing any timeout on the search.
pub trait Eigensolver {
    /// Error type for solver failures
    type Error: std::error::Error + 'static;

    /// Produce a distribution over the assignments of `objective`.
    ///
    /// The returned distribution must range over `objective.len()` assets.
    fn solve(
        &self,
        objective: &QuadraticObjective,
    ) -> impl Future<Output = Result<Distribution, Self::Error>> + Send;
}
