use crate::{RankError, RankSettings, ResultRanker, SolveError};
use pqs_core::{
    models::{Assignment, Distribution, QuadraticObjective},
    ports::Eigensolver,
};
use tracing::{Level, event};

/// An exact classical solver for small objectives.
///
/// Evaluates all `2ⁿ` assignments and reports a one-hot distribution on the
/// one with the lowest objective value (the lowest index, on ties). This is the
/// output an exact minimum eigensolver produces for the diagonal Hamiltonian
/// of the objective, and serves as the reference other solvers are judged by.
#[derive(Clone, Debug, Default)]
pub struct ExhaustiveSearch(ResultRanker);

impl ExhaustiveSearch {
    /// Create a new instance with the provided enumeration settings
    pub fn new(settings: RankSettings) -> Self {
        Self(ResultRanker::new(settings))
    }

    fn search(&self, objective: &QuadraticObjective) -> Result<Distribution, SolveError> {
        let n = objective.len();
        self.0.check_size(n)?;

        // The first strictly smaller value wins, so ties go to the lowest index
        let mut best: Option<(usize, f64)> = None;
        for index in 0..1usize << n {
            let assignment = Assignment::from_index(index, n).map_err(RankError::from)?;
            let value = objective
                .evaluate(&assignment)
                .ok_or(RankError::ShapeMismatch {
                    assets: n,
                    variables: n,
                })?
                .value;
            if best.is_none_or(|(_, min)| value.total_cmp(&min).is_lt()) {
                best = Some((index, value));
            }
        }
        let Some((index, value)) = best else {
            return Ok(Distribution::uniform(n)?);
        };

        event!(
            Level::DEBUG,
            assets = n,
            minimizer = index,
            value,
            "exhaustive search complete"
        );

        Ok(Distribution::one_hot(n, index)?)
    }
}

impl Eigensolver for ExhaustiveSearch {
    type Error = SolveError;

    fn solve(
        &self,
        objective: &QuadraticObjective,
    ) -> impl Future<Output = Result<Distribution, Self::Error>> + Send {
        std::future::ready(self.search(objective))
    }
}
