use crate::{RankSettings, ResultRanker, SolveError};
use pqs_core::{
    models::{Distribution, QuadraticObjective},
    ports::Eigensolver,
};

/// A solver that does no search at all.
///
/// Reports equal weight on every assignment, the measurement distribution of
/// the equal superposition a variational ansatz is initialized to. Useful as a
/// lower bound on solver quality and for exercising tie-breaking.
#[derive(Clone, Debug, Default)]
pub struct UniformSampler(RankSettings);

impl UniformSampler {
    /// Create a new instance with the provided enumeration settings
    pub fn new(settings: RankSettings) -> Self {
        Self(settings)
    }
}

impl Eigensolver for UniformSampler {
    type Error = SolveError;

    fn solve(
        &self,
        objective: &QuadraticObjective,
    ) -> impl Future<Output = Result<Distribution, Self::Error>> + Send {
        let n = objective.len();
        let result = ResultRanker::new(self.0.clone())
            .check_size(n)
            .map_err(SolveError::from)
            .and_then(|()| Ok(Distribution::uniform(n)?));
        std::future::ready(result)
    }
}
