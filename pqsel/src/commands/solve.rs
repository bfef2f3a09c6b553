use clap::ValueEnum;
use pqs_solver::{
    ExhaustiveSearch, RankSettings, ResultRanker, UniformSampler,
    io::{Outcome, PipelineError, Problem},
};

// This explicitly articulates the available eigensolvers for the `solve` subcommand
#[derive(Clone, Copy, ValueEnum)]
pub enum SolverLib {
    Exhaustive,
    Uniform,
}

// Conveniently, we can use the same enum to handle the particulars of calling into
// the various solver implementations
impl SolverLib {
    pub async fn solve(
        &self,
        problem: &Problem,
        settings: RankSettings,
        top: usize,
    ) -> Result<Outcome, PipelineError<pqs_solver::SolveError>> {
        let ranker = ResultRanker::new(settings.clone());
        match self {
            SolverLib::Exhaustive => {
                problem
                    .solve(&ExhaustiveSearch::new(settings), &ranker, top)
                    .await
            }
            SolverLib::Uniform => {
                problem
                    .solve(&UniformSampler::new(settings), &ranker, top)
                    .await
            }
        }
    }
}
