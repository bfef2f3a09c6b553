use crate::{
    FormulationError, FormulationSettings, ProblemFormulator, RankError, Report, ResultRanker,
};
use pqs_core::{
    models::{AssetId, Distribution, Market, QuadraticObjective, RankedEntry},
    ports::Eigensolver,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// a representation of a portfolio selection problem
#[derive(Debug, Clone)]
pub struct Problem {
    /// the market statistics
    pub market: Market,
    /// how to turn them into an objective
    pub settings: FormulationSettings,
}

/// a formulated problem, ready for an external eigensolver
#[derive(Debug, Serialize)]
pub struct Formulation {
    /// the asset each variable stands for
    pub assets: Vec<AssetId>,
    /// the objective coefficients
    pub objective: QuadraticObjective,
}

/// a representation of the solution of a problem
#[derive(Debug, Serialize, Deserialize)]
pub struct Outcome {
    /// the assets selected by the most probable assignment
    pub selection: Vec<AssetId>,
    /// the assets selected by the objective minimum, when it differs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_selection: Option<Vec<AssetId>>,
    /// the ranking summary
    pub report: Report,
}

impl Problem {
    /// pair a market with formulation settings
    pub fn new(market: Market, settings: FormulationSettings) -> Self {
        Self { market, settings }
    }

    /// formulate the objective
    pub fn formulate(&self) -> Result<Formulation, FormulationError> {
        let objective = ProblemFormulator::new(self.settings.clone()).formulate(&self.market)?;
        Ok(Formulation {
            assets: self.market.assets().to_vec(),
            objective,
        })
    }

    /// rank a distribution produced by an external solver
    pub fn rank(
        &self,
        distribution: &Distribution,
        ranker: &ResultRanker,
        top: usize,
    ) -> Result<Outcome, PipelineError> {
        let Formulation { objective, .. } = self.formulate()?;
        self.report(&objective, distribution, ranker, top)
    }

    /// formulate, solve and rank the problem
    pub async fn solve<T: Eigensolver>(
        &self,
        solver: &T,
        ranker: &ResultRanker,
        top: usize,
    ) -> Result<Outcome, PipelineError<T::Error>> {
        let Formulation { objective, .. } = self.formulate()?;
        let distribution = solver
            .solve(&objective)
            .await
            .map_err(PipelineError::Solver)?;
        self.report(&objective, &distribution, ranker, top)
            .map_err(PipelineError::widen)
    }

    fn report(
        &self,
        objective: &QuadraticObjective,
        distribution: &Distribution,
        ranker: &ResultRanker,
        top: usize,
    ) -> Result<Outcome, PipelineError> {
        let ranked = ranker.rank(objective, self.market.len(), distribution)?;
        let report = Report::new(&ranked, top).ok_or(PipelineError::Empty)?;

        let selection = self.selection(&report.most_probable);
        let optimal_selection = (!report.agrees).then(|| self.selection(&report.minimum));

        Ok(Outcome {
            selection,
            optimal_selection,
            report,
        })
    }

    fn selection(&self, entry: &RankedEntry) -> Vec<AssetId> {
        let assets = self.market.assets();
        entry
            .assignment
            .positions()
            .map(|j| assets[j].clone())
            .collect()
    }
}

/// The ways in which the pipeline may fail
#[derive(Debug, thiserror::Error)]
pub enum PipelineError<E: std::error::Error + 'static = Infallible> {
    /// Error when the objective cannot be formulated
    #[error("formulation failed: {0}")]
    Formulation(#[from] FormulationError),
    /// Error when the distribution cannot be ranked
    #[error("ranking failed: {0}")]
    Rank(#[from] RankError),
    /// Error reported by the eigensolver
    #[error("eigensolver failed: {0}")]
    Solver(#[source] E),
    /// Error when there is nothing to report
    #[error("empty ranking")]
    Empty,
}

impl PipelineError {
    fn widen<E: std::error::Error + 'static>(self) -> PipelineError<E> {
        match self {
            Self::Formulation(e) => PipelineError::Formulation(e),
            Self::Rank(e) => PipelineError::Rank(e),
            Self::Solver(never) => match never {},
            Self::Empty => PipelineError::Empty,
        }
    }
}
