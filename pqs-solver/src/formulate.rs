use pqs_core::models::{BudgetPenalty, Market, QuadraticObjective};
use tracing::{Level, event};

/// The parameters that turn market statistics into a binary program
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FormulationSettings {
    /// The weight `q` on portfolio variance relative to expected return
    pub risk_factor: f64,
    /// The number of assets to select (half the market, rounded down, if omitted)
    pub budget: Option<usize>,
    /// The budget penalty weight `λ` (the number of assets, if omitted)
    pub penalty: Option<f64>,
}

impl Default for FormulationSettings {
    fn default() -> Self {
        Self {
            risk_factor: 0.5,
            budget: None,
            penalty: None,
        }
    }
}

/// Builds quadratic unconstrained binary objectives for budgeted mean-variance selection.
///
/// The objective for a selection `x ∈ {0,1}ⁿ` is
/// `q·xᵀΣx − μᵀx + λ·(1ᵀx − B)²`, where the last term is the soft form of
/// the constraint that exactly `B` assets are selected.
#[derive(Clone, Debug, Default)]
pub struct ProblemFormulator(FormulationSettings);

impl ProblemFormulator {
    /// Create a new formulator with the provided settings
    pub fn new(settings: FormulationSettings) -> Self {
        Self(settings)
    }

    /// The settings this formulator applies
    pub fn settings(&self) -> &FormulationSettings {
        &self.0
    }

    /// Formulate the selection problem for a market, resolving any defaulted settings
    pub fn formulate(&self, market: &Market) -> Result<QuadraticObjective, FormulationError> {
        let n = market.len();
        let budget = self.0.budget.unwrap_or(n / 2);
        let penalty = self.0.penalty.unwrap_or(n as f64);
        Self::build(
            market.returns(),
            market.covariance(),
            self.0.risk_factor,
            budget,
            penalty,
        )
    }

    /// Build the objective from raw statistics.
    ///
    /// # Parameters
    /// * `mu` - The expected return of each asset
    /// * `sigma` - The covariance matrix of the returns, as rows
    /// * `q` - The risk factor, must be positive
    /// * `budget` - The number of assets to select, at most `mu.len()`
    /// * `penalty` - The budget penalty weight, must be positive
    ///
    /// # Returns
    /// The objective, with coefficients laid out as:
    /// * linear `i`: `−μᵢ + λ·(1 − 2B)`
    /// * quadratic `(i, i)`: `q·Σᵢᵢ`
    /// * quadratic `(i, j)`, `i < j`: `q·(Σᵢⱼ + Σⱼᵢ) + 2λ`
    /// * constant: `λ·B²`
    ///
    /// Identical inputs always produce bit-identical coefficients.
    pub fn build(
        mu: &[f64],
        sigma: &[Vec<f64>],
        q: f64,
        budget: usize,
        penalty: f64,
    ) -> Result<QuadraticObjective, FormulationError> {
        let n = mu.len();
        validate(mu, sigma, q, budget, penalty)?;

        let mut objective = QuadraticObjective::zeros(
            n,
            BudgetPenalty {
                weight: penalty,
                budget,
            },
        );

        // The base objective, q·xᵀΣx − μᵀx. Since xᵢ² = xᵢ on binaries, the
        // diagonal of Σ could equally live in the linear terms; we keep it
        // quadratic and fold the symmetric off-diagonal pair into the upper triangle.
        for i in 0..n {
            objective.add_linear(i, -mu[i]);
            objective.add_quadratic(i, i, q * sigma[i][i]);
            for j in (i + 1)..n {
                objective.add_quadratic(i, j, q * (sigma[i][j] + sigma[j][i]));
            }
        }

        // Expanding λ·(1ᵀx − B)² = λ·Σᵢ(1 − 2B)·xᵢ + 2λ·Σᵢ<ⱼ xᵢxⱼ + λ·B²
        let b = budget as f64;
        for i in 0..n {
            objective.add_linear(i, penalty * (1.0 - 2.0 * b));
            for j in (i + 1)..n {
                objective.add_quadratic(i, j, 2.0 * penalty);
            }
        }
        objective.add_constant(penalty * b * b);

        event!(
            Level::DEBUG,
            assets = n,
            budget,
            penalty,
            risk_factor = q,
            "formulated selection objective"
        );

        Ok(objective)
    }
}

fn validate(
    mu: &[f64],
    sigma: &[Vec<f64>],
    q: f64,
    budget: usize,
    penalty: f64,
) -> Result<(), FormulationError> {
    let n = mu.len();
    if n == 0 {
        return Err(FormulationError::Empty);
    }

    if sigma.len() != n {
        return Err(FormulationError::ShapeMismatch {
            returns: n,
            rows: sigma.len(),
            cols: sigma.first().map(Vec::len).unwrap_or_default(),
        });
    }
    if let Some(row) = sigma.iter().find(|row| row.len() != n) {
        return Err(FormulationError::ShapeMismatch {
            returns: n,
            rows: sigma.len(),
            cols: row.len(),
        });
    }

    if mu.iter().chain(sigma.iter().flatten()).any(|x| !x.is_finite()) {
        return Err(FormulationError::NonFinite);
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if sigma[i][j] != sigma[j][i] {
                return Err(FormulationError::Asymmetric { row: i, col: j });
            }
        }
    }

    if !(q.is_finite() && q > 0.0) {
        return Err(FormulationError::RiskFactor(q));
    }
    if !(penalty.is_finite() && penalty > 0.0) {
        return Err(FormulationError::PenaltyWeight(penalty));
    }
    if budget > n {
        return Err(FormulationError::Budget { budget, assets: n });
    }

    Ok(())
}

/// The ways in which the inputs to a formulation may be invalid
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FormulationError {
    /// Error when the returns and covariance dimensions disagree
    #[error("{returns} expected returns with a {rows}x{cols} covariance matrix")]
    ShapeMismatch {
        /// The number of expected returns
        returns: usize,
        /// The number of covariance rows
        rows: usize,
        /// The length of the first offending covariance row
        cols: usize,
    },
    /// Error when there are no assets
    #[error("no assets to select from")]
    Empty,
    /// Error when a return or covariance is NaN or infinite
    #[error("non-finite market statistic")]
    NonFinite,
    /// Error when the covariance matrix is not symmetric
    #[error("covariance entry ({row}, {col}) differs from its transpose")]
    Asymmetric {
        /// The row of the upper-triangle entry
        row: usize,
        /// The column of the upper-triangle entry
        col: usize,
    },
    /// Error when the risk factor is not a positive number
    #[error("risk factor must be positive, got {0}")]
    RiskFactor(f64),
    /// Error when the penalty weight is not a positive number
    #[error("penalty weight must be positive, got {0}")]
    PenaltyWeight(f64),
    /// Error when the budget exceeds the number of assets
    #[error("cannot select {budget} of {assets} assets")]
    Budget {
        /// The requested budget
        budget: usize,
        /// The number of assets
        assets: usize,
    },
}
