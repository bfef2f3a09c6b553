use pqs_core::models::{
    Assignment, AssignmentError, MAX_DENSE_ASSETS, QuadraticObjective, RankedEntry, RankedResult,
};
use tracing::{Level, event};

/// The default cap on the number of assets whose assignments are enumerated
pub const DEFAULT_MAX_ASSETS: usize = 24;

/// Configuration for the result ranker
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RankSettings {
    /// The largest number of assets for which all `2ⁿ` assignments may be enumerated
    pub max_assets: usize,
    /// Evaluate assignments on the rayon thread pool (ignored without the `rayon` feature)
    pub parallel: bool,
}

impl Default for RankSettings {
    fn default() -> Self {
        Self {
            max_assets: DEFAULT_MAX_ASSETS,
            parallel: false,
        }
    }
}

/// Evaluates every assignment of an objective and ranks them by solver probability.
///
/// The objective value of each assignment is computed here, independent of
/// whichever solver produced the probabilities.
#[derive(Clone, Debug, Default)]
pub struct ResultRanker(RankSettings);

impl ResultRanker {
    /// Create a new ranker with the provided settings
    pub fn new(settings: RankSettings) -> Self {
        Self(settings)
    }

    /// The settings this ranker applies
    pub fn settings(&self) -> &RankSettings {
        &self.0
    }

    /// Check that `assets` assets can be enumerated under this ranker's cap
    pub fn check_size(&self, assets: usize) -> Result<(), RankError> {
        let cap = self.0.max_assets.min(MAX_DENSE_ASSETS);
        if assets > cap {
            Err(RankError::IntractableSize { assets, cap })
        } else {
            Ok(())
        }
    }

    /// Rank the assignments of `objective` by their probability.
    ///
    /// # Parameters
    /// * `objective` - The objective to evaluate each assignment on
    /// * `n` - The number of assets, which must match the objective
    /// * `probabilities` - One non-negative weight per assignment index, `2ⁿ` in total
    ///
    /// # Returns
    /// Every assignment, sorted by decreasing probability with ties broken by increasing index.
    pub fn rank(
        &self,
        objective: &QuadraticObjective,
        n: usize,
        probabilities: &[f64],
    ) -> Result<RankedResult, RankError> {
        self.check_size(n)?;
        if n != objective.len() {
            return Err(RankError::ShapeMismatch {
                assets: n,
                variables: objective.len(),
            });
        }

        let expected = 1usize << n;
        if probabilities.len() != expected {
            return Err(RankError::Dimension {
                expected,
                actual: probabilities.len(),
            });
        }
        if let Some((index, &value)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.is_finite() && **p >= 0.0))
        {
            return Err(RankError::InvalidProbability { index, value });
        }

        let evaluate = |index: usize| -> Result<RankedEntry, RankError> {
            let assignment = Assignment::from_index(index, n)?;
            // n == objective.len() was checked above
            let evaluation = objective
                .evaluate(&assignment)
                .ok_or(RankError::ShapeMismatch {
                    assets: n,
                    variables: objective.len(),
                })?;
            Ok(RankedEntry::new(assignment, evaluation, probabilities[index]))
        };

        let entries = self.enumerate(expected, evaluate)?;
        let result = RankedResult::new(entries);

        event!(
            Level::DEBUG,
            assets = n,
            entries = result.len(),
            agrees = result.agrees(),
            "ranked assignment distribution"
        );

        Ok(result)
    }

    #[cfg(feature = "rayon")]
    fn enumerate<F>(&self, len: usize, evaluate: F) -> Result<Vec<RankedEntry>, RankError>
    where
        F: Fn(usize) -> Result<RankedEntry, RankError> + Sync + Send,
    {
        use rayon::prelude::*;

        // Indexed parallel collection preserves the index order, so the
        // subsequent stable sort sees exactly what the serial path produces
        if self.0.parallel {
            (0..len).into_par_iter().map(evaluate).collect()
        } else {
            (0..len).map(evaluate).collect()
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn enumerate<F>(&self, len: usize, evaluate: F) -> Result<Vec<RankedEntry>, RankError>
    where
        F: Fn(usize) -> Result<RankedEntry, RankError>,
    {
        (0..len).map(evaluate).collect()
    }
}

/// The headline view of a ranking, for presentation.
///
/// Reports both the solver's most probable assignment and the true minimum of
/// the objective, and flags whether they disagree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    /// The most probable assignment
    pub most_probable: RankedEntry,
    /// The assignment with the lowest objective value
    pub minimum: RankedEntry,
    /// The feasible assignment with the lowest objective value, if any
    pub feasible_minimum: Option<RankedEntry>,
    /// Whether the most probable assignment attains the minimum value
    pub agrees: bool,
    /// The leading entries of the ranking
    pub entries: Vec<RankedEntry>,
}

impl Report {
    /// Summarize a ranking, keeping its first `top` entries. None if the ranking is empty.
    pub fn new(result: &RankedResult, top: usize) -> Option<Self> {
        let most_probable = result.most_probable()?.clone();
        let minimum = result.minimum()?.clone();
        let agrees = result.agrees();

        if !agrees {
            event!(
                Level::WARN,
                most_probable = %most_probable.assignment,
                minimum = %minimum.assignment,
                "most probable assignment is not the objective minimum"
            );
        }

        Some(Self {
            most_probable,
            minimum,
            feasible_minimum: result.feasible_minimum().cloned(),
            agrees,
            entries: result.top(top).to_vec(),
        })
    }
}

/// The ways in which a ranking request may be invalid
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RankError {
    /// Error when the number of probabilities is not `2ⁿ`
    #[error("expected {expected} probabilities, found {actual}")]
    Dimension {
        /// The size of the assignment space
        expected: usize,
        /// The number of probabilities provided
        actual: usize,
    },
    /// Error when the assignment space is too large to enumerate
    #[error("{assets} assets exceed the enumeration cap of {cap}")]
    IntractableSize {
        /// The number of assets requested
        assets: usize,
        /// The configured cap
        cap: usize,
    },
    /// Error when the number of assets does not match the objective
    #[error("{assets} assets for an objective over {variables} variables")]
    ShapeMismatch {
        /// The number of assets requested
        assets: usize,
        /// The number of variables in the objective
        variables: usize,
    },
    /// Error when a probability is negative, NaN or infinite
    #[error("invalid probability {value} at index {index}")]
    InvalidProbability {
        /// The offending index
        index: usize,
        /// The offending value
        value: f64,
    },
    /// Error when an index cannot be decoded
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProblemFormulator;

    fn objective() -> QuadraticObjective {
        ProblemFormulator::build(
            &[0.1, 0.2, 0.3],
            &[
                vec![0.04, 0.01, 0.0],
                vec![0.01, 0.09, 0.02],
                vec![0.0, 0.02, 0.16],
            ],
            0.5,
            1,
            3.0,
        )
        .unwrap()
    }

    #[test]
    fn test_dimension() {
        let ranker = ResultRanker::default();
        assert_eq!(
            ranker.rank(&objective(), 3, &[0.125; 7]).unwrap_err(),
            RankError::Dimension {
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn test_intractable() {
        let ranker = ResultRanker::new(RankSettings {
            max_assets: 2,
            ..Default::default()
        });
        assert_eq!(
            ranker.rank(&objective(), 3, &[0.125; 8]).unwrap_err(),
            RankError::IntractableSize { assets: 3, cap: 2 }
        );
        assert!(ResultRanker::default().check_size(24).is_ok());
        assert!(ResultRanker::default().check_size(25).is_err());

        let unbounded = ResultRanker::new(RankSettings {
            max_assets: usize::MAX,
            ..Default::default()
        });
        assert_eq!(
            unbounded.check_size(40).unwrap_err(),
            RankError::IntractableSize {
                assets: 40,
                cap: MAX_DENSE_ASSETS
            }
        );
    }

    #[test]
    fn test_shape_mismatch() {
        assert_eq!(
            ResultRanker::default()
                .rank(&objective(), 2, &[0.25; 4])
                .unwrap_err(),
            RankError::ShapeMismatch {
                assets: 2,
                variables: 3
            }
        );
    }

    #[test]
    fn test_invalid_probability() {
        let mut probabilities = [0.125; 8];
        probabilities[5] = f64::NAN;
        assert!(matches!(
            ResultRanker::default()
                .rank(&objective(), 3, &probabilities)
                .unwrap_err(),
            RankError::InvalidProbability { index: 5, .. }
        ));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let probabilities = [0.1, 0.3, 0.0, 0.3, 0.05, 0.05, 0.1, 0.1];
        let serial = ResultRanker::default()
            .rank(&objective(), 3, &probabilities)
            .unwrap();
        let parallel = ResultRanker::new(RankSettings {
            parallel: true,
            ..Default::default()
        })
        .rank(&objective(), 3, &probabilities)
        .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_report() {
        let mut probabilities = [0.0; 8];
        probabilities[0] = 1.0;
        let result = ResultRanker::default()
            .rank(&objective(), 3, &probabilities)
            .unwrap();
        let report = Report::new(&result, 3).unwrap();

        assert_eq!(report.most_probable.index, 0);
        assert!(!report.most_probable.feasible);
        assert!(!report.agrees);
        assert!(report.minimum.feasible);
        assert_eq!(report.feasible_minimum.as_ref(), Some(&report.minimum));
        assert_eq!(report.entries.len(), 3);
    }
}
