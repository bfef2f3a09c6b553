use super::{Assignment, AssignmentError, MAX_ASSETS, Map};
use std::collections::TryReserveError;

/// The largest number of assets a distribution may range over.
///
/// Distributions are stored densely, so this bounds their size at `2^28` weights.
pub const MAX_DENSE_ASSETS: usize = 28;

/// A non-negative weight for every assignment over a fixed number of assets.
///
/// Weights are stored densely, indexed by [`Assignment::index`]. They are
/// typically probabilities produced by an eigensolver, but are not required to
/// sum to one; only their relative order matters for ranking.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "DistributionDto", into = "DistributionDto")
)]
pub struct Distribution {
    assets: usize,
    weights: Vec<f64>,
}

impl Distribution {
    /// Creates a distribution from dense weights, which must number exactly `2^assets`
    pub fn new(assets: usize, weights: Vec<f64>) -> Result<Self, DistributionError> {
        let expected = space(assets)?;
        if weights.len() != expected {
            return Err(DistributionError::Dimension {
                expected,
                actual: weights.len(),
            });
        }
        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w >= 0.0))
        {
            return Err(DistributionError::InvalidWeight { index, value });
        }
        Ok(Self { assets, weights })
    }

    /// The equal-weight distribution over every assignment, each weighted `1 / 2^assets`.
    ///
    /// This is the measurement distribution of an equal superposition over all
    /// basis states, which is where variational solvers start their search.
    pub fn uniform(assets: usize) -> Result<Self, DistributionError> {
        let len = space(assets)?;
        let mut weights = zeros(len)?;
        weights.fill(1.0 / len as f64);
        Ok(Self { assets, weights })
    }

    /// All weight on a single assignment, as an exact solver reports its minimizer
    pub fn one_hot(assets: usize, index: usize) -> Result<Self, DistributionError> {
        let len = space(assets)?;
        if index >= len {
            return Err(AssignmentError::IndexOutOfRange { index, assets }.into());
        }
        let mut weights = zeros(len)?;
        weights[index] = 1.0;
        Ok(Self { assets, weights })
    }

    /// Densify a bitstring-keyed mapping. Missing bitstrings get zero weight.
    pub fn from_bitstrings(
        assets: usize,
        sparse: Map<String, f64>,
    ) -> Result<Self, DistributionError> {
        let len = space(assets)?;
        if let Some(key) = sparse.keys().find(|key| key.len() != assets) {
            return Err(DistributionError::Width {
                key: key.clone(),
                width: assets,
            });
        }

        let mut weights = zeros(len)?;
        for (key, value) in sparse {
            let assignment: Assignment = key.parse()?;
            weights[assignment.index()] = value;
        }
        Self::new(assets, weights)
    }

    /// The number of assets the distribution ranges over
    pub fn assets(&self) -> usize {
        self.assets
    }

    /// The weight of each assignment, indexed by [`Assignment::index`]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The total weight
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// The non-zero weights keyed by bitstring, in index order
    pub fn to_bitstrings(&self) -> Map<String, f64> {
        self.weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(index, &w)| {
                // index < 2^assets by construction
                let key = format!("{:0width$b}", index, width = self.assets);
                (key, w)
            })
            .collect()
    }
}

impl std::ops::Deref for Distribution {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.weights
    }
}

fn space(assets: usize) -> Result<usize, DistributionError> {
    if assets > MAX_ASSETS {
        Err(AssignmentError::TooManyAssets(assets).into())
    } else if assets > MAX_DENSE_ASSETS {
        Err(DistributionError::TooLarge {
            assets,
            cap: MAX_DENSE_ASSETS,
        })
    } else {
        Ok(1 << assets)
    }
}

fn zeros(len: usize) -> Result<Vec<f64>, DistributionError> {
    let mut weights = Vec::new();
    weights.try_reserve_exact(len)?;
    weights.resize(len, 0.0);
    Ok(weights)
}

/// The accepted wire formats for a distribution.
///
/// Solvers report either a dense array of `2ⁿ` weights, or a sparse mapping
/// from `n`-wide bitstrings to weights.
#[derive(Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum DistributionDto {
    /// Weights in index order
    Dense(Vec<f64>),
    /// Weights keyed by bitstring
    Sparse(Map<String, f64>),
}

impl From<Distribution> for DistributionDto {
    fn from(value: Distribution) -> Self {
        Self::Dense(value.weights)
    }
}

impl TryFrom<DistributionDto> for Distribution {
    type Error = DistributionError;

    fn try_from(value: DistributionDto) -> Result<Self, Self::Error> {
        match value {
            DistributionDto::Dense(weights) => {
                if !weights.len().is_power_of_two() {
                    return Err(DistributionError::NotPowerOfTwo(weights.len()));
                }
                let assets = weights.len().trailing_zeros() as usize;
                Self::new(assets, weights)
            }
            DistributionDto::Sparse(sparse) => {
                let assets = sparse
                    .keys()
                    .next()
                    .map(|key| key.len())
                    .ok_or(DistributionError::Empty)?;
                Self::from_bitstrings(assets, sparse)
            }
        }
    }
}

/// Errors that can occur when creating or validating a distribution
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DistributionError {
    /// Error when the number of weights is not `2^assets`
    #[error("expected {expected} weights, found {actual}")]
    Dimension {
        /// The size of the assignment space
        expected: usize,
        /// The number of weights provided
        actual: usize,
    },
    /// Error when a dense distribution cannot cover a whole assignment space
    #[error("{0} weights do not cover an assignment space")]
    NotPowerOfTwo(usize),
    /// Error when a weight is negative, NaN or infinite
    #[error("invalid weight {value} at index {index}")]
    InvalidWeight {
        /// The offending index
        index: usize,
        /// The offending weight
        value: f64,
    },
    /// Error when a bitstring has the wrong number of digits
    #[error("bitstring {key:?} does not have width {width}")]
    Width {
        /// The offending bitstring
        key: String,
        /// The expected width
        width: usize,
    },
    /// Error when a sparse distribution has no entries to infer its width from
    #[error("empty sparse distribution")]
    Empty,
    /// Error when the assignment space is too large to store densely
    #[error("{assets} assets exceed the distribution cap of {cap}")]
    TooLarge {
        /// The number of assets requested
        assets: usize,
        /// The largest supported number of assets
        cap: usize,
    },
    /// Error when the weights cannot be allocated
    #[error(transparent)]
    Allocation(#[from] TryReserveError),
    /// Error when a bitstring or index is invalid
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let dist = Distribution::uniform(3).unwrap();
        assert_eq!(dist.len(), 8);
        assert!(dist.iter().all(|&w| w == 0.125));
        assert_eq!(dist.total(), 1.0);
    }

    #[test]
    fn test_one_hot() {
        let dist = Distribution::one_hot(4, 6).unwrap();
        assert_eq!(dist[6], 1.0);
        assert_eq!(dist.total(), 1.0);
        assert_eq!(
            dist.to_bitstrings().into_iter().collect::<Vec<_>>(),
            vec![("0110".to_owned(), 1.0)]
        );
        assert!(Distribution::one_hot(2, 4).is_err());
    }

    #[test]
    fn test_dimension() {
        assert_eq!(
            Distribution::new(2, vec![0.25; 3]).unwrap_err(),
            DistributionError::Dimension {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_invalid_weight() {
        assert_eq!(
            Distribution::new(1, vec![0.5, -0.5]).unwrap_err(),
            DistributionError::InvalidWeight {
                index: 1,
                value: -0.5
            }
        );
    }

    #[test]
    fn test_from_bitstrings() {
        let sparse = [("01".to_owned(), 0.75), ("10".to_owned(), 0.25)]
            .into_iter()
            .collect();
        let dist = Distribution::from_bitstrings(2, sparse).unwrap();
        assert_eq!(dist.weights(), &[0.0, 0.75, 0.25, 0.0]);

        let sparse = std::iter::once(("011".to_owned(), 1.0)).collect();
        assert_eq!(
            Distribution::from_bitstrings(2, sparse).unwrap_err(),
            DistributionError::Width {
                key: "011".to_owned(),
                width: 2
            }
        );
    }

    #[test]
    fn test_deserialize() {
        let dense: Distribution = serde_json::from_str("[0.5, 0.0, 0.0, 0.5]").unwrap();
        assert_eq!(dense.assets(), 2);

        let sparse: Distribution = serde_json::from_str(r#"{"110": 0.9, "011": 0.1}"#).unwrap();
        assert_eq!(sparse.assets(), 3);
        assert_eq!(sparse[6], 0.9);
        assert_eq!(sparse[3], 0.1);

        assert!(serde_json::from_str::<Distribution>("[0.5, 0.5, 0.0]").is_err());
        assert!(serde_json::from_str::<Distribution>("{}").is_err());
    }

    #[test]
    fn test_too_large() {
        assert_eq!(
            Distribution::uniform(63).unwrap_err(),
            DistributionError::TooLarge {
                assets: 63,
                cap: MAX_DENSE_ASSETS
            }
        );
        assert_eq!(
            Distribution::one_hot(MAX_DENSE_ASSETS + 1, 0).unwrap_err(),
            DistributionError::TooLarge {
                assets: MAX_DENSE_ASSETS + 1,
                cap: MAX_DENSE_ASSETS
            }
        );
        assert!(matches!(
            Distribution::uniform(64).unwrap_err(),
            DistributionError::Assignment(AssignmentError::TooManyAssets(64))
        ));
    }

    #[test]
    fn test_wide_bitstring_is_rejected() {
        let json = format!(r#"{{"{}": 1.0}}"#, "0".repeat(62));
        let err = serde_json::from_str::<Distribution>(&json).unwrap_err();
        assert!(err.to_string().contains("distribution cap"), "{err}");

        // a later key of a different width is rejected before anything is densified
        let sparse = [("01".to_owned(), 0.5), ("0".repeat(40), 0.5)]
            .into_iter()
            .collect();
        assert_eq!(
            Distribution::from_bitstrings(2, sparse).unwrap_err(),
            DistributionError::Width {
                key: "0".repeat(40),
                width: 2
            }
        );
    }
}
