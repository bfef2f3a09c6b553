use super::{CovarianceError, CovarianceMatrix};
use std::fmt;

/// A newtype wrapper around the name of an asset
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct AssetId(String);

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for AssetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The market statistics a portfolio selection problem is built from.
///
/// A market is an ordered, non-empty set of assets together with their expected
/// returns and the covariance of their returns, all index-aligned. It is
/// validated once on construction and immutable thereafter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "MarketDto", into = "MarketDto")
)]
pub struct Market {
    assets: Vec<AssetId>,
    returns: Vec<f64>,
    covariance: CovarianceMatrix,
}

impl Market {
    /// Creates a new market, validating that all the statistics line up
    pub fn new(
        assets: Vec<AssetId>,
        returns: Vec<f64>,
        covariance: Vec<Vec<f64>>,
    ) -> Result<Self, MarketError> {
        Self::try_from(MarketDto {
            assets,
            returns,
            covariance,
        })
    }

    /// The number of assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Always false for a validated market, provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// The asset identifiers, in index order
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// The expected return of each asset
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// The covariance of the asset returns
    pub fn covariance(&self) -> &CovarianceMatrix {
        &self.covariance
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketDto {
    /// The asset identifiers
    pub assets: Vec<AssetId>,
    /// The expected returns, index-aligned with `assets`
    pub returns: Vec<f64>,
    /// The covariance matrix rows, index-aligned with `assets`
    pub covariance: Vec<Vec<f64>>,
}

impl From<Market> for MarketDto {
    fn from(value: Market) -> Self {
        Self {
            assets: value.assets,
            returns: value.returns,
            covariance: value.covariance.into(),
        }
    }
}

impl TryFrom<MarketDto> for Market {
    type Error = MarketError;

    fn try_from(value: MarketDto) -> Result<Self, Self::Error> {
        let MarketDto {
            assets,
            returns,
            covariance,
        } = value;

        if assets.is_empty() {
            return Err(MarketError::Empty);
        }

        let mut seen = rustc_hash::FxHashSet::default();
        for asset in assets.iter() {
            if !seen.insert(asset) {
                return Err(MarketError::DuplicateAsset(asset.clone()));
            }
        }

        if returns.len() != assets.len() {
            return Err(MarketError::ReturnsMismatch {
                assets: assets.len(),
                returns: returns.len(),
            });
        }
        if let Some(position) = returns.iter().position(|r| !r.is_finite()) {
            return Err(MarketError::NonFiniteReturn(position));
        }

        let covariance = CovarianceMatrix::new(covariance)?;
        if covariance.dim() != assets.len() {
            return Err(MarketError::CovarianceMismatch {
                assets: assets.len(),
                dim: covariance.dim(),
            });
        }

        Ok(Self {
            assets,
            returns,
            covariance,
        })
    }
}

/// Errors that can occur when creating or validating a market
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MarketError {
    /// Error when no assets are provided
    #[error("a market needs at least one asset")]
    Empty,
    /// Error when an asset is listed twice
    #[error("duplicate asset {0}")]
    DuplicateAsset(AssetId),
    /// Error when the number of returns does not match the number of assets
    #[error("{returns} expected returns for {assets} assets")]
    ReturnsMismatch {
        /// The number of assets
        assets: usize,
        /// The number of returns
        returns: usize,
    },
    /// Error when an expected return is NaN or infinite
    #[error("non-finite expected return for asset {0}")]
    NonFiniteReturn(usize),
    /// Error when the covariance dimension does not match the number of assets
    #[error("{dim}x{dim} covariance for {assets} assets")]
    CovarianceMismatch {
        /// The number of assets
        assets: usize,
        /// The dimension of the covariance matrix
        dim: usize,
    },
    /// Error when the covariance matrix itself is invalid
    #[error("invalid covariance: {0}")]
    Covariance(#[from] CovarianceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<AssetId> {
        names.iter().map(|&name| name.into()).collect()
    }

    #[test]
    fn test_valid_market() {
        let market = Market::new(
            ids(&["A", "B"]),
            vec![0.01, 0.02],
            vec![vec![0.04, 0.01], vec![0.01, 0.09]],
        )
        .unwrap();
        assert_eq!(market.len(), 2);
        assert_eq!(market.assets()[1].to_string(), "B");
        assert_eq!(market.covariance().get(1, 1), Some(0.09));
    }

    #[test]
    fn test_empty_market() {
        assert_eq!(
            Market::new(vec![], vec![], vec![]).unwrap_err(),
            MarketError::Empty
        );
    }

    #[test]
    fn test_duplicate_asset() {
        assert_eq!(
            Market::new(
                ids(&["A", "A"]),
                vec![0.01, 0.02],
                vec![vec![0.04, 0.01], vec![0.01, 0.09]],
            )
            .unwrap_err(),
            MarketError::DuplicateAsset("A".into())
        );
    }

    #[test]
    fn test_mismatched_shapes() {
        assert_eq!(
            Market::new(ids(&["A", "B"]), vec![0.01], vec![vec![0.04]]).unwrap_err(),
            MarketError::ReturnsMismatch {
                assets: 2,
                returns: 1
            }
        );
        assert_eq!(
            Market::new(ids(&["A", "B"]), vec![0.01, 0.02], vec![vec![0.04]]).unwrap_err(),
            MarketError::CovarianceMismatch { assets: 2, dim: 1 }
        );
    }

    #[test]
    fn test_deserialize() {
        let market: Market = serde_json::from_str(
            r#"{"assets": ["A", "B"], "returns": [0.01, 0.02], "covariance": [[0.04, 0.01], [0.01, 0.09]]}"#,
        )
        .unwrap();
        assert_eq!(market.returns(), &[0.01, 0.02]);

        assert!(
            serde_json::from_str::<Market>(
                r#"{"assets": ["A"], "returns": [0.01, 0.02], "covariance": [[0.04]]}"#,
            )
            .is_err()
        );
    }
}
