/// A dense, symmetric covariance matrix of asset returns.
///
/// Entry `(i, j)` is the covariance of the returns of assets `i` and `j`. The
/// matrix is validated on construction to be square, finite and exactly
/// symmetric. Positive semi-definiteness is assumed, not checked.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")
)]
pub struct CovarianceMatrix(Vec<Vec<f64>>);

impl CovarianceMatrix {
    /// Creates a new covariance matrix from its rows, validating its shape and symmetry
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, CovarianceError> {
        Self::try_from(rows)
    }

    /// The number of rows (equivalently, columns)
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// The entry at `(row, col)`, if in bounds
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.0.get(row).and_then(|r| r.get(col)).copied()
    }

    /// The rows of the matrix
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.0
    }
}

impl std::ops::Deref for CovarianceMatrix {
    type Target = [Vec<f64>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<Vec<f64>>> for CovarianceMatrix {
    type Error = CovarianceError;

    fn try_from(value: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        let n = value.len();
        for (row, entries) in value.iter().enumerate() {
            if entries.len() != n {
                return Err(CovarianceError::NotSquare {
                    row,
                    len: entries.len(),
                    dim: n,
                });
            }
            if entries.iter().any(|x| !x.is_finite()) {
                return Err(CovarianceError::NonFinite(row));
            }
        }

        // Only the strict upper triangle needs comparing against its mirror
        for i in 0..n {
            for j in (i + 1)..n {
                if value[i][j] != value[j][i] {
                    return Err(CovarianceError::Asymmetric { row: i, col: j });
                }
            }
        }

        Ok(Self(value))
    }
}

impl From<CovarianceMatrix> for Vec<Vec<f64>> {
    fn from(value: CovarianceMatrix) -> Self {
        value.0
    }
}

/// Errors that can occur when creating or validating a covariance matrix
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CovarianceError {
    /// Error when a row's length differs from the number of rows
    #[error("row {row} has {len} entries, expected {dim}")]
    NotSquare {
        /// The offending row
        row: usize,
        /// Its length
        len: usize,
        /// The number of rows
        dim: usize,
    },
    /// Error when an entry is NaN or infinite
    #[error("non-finite entry in row {0}")]
    NonFinite(usize),
    /// Error when the matrix is not symmetric
    #[error("entry ({row}, {col}) differs from its transpose")]
    Asymmetric {
        /// The row of the upper-triangle entry
        row: usize,
        /// The column of the upper-triangle entry
        col: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_matrix() {
        let sigma = CovarianceMatrix::new(vec![vec![0.04, 0.01], vec![0.01, 0.09]]).unwrap();
        assert_eq!(sigma.dim(), 2);
        assert_eq!(sigma.get(0, 1), Some(0.01));
        assert_eq!(sigma.get(2, 0), None);
    }

    #[test]
    fn test_not_square() {
        assert_eq!(
            CovarianceMatrix::new(vec![vec![0.04, 0.01], vec![0.01]]).unwrap_err(),
            CovarianceError::NotSquare {
                row: 1,
                len: 1,
                dim: 2
            }
        );
    }

    #[test]
    fn test_asymmetric() {
        assert_eq!(
            CovarianceMatrix::new(vec![
                vec![0.04, 0.01, 0.0],
                vec![0.01, 0.09, 0.02],
                vec![0.0, 0.03, 0.01],
            ])
            .unwrap_err(),
            CovarianceError::Asymmetric { row: 1, col: 2 }
        );
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(
            CovarianceMatrix::new(vec![vec![f64::NAN]]).unwrap_err(),
            CovarianceError::NonFinite(0)
        );
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<CovarianceMatrix>("[[1.0, 2.0], [3.0, 1.0]]").is_err());
        assert!(serde_json::from_str::<CovarianceMatrix>("[[1.0, 2.0], [2.0, 1.0]]").is_ok());
    }
}
