use std::{fmt, str::FromStr};

/// The largest number of assets whose assignment space can be indexed by a `usize`.
pub const MAX_ASSETS: usize = (usize::BITS - 1) as usize;

/// A binary selection decision over an ordered set of assets.
///
/// Every assignment over `n` assets corresponds to exactly one index in `[0, 2ⁿ)`.
/// The correspondence is big-endian: the assignment renders as the `n`-wide binary
/// string of its index, so bit 0 of the index maps to the *last* asset.
/// [`Assignment::from_index`] and [`Assignment::index`] are the only places this
/// convention is implemented; everything else should go through them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Assignment(Vec<bool>);

impl Assignment {
    /// Decode an index into the assignment over `assets` assets.
    pub fn from_index(index: usize, assets: usize) -> Result<Self, AssignmentError> {
        if assets > MAX_ASSETS {
            return Err(AssignmentError::TooManyAssets(assets));
        }
        if index >> assets != 0 {
            return Err(AssignmentError::IndexOutOfRange { index, assets });
        }

        Ok(Self(
            (0..assets)
                .map(|j| (index >> (assets - 1 - j)) & 1 == 1)
                .collect(),
        ))
    }

    /// Encode this assignment back into its index. Inverse of [`Assignment::from_index`].
    pub fn index(&self) -> usize {
        self.0
            .iter()
            .fold(0, |acc, &bit| (acc << 1) | usize::from(bit))
    }

    /// The number of assets the assignment ranges over
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the assignment ranges over no assets at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the asset at `position` is selected
    pub fn get(&self, position: usize) -> Option<bool> {
        self.0.get(position).copied()
    }

    /// The number of selected assets
    pub fn selected(&self) -> usize {
        self.0.iter().filter(|&&bit| bit).count()
    }

    /// The positions of the selected assets, in ascending order
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(j, &bit)| bit.then_some(j))
    }

    /// The selection flags, one per asset
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for Assignment {
    fn from(value: Vec<bool>) -> Self {
        Self(value)
    }
}

impl FromStr for Assignment {
    type Err = AssignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(AssignmentError::InvalidDigit(other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for Assignment {
    type Error = AssignmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Assignment> for String {
    fn from(value: Assignment) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in self.0.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Errors that can occur when decoding or parsing an assignment
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum AssignmentError {
    /// Error when the assignment space cannot be indexed
    #[error("{0} assets exceed the indexable limit of {MAX_ASSETS}")]
    TooManyAssets(usize),
    /// Error when an index does not fit in the assignment space
    #[error("index {index} is outside the assignment space of {assets} assets")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// The number of assets
        assets: usize,
    },
    /// Error when a bitstring contains something other than 0 or 1
    #[error("invalid bitstring digit {0:?}")]
    InvalidDigit(char),
}
