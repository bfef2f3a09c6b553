use super::{Assignment, Evaluation};
use std::cmp::Ordering;

/// An assignment together with its objective value and the probability a solver gave it
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedEntry {
    /// The canonical index of the assignment
    pub index: usize,
    /// The selection decision
    pub assignment: Assignment,
    /// The objective value, computed independently of the solver
    pub value: f64,
    /// The part of the value due to the budget penalty
    pub penalty: f64,
    /// Whether the assignment meets the budget exactly
    pub feasible: bool,
    /// The weight the solver assigned
    pub probability: f64,
}

impl RankedEntry {
    /// Pair an assignment's evaluation with its probability
    pub fn new(assignment: Assignment, evaluation: Evaluation, probability: f64) -> Self {
        Self {
            index: assignment.index(),
            assignment,
            value: evaluation.value,
            penalty: evaluation.penalty,
            feasible: evaluation.feasible,
            probability,
        }
    }

    fn by_value(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then(self.index.cmp(&other.index))
    }
}

/// Evaluated assignments, ordered by decreasing probability.
///
/// Entries with equal probability are ordered by increasing index, so the
/// ranking is fully deterministic. The first entry is the solver's most probable
/// assignment, which need not be the true minimizer of the objective;
/// [`RankedResult::minimum`] resolves that separately.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RankedResult(Vec<RankedEntry>);

impl RankedResult {
    /// Order the entries by probability, breaking ties by index
    pub fn new(mut entries: Vec<RankedEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then(a.index.cmp(&b.index))
        });
        Self(entries)
    }

    /// The most probable entry, reported as the headline solution
    pub fn most_probable(&self) -> Option<&RankedEntry> {
        self.0.first()
    }

    /// The entry with the lowest objective value (lowest index on ties)
    pub fn minimum(&self) -> Option<&RankedEntry> {
        self.0.iter().min_by(|a, b| a.by_value(b))
    }

    /// The feasible entry with the lowest objective value, if any entry is feasible
    pub fn feasible_minimum(&self) -> Option<&RankedEntry> {
        self.0
            .iter()
            .filter(|entry| entry.feasible)
            .min_by(|a, b| a.by_value(b))
    }

    /// Whether the most probable entry attains the minimum objective value.
    ///
    /// Disagreement means the solver concentrated its probability away from the
    /// optimum, which is a signal of solver quality rather than an error.
    pub fn agrees(&self) -> bool {
        match (self.most_probable(), self.minimum()) {
            (Some(best), Some(min)) => best.value == min.value,
            _ => true,
        }
    }

    /// The first `k` entries
    pub fn top(&self, k: usize) -> &[RankedEntry] {
        &self.0[..k.min(self.0.len())]
    }

    /// The number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the entries in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, RankedEntry> {
        self.0.iter()
    }
}

impl IntoIterator for RankedResult {
    type Item = RankedEntry;
    type IntoIter = std::vec::IntoIter<RankedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, value: f64, probability: f64) -> RankedEntry {
        RankedEntry::new(
            Assignment::from_index(index, 2).unwrap(),
            Evaluation {
                value,
                penalty: 0.0,
                feasible: index == 1 || index == 2,
            },
            probability,
        )
    }

    #[test]
    fn test_order() {
        let result = RankedResult::new(vec![
            entry(0, 4.0, 0.1),
            entry(1, 1.0, 0.4),
            entry(2, 0.5, 0.1),
            entry(3, 2.0, 0.4),
        ]);
        let order = result.iter().map(|e| e.index).collect::<Vec<_>>();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_minimum_and_agreement() {
        let result = RankedResult::new(vec![
            entry(0, 4.0, 0.7),
            entry(1, 1.0, 0.1),
            entry(2, 0.5, 0.1),
            entry(3, 0.5, 0.1),
        ]);
        assert_eq!(result.most_probable().unwrap().index, 0);
        assert_eq!(result.minimum().unwrap().index, 2);
        assert_eq!(result.feasible_minimum().unwrap().index, 2);
        assert!(!result.agrees());

        let result = RankedResult::new(vec![entry(0, 4.0, 0.0), entry(2, 0.5, 1.0)]);
        assert!(result.agrees());
    }

    #[test]
    fn test_top() {
        let result = RankedResult::new(vec![entry(0, 4.0, 0.5), entry(1, 1.0, 0.5)]);
        assert_eq!(result.top(1).len(), 1);
        assert_eq!(result.top(10).len(), 2);
        assert!(RankedResult::default().agrees());
    }
}
