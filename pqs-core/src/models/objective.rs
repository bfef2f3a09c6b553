use super::Assignment;

/// The soft form of the budget constraint `1ᵀx = budget`.
///
/// The constraint is enforced by adding `weight · (1ᵀx − budget)²` to the
/// objective, which vanishes exactly on feasible assignments.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BudgetPenalty {
    /// The multiplier on the squared constraint violation
    pub weight: f64,
    /// The number of assets that must be selected
    pub budget: usize,
}

impl BudgetPenalty {
    /// The penalty incurred by selecting `selected` assets
    pub fn apply(&self, selected: usize) -> f64 {
        let violation = selected as f64 - self.budget as f64;
        self.weight * violation * violation
    }
}

/// A quadratic objective over binary vectors:
/// `f(x) = constant + Σᵢ linearᵢ·xᵢ + Σᵢ≤ⱼ quadraticᵢⱼ·xᵢ·xⱼ`.
///
/// Only the upper triangle (diagonal included) of the quadratic coefficients
/// is stored. The lower triangle is implied by symmetry, so
/// [`QuadraticObjective::quadratic`] answers for either order of indices.
/// Any penalty folded into the coefficients is kept alongside them so that its
/// contribution can be reported separately.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QuadraticObjective {
    linear: Vec<f64>,
    quadratic: Vec<Vec<f64>>,
    constant: f64,
    penalty: BudgetPenalty,
}

/// The outcome of evaluating an objective on one assignment
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// The full objective value, penalty and constant included
    pub value: f64,
    /// The part of the value contributed by the budget penalty
    pub penalty: f64,
    /// Whether the assignment satisfies the budget exactly
    pub feasible: bool,
}

impl QuadraticObjective {
    /// An objective over `assets` variables with every coefficient zero
    pub fn zeros(assets: usize, penalty: BudgetPenalty) -> Self {
        Self {
            linear: vec![0.0; assets],
            quadratic: vec![vec![0.0; assets]; assets],
            constant: 0.0,
            penalty,
        }
    }

    /// Add to the coefficient of `x[i]`
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn add_linear(&mut self, i: usize, coefficient: f64) {
        self.linear[i] += coefficient;
    }

    /// Add to the coefficient of `x[i]·x[j]`, stored in the upper triangle
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn add_quadratic(&mut self, i: usize, j: usize, coefficient: f64) {
        let (row, col) = if i <= j { (i, j) } else { (j, i) };
        self.quadratic[row][col] += coefficient;
    }

    /// Add to the constant offset
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// The number of binary variables
    pub fn len(&self) -> usize {
        self.linear.len()
    }

    /// Whether the objective has no variables
    pub fn is_empty(&self) -> bool {
        self.linear.is_empty()
    }

    /// The linear coefficients
    pub fn linear(&self) -> &[f64] {
        &self.linear
    }

    /// The coefficient of `x[i]·x[j]`, symmetric in its arguments
    pub fn quadratic(&self, i: usize, j: usize) -> Option<f64> {
        let (row, col) = if i <= j { (i, j) } else { (j, i) };
        self.quadratic.get(row).and_then(|r| r.get(col)).copied()
    }

    /// The constant offset
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// The budget penalty folded into the coefficients
    pub fn penalty(&self) -> &BudgetPenalty {
        &self.penalty
    }

    /// Evaluate the objective on an assignment, or None if the lengths disagree
    pub fn evaluate(&self, x: &Assignment) -> Option<Evaluation> {
        if x.len() != self.len() {
            return None;
        }

        // Only selected variables contribute, so we walk their positions once
        let selected = x.positions().collect::<Vec<_>>();
        let mut value = self.constant;
        for (a, &i) in selected.iter().enumerate() {
            let row = &self.quadratic[i];
            value += self.linear[i] + row[i];
            for &j in selected[a + 1..].iter() {
                value += row[j];
            }
        }

        Some(Evaluation {
            value,
            penalty: self.penalty.apply(selected.len()),
            feasible: selected.len() == self.penalty.budget,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objective() -> QuadraticObjective {
        let mut f = QuadraticObjective::zeros(
            3,
            BudgetPenalty {
                weight: 2.0,
                budget: 1,
            },
        );
        f.add_linear(0, 1.0);
        f.add_linear(2, -1.0);
        f.add_quadratic(1, 1, 0.5);
        f.add_quadratic(2, 0, 3.0);
        f.add_constant(0.25);
        f
    }

    #[test]
    fn test_symmetric_lookup() {
        let f = objective();
        assert_eq!(f.quadratic(0, 2), Some(3.0));
        assert_eq!(f.quadratic(2, 0), Some(3.0));
        assert_eq!(f.quadratic(1, 0), Some(0.0));
        assert_eq!(f.quadratic(3, 0), None);
    }

    #[test]
    fn test_evaluate() {
        let f = objective();
        let value = |s: &str| f.evaluate(&s.parse().unwrap()).unwrap().value;
        assert_eq!(value("000"), 0.25);
        assert_eq!(value("100"), 1.25);
        assert_eq!(value("010"), 0.75);
        assert_eq!(value("101"), 0.25 + 1.0 - 1.0 + 3.0);
        assert_eq!(value("111"), 0.25 + 1.0 - 1.0 + 0.5 + 3.0);
    }

    #[test]
    fn test_penalty_and_feasibility() {
        let f = objective();
        let eval = f.evaluate(&"010".parse().unwrap()).unwrap();
        assert!(eval.feasible);
        assert_eq!(eval.penalty, 0.0);

        let eval = f.evaluate(&"111".parse().unwrap()).unwrap();
        assert!(!eval.feasible);
        assert_eq!(eval.penalty, 8.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(objective().evaluate(&"01".parse().unwrap()), None);
    }
}
