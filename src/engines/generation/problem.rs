use super::random::Rand;
use super::solution::Value;
use serde::{Deserialize, Serialize};

/// Integer decision variable over the half-open range `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    lower: Value,
    upper: Value,
}

impl Variable {
    pub fn new(lower: Value, upper: Value) -> Self {
        Self { lower, upper }
    }

    /// Variable over `[0, upper)`.
    pub fn upto(upper: Value) -> Self {
        Self::new(0, upper)
    }

    pub fn lower(&self) -> Value {
        self.lower
    }

    pub fn upper(&self) -> Value {
        self.upper
    }

    fn range(&self) -> i64 {
        i64::from(self.upper) - i64::from(self.lower)
    }

    /// Uniform draw from the variable's range.
    ///
    /// A degenerate range always yields `lower` and consumes no randomness.
    pub fn sample(&self, rng: &mut dyn Rand) -> Value {
        let range = self.range();
        if range <= 0 {
            return self.lower;
        }
        let delta = rng.next_int(range as usize) as i64;
        (i64::from(self.lower) + delta) as Value
    }

    /// Wrap `value` back into range.
    pub fn clamp(&self, value: Value) -> Value {
        let range = self.range();
        if range <= 0 {
            return self.lower;
        }
        let offset = (i64::from(value) - i64::from(self.lower)).rem_euclid(range);
        (i64::from(self.lower) + offset) as Value
    }

    pub fn contains(&self, value: Value) -> bool {
        value >= self.lower && value < self.upper
    }
}

/// Fixed-size vector of bounded integer variables.
///
/// Sampling draws one integer per non-degenerate variable, in index order.
/// Degenerate variables (`upper <= lower`) take no draw, so adding or removing
/// one does not shift the random sequence seen by the other variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    variables: Vec<Variable>,
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(dimension: usize) -> Self {
        Self {
            variables: Vec::with_capacity(dimension),
        }
    }

    /// `dimension` copies of the same variable.
    pub fn uniform(dimension: usize, variable: Variable) -> Self {
        Self {
            variables: vec![variable; dimension],
        }
    }

    pub fn push(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn dimension(&self) -> usize {
        self.variables.len()
    }
}

impl FromIterator<Variable> for Problem {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::random::ScriptedRand;

    #[test]
    fn test_sample_within_bounds() {
        let mut rng = ScriptedRand::with_ints(vec![3, 4, 5]);
        let variable = Variable::upto(4);

        assert_eq!(variable.sample(&mut rng), 3);
        assert_eq!(variable.sample(&mut rng), 0);
        assert_eq!(variable.sample(&mut rng), 1);
    }

    #[test]
    fn test_sample_offsets_by_lower_bound() {
        let mut rng = ScriptedRand::with_ints(vec![15, 41]);
        let variable = Variable::new(2, 5);

        assert_eq!(variable.sample(&mut rng), 2);
        assert_eq!(variable.sample(&mut rng), 4);
    }

    #[test]
    fn test_degenerate_variable_consumes_nothing() {
        let mut rng = ScriptedRand::with_ints(vec![1, 2]);
        let fixed = Variable::new(2, 2);

        assert_eq!(fixed.sample(&mut rng), 2);
        // The script was not advanced
        assert_eq!(Variable::upto(10).sample(&mut rng), 1);
    }

    #[test]
    fn test_clamp_wraps_around() {
        let variable = Variable::new(2, 5);
        assert_eq!(variable.clamp(3), 3);
        assert_eq!(variable.clamp(1), 4);
        assert_eq!(variable.clamp(5), 2);
        assert_eq!(variable.clamp(9), 3);
        assert_eq!(variable.clamp(-4), 2);
        assert!(variable.contains(4));
        assert!(!variable.contains(5));
    }

    #[test]
    fn test_problem_dimension() {
        let mut problem = Problem::with_capacity(3);
        problem.push(Variable::upto(3));
        problem.push(Variable::new(2, 5));
        assert_eq!(problem.dimension(), 2);

        let uniform = Problem::uniform(100, Variable::upto(2));
        assert_eq!(uniform.dimension(), 100);
        assert!(uniform.variables().iter().all(|v| v.upper() == 2));
    }
}
