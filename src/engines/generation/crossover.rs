use super::random::Rand;
use super::solution::Value;
use crate::config::{CrossoverConfig, CrossoverMethod};

/// Recombines two equal-length gene sequences in place.
pub trait CrossoverOperator: Send {
    fn perform(&self, first: &mut [Value], second: &mut [Value], rng: &mut dyn Rand);
}

/// Swap the tail `[point, dimension)` at one uniform point.
pub struct SinglePointCrossover;

impl CrossoverOperator for SinglePointCrossover {
    fn perform(&self, first: &mut [Value], second: &mut [Value], rng: &mut dyn Rand) {
        let len = first.len().min(second.len());
        if len == 0 {
            return;
        }
        let point = rng.next_int(len);
        first[point..len].swap_with_slice(&mut second[point..len]);
    }
}

/// Swap the inclusive segment between two uniform points.
pub struct TwoPointCrossover;

impl CrossoverOperator for TwoPointCrossover {
    fn perform(&self, first: &mut [Value], second: &mut [Value], rng: &mut dyn Rand) {
        let len = first.len().min(second.len());
        if len == 0 {
            return;
        }
        let mut low = rng.next_int(len);
        let mut high = rng.next_int(len);
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }
        first[low..=high].swap_with_slice(&mut second[low..=high]);
    }
}

/// Swap each position independently with probability one half.
pub struct UniformCrossover;

impl CrossoverOperator for UniformCrossover {
    fn perform(&self, first: &mut [Value], second: &mut [Value], rng: &mut dyn Rand) {
        for (a, b) in first.iter_mut().zip(second.iter_mut()) {
            if rng.next_int(2) == 1 {
                std::mem::swap(a, b);
            }
        }
    }
}

/// Build the operator selected by `config`. `alpha` is not consulted.
pub fn create_crossover_operator(config: &CrossoverConfig) -> Box<dyn CrossoverOperator> {
    match config.method {
        CrossoverMethod::OnePoint => Box::new(SinglePointCrossover),
        CrossoverMethod::TwoPoint => Box::new(TwoPointCrossover),
        CrossoverMethod::Uniform => Box::new(UniformCrossover),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::random::ScriptedRand;

    fn operator(method: CrossoverMethod) -> Box<dyn CrossoverOperator> {
        create_crossover_operator(&CrossoverConfig::new(method))
    }

    #[test]
    fn test_single_point() {
        let crossover = operator(CrossoverMethod::OnePoint);
        let mut sol1 = [1, 2, 3, 4, 5];
        let mut sol2 = [6, 7, 8, 9, 0];

        let mut rng = ScriptedRand::with_ints(vec![3]);
        crossover.perform(&mut sol1, &mut sol2, &mut rng);
        assert_eq!(sol1, [1, 2, 3, 9, 0]);
        assert_eq!(sol2, [6, 7, 8, 4, 5]);

        // Point zero swaps everything
        rng.set_ints(vec![0]);
        crossover.perform(&mut sol1, &mut sol2, &mut rng);
        assert_eq!(sol1, [6, 7, 8, 4, 5]);
        assert_eq!(sol2, [1, 2, 3, 9, 0]);

        rng.set_ints(vec![4]);
        crossover.perform(&mut sol1, &mut sol2, &mut rng);
        assert_eq!(sol1, [6, 7, 8, 4, 0]);
        assert_eq!(sol2, [1, 2, 3, 9, 5]);
    }

    #[test]
    fn test_two_point_orders_points() {
        let crossover = operator(CrossoverMethod::TwoPoint);
        let mut sol1 = [1, 2, 3, 4, 5];
        let mut sol2 = [6, 7, 8, 9, 0];

        // Drawn as (3, 1), applied as [1, 3]
        let mut rng = ScriptedRand::with_ints(vec![3, 1]);
        crossover.perform(&mut sol1, &mut sol2, &mut rng);
        assert_eq!(sol1, [1, 7, 8, 9, 5]);
        assert_eq!(sol2, [6, 2, 3, 4, 0]);

        rng.set_ints(vec![2, 0]);
        crossover.perform(&mut sol1, &mut sol2, &mut rng);
        assert_eq!(sol1, [6, 2, 3, 9, 5]);
        assert_eq!(sol2, [1, 7, 8, 4, 0]);

        // Equal points swap a single gene
        rng.set_ints(vec![4, 4]);
        crossover.perform(&mut sol1, &mut sol2, &mut rng);
        assert_eq!(sol1, [6, 2, 3, 9, 0]);
        assert_eq!(sol2, [1, 7, 8, 4, 5]);
    }

    #[test]
    fn test_uniform() {
        let crossover = operator(CrossoverMethod::Uniform);
        let mut sol1 = [1, 2, 3];
        let mut sol2 = [4, 5, 6];

        let mut rng = ScriptedRand::with_ints(vec![1, 0]);
        crossover.perform(&mut sol1, &mut sol2, &mut rng);
        assert_eq!(sol1, [4, 2, 6]);
        assert_eq!(sol2, [1, 5, 3]);
    }

    #[test]
    fn test_empty_genes_draw_nothing() {
        let mut rng = ScriptedRand::with_ints(vec![1, 2]);
        let mut empty1: [Value; 0] = [];
        let mut empty2: [Value; 0] = [];
        operator(CrossoverMethod::TwoPoint).perform(&mut empty1, &mut empty2, &mut rng);
        assert_eq!(rng.next_int(10), 1);
    }
}
