use crate::engines::generation::pool::SolutionPool;
use crate::engines::generation::problem::Problem;
use crate::engines::generation::random::Rand;
use crate::engines::generation::solution::{SolutionId, Value, INVALID_FITNESS};

/// Tournament selection: pick best of K random candidates.
///
/// Candidates are drawn uniformly with replacement. Only a strictly greater
/// fitness displaces the current winner, so the first candidate seen wins ties.
pub fn tournament_selection(
    population: &[SolutionId],
    pool: &SolutionPool,
    tournament_size: usize,
    rng: &mut dyn Rand,
) -> Option<SolutionId> {
    if population.is_empty() {
        return None;
    }

    let mut best = population[rng.next_int(population.len())];
    let mut best_fitness = pool.fitness(best);

    for _ in 1..tournament_size {
        let candidate = population[rng.next_int(population.len())];
        let fitness = pool.fitness(candidate);
        if fitness > best_fitness {
            best = candidate;
            best_fitness = fitness;
        }
    }

    Some(best)
}

/// Mutation: resample each gene within its variable's bounds with
/// probability `mutation_rate`.
pub fn mutate(problem: &Problem, genes: &mut [Value], mutation_rate: f64, rng: &mut dyn Rand) {
    for (gene, variable) in genes.iter_mut().zip(problem.variables()) {
        if rng.next_double() <= mutation_rate {
            *gene = variable.sample(rng);
        }
    }
}

/// Fill a fresh solution with one sample per variable and mark it unevaluated.
pub fn init_solution(problem: &Problem, pool: &mut SolutionPool, id: SolutionId, rng: &mut dyn Rand) {
    for (gene, variable) in pool.genes_mut(id).iter_mut().zip(problem.variables()) {
        *gene = variable.sample(rng);
    }
    pool.set_fitness(id, INVALID_FITNESS);
    pool.set_elite(id, false);
}
