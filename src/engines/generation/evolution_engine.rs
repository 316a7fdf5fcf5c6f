use crate::config::traits::ConfigSection;
use crate::config::GeneticAlgorithmConfig;
use crate::engines::evaluation::{EvaluatorFactory, ParallelEvaluator};
use crate::engines::generation::{
    crossover::{create_crossover_operator, CrossoverOperator},
    elite_archive::EliteArchive,
    operators::{init_solution, mutate, tournament_selection},
    pool::SolutionPool,
    problem::Problem,
    progress::ProgressCallback,
    random::Rand,
    solution::{Population, SolutionId, SolutionRef, INVALID_FITNESS},
};
use crate::error::{EvoError, Result};

/// Generational genetic algorithm with elitism and tournament selection.
///
/// All solutions live in one [`SolutionPool`] of `2 * population_size` slots.
/// Each generation the parent buffer is scored on the worker pool, the elite
/// archive absorbs the scored parents, and the offspring buffer is rebuilt
/// from the archive plus mutated crossover children. The two buffers then
/// swap roles.
pub struct GeneticAlgorithm<'p, R: Rand> {
    problem: &'p Problem,
    config: GeneticAlgorithmConfig,
    rng: R,
    pool: SolutionPool,
    parents: Population,
    offspring: Population,
    elite_archive: EliteArchive,
    evaluator: ParallelEvaluator,
    crossover: Box<dyn CrossoverOperator>,
    iteration: usize,
}

impl<'p, R: Rand> GeneticAlgorithm<'p, R> {
    /// Validate `config` and start the evaluation workers.
    pub fn new<F>(
        problem: &'p Problem,
        factory: &F,
        config: GeneticAlgorithmConfig,
        rng: R,
    ) -> Result<Self>
    where
        F: EvaluatorFactory + ?Sized,
    {
        config.validate()?;
        if problem.dimension() == 0 {
            return Err(EvoError::Configuration(
                "Problem must have at least one variable".to_string()
            ));
        }

        let pool = SolutionPool::new(config.pool_capacity(), problem.dimension());
        let evaluator = ParallelEvaluator::new(factory, config.thread_count)?;
        let crossover = create_crossover_operator(&config.crossover);

        Ok(Self {
            problem,
            rng,
            pool,
            parents: Vec::with_capacity(config.population_size),
            offspring: Vec::with_capacity(config.population_size),
            elite_archive: EliteArchive::new(config.elite_count),
            evaluator,
            crossover,
            iteration: 0,
            config,
        })
    }

    /// Run every generation of the iteration budget.
    pub fn run(&mut self) -> Result<()> {
        self.run_with_progress(&mut ())
    }

    /// Run the evolution process, reporting each generation to `callback`.
    ///
    /// Once the budget is spent further calls return immediately.
    pub fn run_with_progress<C: ProgressCallback + ?Sized>(&mut self, callback: &mut C) -> Result<()> {
        if self.iteration >= self.config.max_iteration {
            return Ok(());
        }

        if self.parents.is_empty() {
            self.init_population()?;
        }

        log::info!(
            "Starting evolution: {} generations, population {}, {} variables, {} workers",
            self.config.max_iteration,
            self.config.population_size,
            self.problem.dimension(),
            self.evaluator.thread_count()
        );

        while self.iteration < self.config.max_iteration {
            callback.on_generation_start(self.iteration);
            self.step()?;

            let best_fitness = self.best().map(|s| s.fitness).unwrap_or(INVALID_FITNESS);
            log::debug!(
                "Generation {}: best fitness {:.6}, {} elites, {} slots in use",
                self.iteration,
                best_fitness,
                self.elite_archive.len(),
                self.pool.outstanding()
            );
            callback.on_generation_complete(self.iteration, best_fitness, self.elite_archive.len());

            self.iteration += 1;
        }

        log::info!(
            "Evolution finished after {} generations, best fitness {:?}",
            self.iteration,
            self.best().map(|s| s.fitness)
        );
        Ok(())
    }

    fn init_population(&mut self) -> Result<()> {
        for _ in 0..self.config.population_size {
            let id = self.allocate()?;
            init_solution(self.problem, &mut self.pool, id, &mut self.rng);
            self.parents.push(id);
        }
        Ok(())
    }

    /// One generation: evaluate the parents, then breed the next parents.
    fn step(&mut self) -> Result<()> {
        Self::clear_population(&mut self.pool, &mut self.offspring);

        self.evaluator.evaluate(&self.parents, &mut self.pool)?;
        // Carried-over elites were just scored again
        self.elite_archive.resort(&self.pool);
        for &id in &self.parents {
            // Members already in the archive are not inserted twice
            if !self.pool.is_elite(id) {
                self.elite_archive.add(id, &mut self.pool);
            }
        }

        self.offspring.extend_from_slice(self.elite_archive.members());

        let population_size = self.config.population_size;
        while self.offspring.len() < population_size {
            let (first, second) = self.breed_pair()?;

            mutate(self.problem, self.pool.genes_mut(first), self.config.mutation_rate, &mut self.rng);
            self.offspring.push(first);

            if self.offspring.len() < population_size {
                mutate(self.problem, self.pool.genes_mut(second), self.config.mutation_rate, &mut self.rng);
                self.offspring.push(second);
            } else {
                self.pool.deallocate(second);
            }
        }

        std::mem::swap(&mut self.parents, &mut self.offspring);
        Ok(())
    }

    /// Select two parents, copy them and cross the copies over.
    fn breed_pair(&mut self) -> Result<(SolutionId, SolutionId)> {
        let tournament_size = self.config.tournament_size;
        let parent1 = tournament_selection(&self.parents, &self.pool, tournament_size, &mut self.rng)
            .ok_or_else(|| EvoError::Configuration("Cannot select from an empty population".to_string()))?;
        let parent2 = tournament_selection(&self.parents, &self.pool, tournament_size, &mut self.rng)
            .ok_or_else(|| EvoError::Configuration("Cannot select from an empty population".to_string()))?;

        let first = self.copy(parent1)?;
        let second = match self.copy(parent2) {
            Ok(second) => second,
            Err(err) => {
                self.pool.set_elite(first, false);
                self.pool.deallocate(first);
                return Err(err);
            }
        };
        self.pool.set_elite(first, false);
        self.pool.set_elite(second, false);

        if let Some((genes1, genes2)) = self.pool.pair_mut(first, second) {
            self.crossover.perform(genes1, genes2, &mut self.rng);
        }
        Ok((first, second))
    }

    /// Release every non-elite member and empty the buffer.
    fn clear_population(pool: &mut SolutionPool, population: &mut Population) {
        for &id in population.iter() {
            if !pool.is_elite(id) {
                pool.deallocate(id);
            }
        }
        population.clear();
    }

    fn allocate(&mut self) -> Result<SolutionId> {
        self.pool.allocate().ok_or(EvoError::PoolExhausted {
            capacity: self.pool.capacity(),
        })
    }

    fn copy(&mut self, src: SolutionId) -> Result<SolutionId> {
        self.pool.copy(src).ok_or(EvoError::PoolExhausted {
            capacity: self.pool.capacity(),
        })
    }

    /// Best solution found so far, if any generation has been evaluated.
    pub fn best(&self) -> Option<SolutionRef<'_>> {
        self.elite_archive.best().map(|id| self.pool.get(id))
    }

    /// The whole elite archive, best first.
    pub fn bests(&self) -> Vec<SolutionRef<'_>> {
        self.elite_archive.resolve(&self.pool).collect()
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn config(&self) -> &GeneticAlgorithmConfig {
        &self.config
    }

    pub fn pool(&self) -> &SolutionPool {
        &self.pool
    }

    pub fn elite_archive(&self) -> &EliteArchive {
        &self.elite_archive
    }

    /// Current parent buffer, i.e. the population the next generation scores.
    pub fn population(&self) -> &[SolutionId] {
        &self.parents
    }
}
