use anyhow::bail;
use evopool::{
    BinPackingFactory, BinPackingInstance, ChannelProgressCallback, CrossoverConfig,
    CrossoverMethod, EvoError, Evaluator, GeneticAlgorithm, GeneticAlgorithmConfig, Problem,
    ProgressMessage, SeededRand, Value, Variable,
};
use std::sync::mpsc;

/// Counts the ones in a binary string.
struct OneMax;

impl Evaluator for OneMax {
    fn evaluate(&mut self, genes: &[Value]) -> anyhow::Result<f64> {
        Ok(genes.iter().filter(|&&g| g == 1).count() as f64)
    }
}

fn one_max() -> Box<dyn Evaluator> {
    Box::new(OneMax)
}

/// Create a small configuration for fast testing
fn create_test_config(max_iteration: usize) -> GeneticAlgorithmConfig {
    GeneticAlgorithmConfig {
        population_size: 10,
        tournament_size: 3,
        elite_count: 5,
        thread_count: 4,
        max_iteration,
        crossover: CrossoverConfig::new(CrossoverMethod::OnePoint),
        mutation_rate: 0.01,
    }
}

fn binary_problem(dimension: usize) -> Problem {
    Problem::uniform(dimension, Variable::upto(2))
}

#[test]
fn test_one_max_improves() {
    let problem = binary_problem(100);
    let mut engine =
        GeneticAlgorithm::new(&problem, &one_max, create_test_config(1000), SeededRand::seed_from_u64(123))
            .unwrap();

    engine.run().unwrap();
    assert_eq!(engine.iteration(), 1000);

    let best = engine.best().expect("a best solution after a full run");
    println!("Best OneMax fitness: {}", best.fitness);
    assert!(best.fitness > 70.0, "best fitness {} too low", best.fitness);
    assert_eq!(best.genes.len(), 100);
    assert!(best.elite);
}

#[test]
fn test_every_crossover_method_runs() {
    let problem = binary_problem(40);
    for method in [CrossoverMethod::OnePoint, CrossoverMethod::TwoPoint, CrossoverMethod::Uniform] {
        let mut config = create_test_config(50);
        config.crossover = CrossoverConfig::with_alpha(method, 0.3);

        let mut engine =
            GeneticAlgorithm::new(&problem, &one_max, config, SeededRand::seed_from_u64(7)).unwrap();
        engine.run().unwrap();

        let best = engine.best().unwrap();
        assert!(best.fitness >= 20.0, "{:?} stalled at {}", method, best.fitness);
    }
}

#[test]
fn test_state_invariants_after_run() {
    let problem = Problem::from_iter([Variable::new(-3, 3), Variable::upto(2), Variable::new(10, 20)]);
    let config = create_test_config(200);
    let population_size = config.population_size;
    let elite_count = config.elite_count;

    let factory = || -> Box<dyn Evaluator> { Box::new(SumEvaluator) };
    let mut engine =
        GeneticAlgorithm::new(&problem, &factory, config, SeededRand::seed_from_u64(99)).unwrap();
    engine.run().unwrap();

    let bests = engine.bests();
    assert_eq!(bests.len(), elite_count);
    assert!(bests.windows(2).all(|w| w[0].fitness >= w[1].fitness));
    assert!(bests.iter().all(|s| s.elite));
    assert_eq!(engine.pool().count_elites(), bests.len());

    let pool = engine.pool();
    assert!(pool.outstanding() <= 2 * population_size);
    assert_eq!(pool.capacity(), 2 * population_size);
    assert_eq!(engine.population().len(), population_size);

    for &id in engine.population() {
        for (variable, &gene) in problem.variables().iter().zip(pool.genes(id)) {
            assert!(variable.contains(gene), "gene {} outside {:?}", gene, variable);
        }
    }

    // The maximum of the sum is 2 + 1 + 19
    assert!(engine.best().unwrap().fitness <= 22.0);
}

struct SumEvaluator;

impl Evaluator for SumEvaluator {
    fn evaluate(&mut self, genes: &[Value]) -> anyhow::Result<f64> {
        Ok(genes.iter().map(|&g| f64::from(g)).sum())
    }
}

#[test]
fn test_same_seed_same_result() {
    let problem = binary_problem(60);

    let run = |seed: u64| {
        let mut engine =
            GeneticAlgorithm::new(&problem, &one_max, create_test_config(100), SeededRand::seed_from_u64(seed))
                .unwrap();
        engine.run().unwrap();
        let bests: Vec<(f64, Vec<Value>)> = engine
            .bests()
            .iter()
            .map(|s| (s.fitness, s.genes.to_vec()))
            .collect();
        bests
    };

    assert_eq!(run(2024), run(2024));
}

#[test]
fn test_best_fitness_never_decreases() {
    let problem = binary_problem(50);
    let mut engine =
        GeneticAlgorithm::new(&problem, &one_max, create_test_config(30), SeededRand::seed_from_u64(5)).unwrap();

    let (sender, receiver) = mpsc::channel();
    let mut callback = ChannelProgressCallback::new(sender);
    engine.run_with_progress(&mut callback).unwrap();
    drop(callback);

    let messages: Vec<ProgressMessage> = receiver.iter().collect();
    assert_eq!(messages.len(), 60);

    let mut previous = f64::NEG_INFINITY;
    let mut completed = 0;
    for message in messages {
        if let ProgressMessage::GenerationComplete {
            generation,
            best_fitness,
            archive_size,
        } = message
        {
            assert_eq!(generation, completed);
            assert!(best_fitness >= previous);
            assert!(archive_size <= 5);
            previous = best_fitness;
            completed += 1;
        }
    }
    assert_eq!(completed, 30);
}

#[test]
fn test_zero_iterations_has_no_best() {
    let problem = binary_problem(10);
    let mut engine =
        GeneticAlgorithm::new(&problem, &one_max, create_test_config(0), SeededRand::seed_from_u64(1)).unwrap();

    engine.run().unwrap();
    assert!(engine.best().is_none());
    assert!(engine.bests().is_empty());
}

#[test]
fn test_run_after_budget_is_a_no_op() {
    let problem = binary_problem(10);
    let mut engine =
        GeneticAlgorithm::new(&problem, &one_max, create_test_config(5), SeededRand::seed_from_u64(1)).unwrap();

    engine.run().unwrap();
    let before: Vec<f64> = engine.bests().iter().map(|s| s.fitness).collect();
    engine.run().unwrap();
    let after: Vec<f64> = engine.bests().iter().map(|s| s.fitness).collect();

    assert_eq!(engine.iteration(), 5);
    assert_eq!(before, after);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let problem = binary_problem(10);

    let mut no_elites = create_test_config(10);
    no_elites.elite_count = 0;
    let result = GeneticAlgorithm::new(&problem, &one_max, no_elites, SeededRand::seed_from_u64(1));
    assert!(matches!(result, Err(EvoError::Configuration(_))));

    let mut too_many_elites = create_test_config(10);
    too_many_elites.elite_count = 11;
    let result = GeneticAlgorithm::new(&problem, &one_max, too_many_elites, SeededRand::seed_from_u64(1));
    assert!(matches!(result, Err(EvoError::Configuration(_))));

    let empty = Problem::new();
    let result = GeneticAlgorithm::new(&empty, &one_max, create_test_config(10), SeededRand::seed_from_u64(1));
    assert!(matches!(result, Err(EvoError::Configuration(_))));
}

struct BrokenEvaluator;

impl Evaluator for BrokenEvaluator {
    fn evaluate(&mut self, _genes: &[Value]) -> anyhow::Result<f64> {
        bail!("simulator unavailable")
    }
}

#[test]
fn test_evaluator_failure_stops_the_run() {
    let problem = binary_problem(10);
    let factory = || -> Box<dyn Evaluator> { Box::new(BrokenEvaluator) };
    let mut engine =
        GeneticAlgorithm::new(&problem, &factory, create_test_config(10), SeededRand::seed_from_u64(1)).unwrap();

    match engine.run() {
        Err(EvoError::Evaluation { message, .. }) => assert!(message.contains("simulator unavailable")),
        other => panic!("expected evaluation error, got {:?}", other),
    }
    assert_eq!(engine.iteration(), 0);
    assert!(engine.best().is_none());
}

#[test]
fn test_bin_packing_finds_valid_packing() {
    let mut rng = SeededRand::seed_from_u64(42);
    let instance = BinPackingInstance::random(30, 30, 200, 100, &mut rng);
    let total: usize = instance.object_sizes.iter().sum();
    let lower_bound = total.div_ceil(200).max(1);

    let problem = Problem::uniform(30, Variable::upto(30));
    let factory = BinPackingFactory::new(instance);
    let mut config = create_test_config(300);
    config.population_size = 40;
    config.elite_count = 10;

    let mut engine = GeneticAlgorithm::new(&problem, &factory, config, rng).unwrap();
    engine.run().unwrap();

    let best = engine.best().unwrap();
    assert!(best.fitness > 0.0, "no valid packing found");
    let bins = (1.0 / best.fitness).round() as usize;
    println!("Packed into {} bins (lower bound {})", bins, lower_bound);
    assert!(bins >= lower_bound);
    assert!(bins < 30);
}

/// Sum of genes plus noise that changes on every call.
struct NoisySumEvaluator {
    calls: u64,
}

impl Evaluator for NoisySumEvaluator {
    fn evaluate(&mut self, genes: &[Value]) -> anyhow::Result<f64> {
        self.calls += 1;
        let noise = (self.calls.wrapping_mul(7919) % 1000) as f64 / 100.0;
        Ok(genes.iter().map(|&g| f64::from(g)).sum::<f64>() + noise)
    }
}

#[test]
fn test_archive_stays_sorted_with_noisy_evaluator() {
    let problem = Problem::uniform(8, Variable::upto(3));
    let factory = || -> Box<dyn Evaluator> { Box::new(NoisySumEvaluator { calls: 0 }) };
    let mut config = create_test_config(30);
    config.population_size = 20;
    config.elite_count = 8;
    config.thread_count = 1;

    let mut engine = GeneticAlgorithm::new(&problem, &factory, config, SeededRand::seed_from_u64(11)).unwrap();
    engine.run().unwrap();

    let fitness: Vec<f64> = engine.bests().iter().map(|s| s.fitness).collect();
    assert_eq!(fitness.len(), 8);
    assert!(
        fitness.windows(2).all(|w| w[0] >= w[1]),
        "archive out of order: {:?}",
        fitness
    );
    assert_eq!(engine.best().unwrap().fitness, fitness[0]);
    assert_eq!(engine.pool().count_elites(), 8);
}
