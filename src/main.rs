use anyhow::{Context, Result};
use evopool::{
    BinPackingFactory, BinPackingInstance, ConfigManager, ConsoleProgressCallback, GeneticAlgorithm, Problem,
    SeededRand, Variable,
};

const OBJECT_COUNT: usize = 100;
const BIN_COUNT: usize = 100;
const BIN_SIZE: usize = 200;

fn main() -> Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    let argument = std::env::args().nth(1);
    if argument.as_deref() == Some("--describe-config") {
        for (section, manifest) in manager.get().manifests() {
            println!("[{}]", section);
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        return Ok(());
    }
    if let Some(path) = argument {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?;
    }
    let config = manager.get();

    let mut rng = SeededRand::from_optional_seed(config.run.seed);
    let instance = BinPackingInstance::random(OBJECT_COUNT, BIN_COUNT, BIN_SIZE, BIN_SIZE / 2, &mut rng);
    let problem = Problem::uniform(OBJECT_COUNT, Variable::upto(BIN_COUNT as i32));
    let factory = BinPackingFactory::new(instance);

    let generations = config.evolution.max_iteration;
    let mut engine = GeneticAlgorithm::new(&problem, &factory, config.evolution, rng)?;
    let mut progress = ConsoleProgressCallback::new(100, generations);
    engine.run_with_progress(&mut progress)?;

    match engine.best() {
        Some(best) => {
            let bins = if best.fitness > 0.0 { (1.0 / best.fitness).round() } else { f64::NAN };
            log::info!("Best packing uses {} bins", bins);
            println!("{}", serde_json::to_string_pretty(&best.to_owned_solution())?);
        }
        None => println!("No generations were run"),
    }

    Ok(())
}
