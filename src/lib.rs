//! Generational genetic algorithm over bounded integer variables.
//!
//! Solutions live in a fixed-capacity [`SolutionPool`] sized once per run,
//! fitness evaluation is spread over a persistent [`ParallelEvaluator`]
//! worker pool, and the best solutions seen are kept in an [`EliteArchive`].

pub mod config;
pub mod engines;
pub mod error;

pub use engines::evaluation::{
    BinPackingEvaluator, BinPackingFactory, BinPackingInstance, Evaluator, EvaluatorFactory, ParallelEvaluator,
};
pub use engines::generation::{
    ChannelProgressCallback, ConsoleProgressCallback, CrossoverOperator, EliteArchive,
    GeneticAlgorithm, Population, Problem, ProgressCallback, ProgressMessage, Rand,
    SeededRand, Solution, SolutionId, SolutionPool, SolutionRef, Value, Variable,
    INVALID_FITNESS,
};
pub use config::{AppConfig, ConfigManager, CrossoverConfig, CrossoverMethod, GeneticAlgorithmConfig};
pub use error::{EvoError, Result};
