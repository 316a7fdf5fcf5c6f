pub mod solution;
pub mod pool;
pub mod elite_archive;
pub mod problem;
pub mod random;
pub mod crossover;
pub mod operators;
pub mod progress;
pub mod evolution_engine;

pub use solution::{Population, Solution, SolutionId, SolutionRef, Value, INVALID_FITNESS};
pub use pool::SolutionPool;
pub use elite_archive::EliteArchive;
pub use problem::{Problem, Variable};
pub use random::{Rand, SeededRand};
pub use crossover::{
    create_crossover_operator, CrossoverOperator, SinglePointCrossover, TwoPointCrossover,
    UniformCrossover,
};
pub use evolution_engine::GeneticAlgorithm;
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressCallback, ProgressMessage};
