pub mod traits;
pub mod evolution;
pub mod run;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{CrossoverConfig, CrossoverMethod, GeneticAlgorithmConfig};
pub use run::RunConfig;
