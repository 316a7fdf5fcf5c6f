use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvoError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticAlgorithmConfig {
    pub population_size: usize,
    pub tournament_size: usize,
    pub elite_count: usize,
    pub thread_count: usize,
    pub max_iteration: usize,
    pub crossover: CrossoverConfig,
    pub mutation_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverMethod {
    OnePoint,
    TwoPoint,
    Uniform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverConfig {
    pub method: CrossoverMethod,
    /// Blend weight for blend-style operators. None of the current methods
    /// read it; it is accepted and carried through unchanged.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_alpha() -> f64 {
    0.5
}

impl CrossoverConfig {
    pub fn new(method: CrossoverMethod) -> Self {
        Self {
            method,
            alpha: default_alpha(),
        }
    }

    pub fn with_alpha(method: CrossoverMethod, alpha: f64) -> Self {
        Self { method, alpha }
    }
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self::new(CrossoverMethod::OnePoint)
    }
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            tournament_size: 20,
            elite_count: 50,
            thread_count: 4,
            max_iteration: 1000,
            crossover: CrossoverConfig::default(),
            mutation_rate: 0.1,
        }
    }
}

impl GeneticAlgorithmConfig {
    /// Number of slots the solution pool needs for this configuration.
    pub fn pool_capacity(&self) -> usize {
        self.population_size * 2
    }
}

impl ConfigSection for GeneticAlgorithmConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvoError> {
        if self.population_size < 2 {
            return Err(EvoError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        if self.tournament_size == 0 {
            return Err(EvoError::Configuration(
                "Tournament size must be at least 1".to_string()
            ));
        }
        // With no elites the last offspring pair needs one slot beyond 2 x population_size.
        if self.elite_count == 0 || self.elite_count > self.population_size {
            return Err(EvoError::Configuration(format!(
                "Elite count must be between 1 and the population size ({})",
                self.population_size
            )));
        }
        if self.thread_count == 0 {
            return Err(EvoError::Configuration(
                "Thread count must be at least 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvoError::Configuration(
                "Mutation rate must be between 0 and 1".to_string()
            ));
        }
        if !self.crossover.alpha.is_finite() {
            return Err(EvoError::Configuration(
                "Crossover alpha must be a finite number".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = Self::default();
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::new(
                    "population_size",
                    "integer",
                    serde_json::json!(defaults.population_size),
                    Some(2.0),
                    None,
                    "Number of solutions per generation",
                ),
                FieldManifest::new(
                    "tournament_size",
                    "integer",
                    serde_json::json!(defaults.tournament_size),
                    Some(1.0),
                    None,
                    "Candidates drawn per tournament",
                ),
                FieldManifest::new(
                    "elite_count",
                    "integer",
                    serde_json::json!(defaults.elite_count),
                    Some(1.0),
                    None,
                    "Best solutions carried into every generation",
                ),
                FieldManifest::new(
                    "thread_count",
                    "integer",
                    serde_json::json!(defaults.thread_count),
                    Some(1.0),
                    None,
                    "Persistent evaluation worker threads",
                ),
                FieldManifest::new(
                    "max_iteration",
                    "integer",
                    serde_json::json!(defaults.max_iteration),
                    Some(0.0),
                    None,
                    "Number of generations to run",
                ),
                FieldManifest::new(
                    "mutation_rate",
                    "float",
                    serde_json::json!(defaults.mutation_rate),
                    Some(0.0),
                    Some(1.0),
                    "Per-gene resampling probability",
                ),
                FieldManifest::new(
                    "crossover.method",
                    "enum",
                    serde_json::json!("one_point"),
                    None,
                    None,
                    "one_point, two_point or uniform",
                ),
                FieldManifest::new(
                    "crossover.alpha",
                    "float",
                    serde_json::json!(defaults.crossover.alpha),
                    None,
                    None,
                    "Reserved for blend crossover; currently unused",
                ),
            ],
        }
    }
}
