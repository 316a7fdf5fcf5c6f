use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvoError {
    #[error("Solution pool exhausted: all {capacity} slots are in use")]
    PoolExhausted { capacity: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Evaluation of solution {slot} failed: {message}")]
    Evaluation { slot: usize, message: String },

    #[error("Evaluator pool has been stopped")]
    EvaluatorStopped,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EvoError>;
