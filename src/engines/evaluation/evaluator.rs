use crate::engines::generation::solution::Value;
use anyhow::Result;

/// Scores one solution.
///
/// Each worker thread owns its own evaluator, so implementations may keep
/// mutable scratch state between calls without synchronisation. The same
/// instance is reused for every generation.
pub trait Evaluator: Send {
    /// Fitness of `genes`; higher is better.
    fn evaluate(&mut self, genes: &[Value]) -> Result<f64>;
}

/// Produces one [`Evaluator`] per worker thread.
pub trait EvaluatorFactory {
    fn create_evaluator(&self) -> Box<dyn Evaluator>;
}

impl<F> EvaluatorFactory for F
where
    F: Fn() -> Box<dyn Evaluator>,
{
    fn create_evaluator(&self) -> Box<dyn Evaluator> {
        self()
    }
}
