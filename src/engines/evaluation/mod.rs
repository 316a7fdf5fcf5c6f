pub mod evaluator;
pub mod parallel;
pub mod bin_packing;

pub use evaluator::{Evaluator, EvaluatorFactory};
pub use parallel::ParallelEvaluator;
pub use bin_packing::{BinPackingEvaluator, BinPackingFactory, BinPackingInstance};
