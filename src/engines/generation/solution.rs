use serde::{Deserialize, Serialize};

/// A single gene value.
pub type Value = i32;

/// Fitness of a solution that has not been evaluated yet.
///
/// Evaluators may also report it for infeasible solutions; it orders below
/// every finite score.
pub const INVALID_FITNESS: f64 = f64::NEG_INFINITY;

/// Handle to a slot in a [`SolutionPool`](super::pool::SolutionPool).
///
/// Handles are plain indexes. A handle stays valid until it is passed to
/// `deallocate`, after which the slot may be handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolutionId(u32);

impl SolutionId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered solution handles making up one generation.
pub type Population = Vec<SolutionId>;

/// Borrowed view of a pooled solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolutionRef<'a> {
    pub id: SolutionId,
    pub fitness: f64,
    pub elite: bool,
    pub genes: &'a [Value],
}

impl SolutionRef<'_> {
    pub fn is_evaluated(&self) -> bool {
        self.fitness != INVALID_FITNESS
    }

    pub fn to_owned_solution(&self) -> Solution {
        Solution {
            fitness: self.fitness,
            elite: self.elite,
            genes: self.genes.to_vec(),
        }
    }
}

/// Owned snapshot of a solution, detached from its pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub fitness: f64,
    pub elite: bool,
    pub genes: Vec<Value>,
}
