//! Persistent evaluation worker pool.
//!
//! `thread_count` workers are spawned once and reused for every generation.
//! The submitting thread publishes a population and a claim cursor under one
//! mutex, wakes the workers through `work_available`, and then sleeps on
//! `progress` until every unit has been reported back.
//!
//! ```text
//!   evaluate()                      worker i
//!   ----------                      --------
//!   publish slots, cursor = 0  ──►  wait(work_available)
//!   notify_all(work_available)      claim cursor++ (locked)
//!   wait(progress) ◄─────────────   evaluate genes (unlocked)
//!   ... until completed == N        record fitness, completed++
//!   write fitness into the pool     notify_one(progress)
//! ```
//!
//! Workers only read gene data, through a shared handle on the pool's gene
//! buffer. Scores are collected in submission order and written back into
//! the pool by the submitting thread once the barrier is reached.

use super::evaluator::{Evaluator, EvaluatorFactory};
use crate::engines::generation::pool::SolutionPool;
use crate::engines::generation::solution::{SolutionId, Value, INVALID_FITNESS};
use crate::error::{EvoError, Result};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// State guarded by the pool mutex.
struct Shared {
    genes: Option<Arc<Vec<Value>>>,
    dimension: usize,
    slots: Vec<SolutionId>,
    fitness: Vec<f64>,
    next_index: usize,
    completed: usize,
    failure: Option<EvoError>,
    stopping: bool,
}

struct Inner {
    state: Mutex<Shared>,
    work_available: Condvar,
    progress: Condvar,
}

/// One unit of work taken by a worker.
struct Claim {
    position: usize,
    slot: SolutionId,
    genes: Arc<Vec<Value>>,
    dimension: usize,
}

type Outcome = std::result::Result<f64, String>;

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until an unclaimed unit exists, or return `None` once stopping.
    fn claim(&self) -> Option<Claim> {
        let mut state = self.lock();
        loop {
            if state.stopping {
                return None;
            }
            if state.next_index < state.slots.len() {
                if let Some(genes) = state.genes.clone() {
                    let position = state.next_index;
                    state.next_index += 1;
                    return Some(Claim {
                        position,
                        slot: state.slots[position],
                        genes,
                        dimension: state.dimension,
                    });
                }
            }
            state = self
                .work_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn report(&self, position: usize, slot: SolutionId, outcome: Outcome) {
        {
            let mut state = self.lock();
            match outcome {
                Ok(fitness) => state.fitness[position] = fitness,
                Err(message) => {
                    if state.failure.is_none() {
                        state.failure = Some(EvoError::Evaluation {
                            slot: slot.index(),
                            message,
                        });
                    }
                }
            }
            state.completed += 1;
        }
        self.progress.notify_one();
    }
}

impl Claim {
    /// Score the claimed solution. Consumes the claim so its gene handle is
    /// released before the result is reported.
    fn run(self, evaluator: &mut dyn Evaluator) -> (usize, SolutionId, Outcome) {
        let start = self.slot.index() * self.dimension;
        let genes = &self.genes[start..start + self.dimension];

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(genes))) {
            Ok(Ok(fitness)) if fitness.is_nan() => Err("evaluator returned NaN".to_string()),
            Ok(Ok(fitness)) => Ok(fitness),
            Ok(Err(err)) => Err(format!("{:#}", err)),
            Err(payload) => Err(format!("evaluator panicked: {}", panic_message(payload.as_ref()))),
        };

        (self.position, self.slot, outcome)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return message;
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.as_str();
    }
    "unknown panic"
}

fn worker_loop(inner: Arc<Inner>, mut evaluator: Box<dyn Evaluator>, worker: usize) -> usize {
    let mut evaluated = 0;
    while let Some(claim) = inner.claim() {
        log::trace!("Worker {} evaluating solution {}", worker, claim.slot.index());
        let (position, slot, outcome) = claim.run(evaluator.as_mut());
        inner.report(position, slot, outcome);
        evaluated += 1;
    }
    evaluated
}

/// Evaluates whole populations on a fixed set of worker threads.
pub struct ParallelEvaluator {
    inner: Arc<Inner>,
    workers: Vec<JoinHandle<usize>>,
}

impl ParallelEvaluator {
    /// Spawn `thread_count` workers, each with its own evaluator from `factory`.
    pub fn new<F>(factory: &F, thread_count: usize) -> Result<Self>
    where
        F: EvaluatorFactory + ?Sized,
    {
        let inner = Arc::new(Inner {
            state: Mutex::new(Shared {
                genes: None,
                dimension: 0,
                slots: Vec::new(),
                fitness: Vec::new(),
                next_index: 0,
                completed: 0,
                failure: None,
                stopping: false,
            }),
            work_available: Condvar::new(),
            progress: Condvar::new(),
        });

        // Dropping a half-built pool on spawn failure stops the workers already running.
        let mut pool = Self {
            inner,
            workers: Vec::with_capacity(thread_count),
        };
        for index in 0..thread_count {
            let evaluator = factory.create_evaluator();
            let inner = Arc::clone(&pool.inner);
            let handle = thread::Builder::new()
                .name(format!("evaluator-{}", index))
                .spawn(move || worker_loop(inner, evaluator, index))?;
            pool.workers.push(handle);
        }

        log::debug!("Started {} evaluation workers", thread_count);
        Ok(pool)
    }

    /// Score every solution in `population` and store the results in `pool`.
    ///
    /// Blocks until all units have been reported. The first evaluator failure
    /// is returned after the barrier, and no fitness from that call is written.
    pub fn evaluate(&mut self, population: &[SolutionId], pool: &mut SolutionPool) -> Result<()> {
        if population.is_empty() {
            return Ok(());
        }
        if self.workers.is_empty() {
            return Err(EvoError::EvaluatorStopped);
        }

        {
            let mut state = self.inner.lock();
            if state.stopping {
                return Err(EvoError::EvaluatorStopped);
            }
            state.genes = Some(pool.shared_genes());
            state.dimension = pool.dimension();
            state.slots.clear();
            state.slots.extend_from_slice(population);
            state.fitness.clear();
            state.fitness.resize(population.len(), INVALID_FITNESS);
            state.next_index = 0;
            state.completed = 0;
            state.failure = None;
        }
        self.inner.work_available.notify_all();

        let mut state = self.inner.lock();
        while state.completed < state.slots.len() {
            state = self
                .inner
                .progress
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.genes = None;

        if let Some(failure) = state.failure.take() {
            return Err(failure);
        }
        for (&slot, &fitness) in state.slots.iter().zip(state.fitness.iter()) {
            pool.set_fitness(slot, fitness);
        }
        Ok(())
    }

    /// Ask every worker to exit. Workers finish the unit they are on.
    pub fn stop(&self) {
        {
            let mut state = self.inner.lock();
            state.stopping = true;
        }
        self.inner.work_available.notify_all();
    }

    /// Stop and join all workers.
    pub fn shutdown(&mut self) {
        self.stop();
        for (index, handle) in self.workers.drain(..).enumerate() {
            match handle.join() {
                Ok(evaluated) => log::debug!("Worker {} exited after {} evaluations", index, evaluated),
                Err(_) => log::error!("Worker {} panicked outside of evaluation", index),
            }
        }
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.lock().stopping
    }
}

impl Drop for ParallelEvaluator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
