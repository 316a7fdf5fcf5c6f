use super::solution::{SolutionId, SolutionRef, Value, INVALID_FITNESS};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Slot {
    fitness: f64,
    elite: bool,
    in_use: bool,
    /// Free list link, only meaningful while the slot is unused.
    next_free: Option<SolutionId>,
}

impl Slot {
    fn empty() -> Self {
        Self {
            fitness: INVALID_FITNESS,
            elite: false,
            in_use: false,
            next_free: None,
        }
    }
}

/// Fixed-capacity arena of solution records.
///
/// Every slot holds a header (fitness, elite flag) and exactly `dimension`
/// genes. Gene storage is one contiguous buffer indexed by slot, and unused
/// slots form a singly linked free list threaded through the headers, so
/// allocation and release are O(1) and never touch the heap.
///
/// The gene buffer is reference counted so the evaluator workers can read it
/// while a generation is being scored. Writers go through `Arc::make_mut`,
/// which is free once the workers have released their handles.
pub struct SolutionPool {
    dimension: usize,
    slots: Vec<Slot>,
    genes: Arc<Vec<Value>>,
    free_head: Option<SolutionId>,
    outstanding: usize,
}

impl SolutionPool {
    pub fn new(capacity: usize, dimension: usize) -> Self {
        let mut pool = Self {
            dimension,
            slots: vec![Slot::empty(); capacity],
            genes: Arc::new(vec![0; capacity * dimension]),
            free_head: None,
            outstanding: 0,
        };
        pool.reset();
        pool
    }

    /// Rebuild the free list over every slot, discarding all allocations.
    pub fn reset(&mut self) {
        self.free_head = None;
        for index in (0..self.slots.len()).rev() {
            let slot = &mut self.slots[index];
            slot.in_use = false;
            slot.elite = false;
            slot.next_free = self.free_head;
            self.free_head = Some(SolutionId::new(index));
        }
        self.outstanding = 0;
    }

    /// Pop a slot off the free list. Returns `None` when the pool is exhausted.
    ///
    /// The slot keeps whatever its previous owner left in it.
    pub fn allocate(&mut self) -> Option<SolutionId> {
        let id = self.free_head?;
        let slot = &mut self.slots[id.index()];
        self.free_head = slot.next_free.take();
        slot.in_use = true;
        self.outstanding += 1;
        Some(id)
    }

    /// Allocate a slot holding an exact duplicate of `src`.
    pub fn copy(&mut self, src: SolutionId) -> Option<SolutionId> {
        let id = self.allocate()?;
        let (fitness, elite) = {
            let source = &self.slots[src.index()];
            (source.fitness, source.elite)
        };
        let slot = &mut self.slots[id.index()];
        slot.fitness = fitness;
        slot.elite = elite;

        let dimension = self.dimension;
        let from = src.index() * dimension;
        Arc::make_mut(&mut self.genes).copy_within(from..from + dimension, id.index() * dimension);
        Some(id)
    }

    /// Return a slot to the free list.
    ///
    /// Releasing an unused slot or a slot that is still marked elite is a
    /// caller bug; such requests are logged and ignored.
    pub fn deallocate(&mut self, id: SolutionId) {
        let slot = &mut self.slots[id.index()];
        if !slot.in_use {
            log::error!("Ignoring release of solution {} which is not allocated", id.index());
            return;
        }
        if slot.elite {
            log::error!("Ignoring release of solution {} which is still elite", id.index());
            return;
        }
        slot.in_use = false;
        slot.next_free = self.free_head;
        self.free_head = Some(id);
        self.outstanding -= 1;
    }

    pub fn get(&self, id: SolutionId) -> SolutionRef<'_> {
        let slot = &self.slots[id.index()];
        SolutionRef {
            id,
            fitness: slot.fitness,
            elite: slot.elite,
            genes: self.genes(id),
        }
    }

    pub fn fitness(&self, id: SolutionId) -> f64 {
        self.slots[id.index()].fitness
    }

    pub fn set_fitness(&mut self, id: SolutionId, fitness: f64) {
        self.slots[id.index()].fitness = fitness;
    }

    pub fn is_elite(&self, id: SolutionId) -> bool {
        self.slots[id.index()].elite
    }

    pub fn set_elite(&mut self, id: SolutionId, elite: bool) {
        self.slots[id.index()].elite = elite;
    }

    pub fn genes(&self, id: SolutionId) -> &[Value] {
        let start = id.index() * self.dimension;
        &self.genes[start..start + self.dimension]
    }

    pub fn genes_mut(&mut self, id: SolutionId) -> &mut [Value] {
        let start = id.index() * self.dimension;
        let dimension = self.dimension;
        &mut Arc::make_mut(&mut self.genes)[start..start + dimension]
    }

    /// Mutable gene slices of two distinct solutions, in argument order.
    pub fn pair_mut(
        &mut self,
        first: SolutionId,
        second: SolutionId,
    ) -> Option<(&mut [Value], &mut [Value])> {
        if first == second {
            return None;
        }
        let dimension = self.dimension;
        let (low, high) = if first < second { (first, second) } else { (second, first) };
        let genes = Arc::make_mut(&mut self.genes);
        let (head, tail) = genes.split_at_mut(high.index() * dimension);
        let low_genes = &mut head[low.index() * dimension..(low.index() + 1) * dimension];
        let high_genes = &mut tail[..dimension];
        if first < second {
            Some((low_genes, high_genes))
        } else {
            Some((high_genes, low_genes))
        }
    }

    /// Shared handle on the gene buffer for read-only use by other threads.
    pub(crate) fn shared_genes(&self) -> Arc<Vec<Value>> {
        Arc::clone(&self.genes)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of allocated, not yet released slots.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Length of the free list.
    pub fn available(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.free_head;
        while let Some(id) = cursor {
            count += 1;
            cursor = self.slots[id.index()].next_free;
        }
        count
    }

    /// Number of slots currently flagged elite.
    pub fn count_elites(&self) -> usize {
        self.slots.iter().filter(|slot| slot.elite).count()
    }
}
