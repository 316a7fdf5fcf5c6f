use super::pool::SolutionPool;
use super::solution::{SolutionId, SolutionRef};

/// Bounded set of the best solutions seen so far, highest fitness first.
///
/// Members are pool handles whose elite flag is set; the archive does not own
/// them, but the flag keeps the engine from recycling their slots. A member
/// evicted to make room has its flag cleared.
pub struct EliteArchive {
    members: Vec<SolutionId>,
    max_size: usize,
}

impl EliteArchive {
    pub fn new(max_size: usize) -> Self {
        Self {
            members: Vec::with_capacity(max_size + 1),
            max_size,
        }
    }

    /// Insert `id` ahead of every member with equal or lower fitness and mark
    /// it elite. Evicts the weakest member if the archive overflows.
    pub fn add(&mut self, id: SolutionId, pool: &mut SolutionPool) {
        let fitness = pool.fitness(id);
        let position = self
            .members
            .partition_point(|&member| pool.fitness(member) > fitness);
        self.members.insert(position, id);
        pool.set_elite(id, true);

        if self.members.len() > self.max_size {
            if let Some(evicted) = self.members.pop() {
                pool.set_elite(evicted, false);
            }
        }
    }

    /// Restore descending order after members were scored again.
    ///
    /// The sort is stable, so members with equal fitness keep their order.
    pub fn resort(&mut self, pool: &SolutionPool) {
        self.members
            .sort_by(|&a, &b| pool.fitness(b).total_cmp(&pool.fitness(a)));
    }

    pub fn members(&self) -> &[SolutionId] {
        &self.members
    }

    pub fn best(&self) -> Option<SolutionId> {
        self.members.first().copied()
    }

    /// Members resolved against the pool, in archive order.
    pub fn resolve<'a>(&'a self, pool: &'a SolutionPool) -> impl Iterator<Item = SolutionRef<'a>> + 'a {
        self.members.iter().map(move |&id| pool.get(id))
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
