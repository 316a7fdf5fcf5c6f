use super::evaluator::{Evaluator, EvaluatorFactory};
use crate::engines::generation::random::Rand;
use crate::engines::generation::solution::{Value, INVALID_FITNESS};
use anyhow::{bail, Result};
use std::sync::Arc;

/// Bin packing instance: gene `i` names the bin that receives object `i`.
#[derive(Debug, Clone)]
pub struct BinPackingInstance {
    pub object_sizes: Vec<usize>,
    pub bin_count: usize,
    pub bin_size: usize,
}

impl BinPackingInstance {
    /// Random instance with object sizes drawn from `[0, max_object_size)`.
    pub fn random(
        object_count: usize,
        bin_count: usize,
        bin_size: usize,
        max_object_size: usize,
        rng: &mut dyn Rand,
    ) -> Self {
        let object_sizes = (0..object_count)
            .map(|_| rng.next_int(max_object_size.max(1)))
            .collect();
        Self {
            object_sizes,
            bin_count,
            bin_size,
        }
    }
}

/// Scores an assignment as `1 / bins_used`, or `INVALID_FITNESS` when any bin
/// overflows. A bin counts as used once any object is assigned to it, even an
/// object of size zero.
pub struct BinPackingEvaluator {
    instance: Arc<BinPackingInstance>,
    // Scratch, reused across calls
    fill: Vec<usize>,
    used: Vec<bool>,
}

impl BinPackingEvaluator {
    pub fn new(instance: Arc<BinPackingInstance>) -> Self {
        let fill = vec![0; instance.bin_count];
        let used = vec![false; instance.bin_count];
        Self { instance, fill, used }
    }
}

impl Evaluator for BinPackingEvaluator {
    fn evaluate(&mut self, genes: &[Value]) -> Result<f64> {
        if genes.len() != self.instance.object_sizes.len() {
            bail!(
                "expected {} genes, got {}",
                self.instance.object_sizes.len(),
                genes.len()
            );
        }

        self.fill.iter_mut().for_each(|f| *f = 0);
        self.used.iter_mut().for_each(|u| *u = false);
        let mut bins_used = 0usize;

        for (&gene, &size) in genes.iter().zip(&self.instance.object_sizes) {
            let bin = usize::try_from(gene)
                .ok()
                .filter(|&bin| bin < self.instance.bin_count);
            let Some(bin) = bin else {
                bail!("bin index {} out of range 0..{}", gene, self.instance.bin_count);
            };

            if !self.used[bin] {
                self.used[bin] = true;
                bins_used += 1;
            }
            self.fill[bin] += size;
            if self.fill[bin] > self.instance.bin_size {
                return Ok(INVALID_FITNESS);
            }
        }

        Ok(1.0 / bins_used.max(1) as f64)
    }
}

pub struct BinPackingFactory {
    instance: Arc<BinPackingInstance>,
}

impl BinPackingFactory {
    pub fn new(instance: BinPackingInstance) -> Self {
        Self {
            instance: Arc::new(instance),
        }
    }

    pub fn instance(&self) -> &BinPackingInstance {
        &self.instance
    }
}

impl EvaluatorFactory for BinPackingFactory {
    fn create_evaluator(&self) -> Box<dyn Evaluator> {
        Box::new(BinPackingEvaluator::new(Arc::clone(&self.instance)))
    }
}
