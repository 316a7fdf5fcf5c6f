/// Receives generation-level progress from [`GeneticAlgorithm`](super::GeneticAlgorithm).
pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, archive_size: usize);
}

/// Silent callback.
impl ProgressCallback for () {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: f64, _archive_size: usize) {}
}

/// Logs a summary line every `interval` generations.
pub struct ConsoleProgressCallback {
    interval: usize,
    total_generations: usize,
}

impl ConsoleProgressCallback {
    pub fn new(interval: usize, total_generations: usize) -> Self {
        Self {
            interval: interval.max(1),
            total_generations,
        }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::trace!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, archive_size: usize) {
        let done = generation + 1;
        if done % self.interval == 0 || done == self.total_generations {
            log::info!(
                "Generation {}/{} complete. Best fitness: {:.4}, elite archive size: {}",
                done, self.total_generations, best_fitness, archive_size
            );
        }
    }
}

// For driving a front end from another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { generation: usize, best_fitness: f64, archive_size: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, archive_size: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            best_fitness,
            archive_size,
        });
    }
}
