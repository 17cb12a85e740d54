use super::best_tracker::GenerationSnapshot;
use super::evolution_engine::ProgressCallback;

/// Reports progress through the `log` facade.
pub struct LogProgressCallback {
    total_generations: usize,
}

impl LogProgressCallback {
    pub fn new(total_generations: usize) -> Self {
        Self { total_generations }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {}/{} starting", generation + 1, self.total_generations);
    }

    fn on_generation_complete(&mut self, snapshot: &GenerationSnapshot) {
        log::info!(
            "Generation {}/{} complete. Best: {:.4}, mean: {:.4}, best so far: {:.4}",
            snapshot.generation + 1,
            self.total_generations,
            snapshot.best_fitness,
            snapshot.mean_fitness,
            snapshot.best_so_far
        );
    }
}

/// Discards every event.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _snapshot: &GenerationSnapshot) {}
}

// For observers on another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationSnapshot),
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

    fn on_generation_complete(&mut self, snapshot: &GenerationSnapshot) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(*snapshot));
    }
}
