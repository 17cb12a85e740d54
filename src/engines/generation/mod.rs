pub mod best_tracker;
pub mod evolution_engine;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod progress;

pub use best_tracker::{BestTracker, GenerationSnapshot};
pub use evolution_engine::{EvolutionEngine, OptimizationOutcome, ProgressCallback};
pub use fitness::FitnessModel;
pub use genome::{Genome, Scored};
pub use progress::{
    ChannelProgressCallback, LogProgressCallback, ProgressMessage, SilentProgressCallback,
};
