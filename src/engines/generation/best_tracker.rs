use crate::engines::generation::genome::{Genome, Scored};
use serde::{Deserialize, Serialize};

/// Immutable record of one finished generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSnapshot {
    pub generation: usize,
    /// Best fitness inside this generation's population.
    pub best_fitness: f64,
    pub mean_fitness: f64,
    /// Best fitness seen in any generation up to and including this one.
    pub best_so_far: f64,
}

/// Running best individual across generations.
///
/// Holds its own copy of the genome so later generations can never alias
/// or overwrite it.
#[derive(Debug, Clone, Default)]
pub struct BestTracker {
    best: Option<Scored>,
    history: Vec<GenerationSnapshot>,
}

impl BestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fully evaluated generation and return its snapshot.
    ///
    /// A candidate only replaces the incumbent when strictly fitter, so the
    /// earliest of equally fit individuals is kept.
    pub fn observe(&mut self, generation: usize, evaluated: &[Scored]) -> GenerationSnapshot {
        let mut champion: Option<&Scored> = None;
        let mut total = 0.0;
        for scored in evaluated {
            total += scored.fitness;
            if champion.map_or(true, |c| scored.fitness > c.fitness) {
                champion = Some(scored);
            }
        }

        let best_fitness = champion.map_or(f64::NEG_INFINITY, |c| c.fitness);
        if let Some(candidate) = champion {
            if self.best.as_ref().map_or(true, |b| candidate.fitness > b.fitness) {
                self.best = Some(candidate.clone());
            }
        }

        let snapshot = GenerationSnapshot {
            generation,
            best_fitness,
            mean_fitness: if evaluated.is_empty() {
                0.0
            } else {
                total / evaluated.len() as f64
            },
            best_so_far: self.best_fitness(),
        };
        self.history.push(snapshot);
        snapshot
    }

    pub fn best(&self) -> Option<&Scored> {
        self.best.as_ref()
    }

    pub fn best_fitness(&self) -> f64 {
        self.best.as_ref().map_or(f64::NEG_INFINITY, |b| b.fitness)
    }

    pub fn history(&self) -> &[GenerationSnapshot] {
        &self.history
    }

    pub fn into_parts(self) -> (Option<Genome>, f64, Vec<GenerationSnapshot>) {
        let fitness = self.best_fitness();
        (self.best.map(|b| b.genome), fitness, self.history)
    }
}
