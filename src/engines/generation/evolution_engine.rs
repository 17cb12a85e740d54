use crate::config::evolution::{CrossoverMethod, OptimizerConfig, SelectionMethod};
use crate::config::traits::ConfigSection;
use crate::engines::generation::{
    best_tracker::{BestTracker, GenerationSnapshot},
    fitness::FitnessModel,
    genome::{Genome, Scored},
    operators::*,
};
use crate::error::{BwallocError, Result};
use crate::types::{Allocation, UsageMatrix};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::{Duration, Instant};

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, snapshot: &GenerationSnapshot);
}

impl<T: ProgressCallback + ?Sized> ProgressCallback for &mut T {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation);
    }

    fn on_generation_complete(&mut self, snapshot: &GenerationSnapshot) {
        (**self).on_generation_complete(snapshot);
    }
}

/// Result of a full optimisation run.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    /// Best genome normalised to shares summing to one.
    pub best_allocation: Allocation,
    /// The same individual as raw genes.
    pub best_genome: Genome,
    pub best_fitness: f64,
    pub history: Vec<GenerationSnapshot>,
    pub elapsed: Duration,
}

pub struct EvolutionEngine {
    config: OptimizerConfig,
    fitness: FitnessModel,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let fitness = FitnessModel::new(config.cell_penalty);

        Ok(Self {
            config,
            fitness,
            rng,
        })
    }

    pub fn with_fitness_model(mut self, fitness: FitnessModel) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn fitness_model(&self) -> &FitnessModel {
        &self.fitness
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(
        &mut self,
        usage: &UsageMatrix,
        mut callback: C,
    ) -> Result<OptimizationOutcome> {
        let n_genes = self.resolve_genes(usage)?;
        let started = Instant::now();

        // Initialize population
        let mut population = self.initialize_population(n_genes);
        let mut tracker = BestTracker::new();

        // Evolution loop
        for generation in 0..self.config.num_generations {
            callback.on_generation_start(generation);

            // All scores for this generation are in before selection starts.
            let evaluated = self.evaluate_population(population, usage);

            let snapshot = tracker.observe(generation, &evaluated);
            callback.on_generation_complete(&snapshot);

            // Check termination
            if generation + 1 == self.config.num_generations {
                break;
            }

            // Create next generation
            population = self.create_next_generation(&evaluated);
        }

        let elapsed = started.elapsed();
        let (best_genome, best_fitness, history) = tracker.into_parts();
        let best_genome = best_genome.ok_or_else(|| {
            BwallocError::Configuration("Optimizer finished without evaluating anyone".to_string())
        })?;
        let best_allocation = Allocation::new(best_genome.clone())?.normalized();

        log::info!(
            "Optimizer finished {} generations in {:.2?}, best fitness {:.4}",
            self.config.num_generations,
            elapsed,
            best_fitness
        );

        Ok(OptimizationOutcome {
            best_allocation,
            best_genome,
            best_fitness,
            history,
            elapsed,
        })
    }

    fn resolve_genes(&self, usage: &UsageMatrix) -> Result<usize> {
        let cells = usage.cells();
        if cells == 0 {
            return Err(BwallocError::Configuration(
                "Usage matrix has no cells to allocate".to_string(),
            ));
        }
        let n_genes = if self.config.n_genes == 0 {
            cells
        } else {
            self.config.n_genes
        };
        if n_genes != cells {
            return Err(BwallocError::Configuration(format!(
                "n_genes must match usage cells: expected {}, got {}",
                cells, n_genes
            )));
        }
        Ok(n_genes)
    }

    fn initialize_population(&mut self, n_genes: usize) -> Vec<Genome> {
        (0..self.config.pop_size)
            .map(|_| random_genome(n_genes, self.config.init_range, &mut self.rng))
            .collect()
    }

    fn evaluate_population(&self, population: Vec<Genome>, usage: &UsageMatrix) -> Vec<Scored> {
        let fitness = self.fitness;
        let score = |genome: Genome| {
            let value = fitness.evaluate(&genome, usage);
            Scored {
                genome,
                fitness: value,
            }
        };

        // `collect` keeps population order in both branches.
        if self.config.parallel {
            population.into_par_iter().map(score).collect()
        } else {
            population.into_iter().map(score).collect()
        }
    }

    fn select_parents(&mut self, evaluated: &[Scored]) -> Vec<usize> {
        let count = self.config.num_parents_mating;
        match self.config.selection_method {
            SelectionMethod::SteadyState => steady_state_selection(evaluated, count),
            SelectionMethod::Tournament => {
                let size = self.config.tournament_size;
                (0..count)
                    .map(|_| tournament_selection(evaluated, size, &mut self.rng))
                    .collect()
            }
            SelectionMethod::Roulette => (0..count)
                .map(|_| roulette_selection(evaluated, &mut self.rng))
                .collect(),
            SelectionMethod::Rank => (0..count)
                .map(|_| rank_selection(evaluated, &mut self.rng))
                .collect(),
        }
    }

    fn create_next_generation(&mut self, evaluated: &[Scored]) -> Vec<Genome> {
        let pop_size = self.config.pop_size;
        let mut next_generation = Vec::with_capacity(pop_size);

        // Elitism: copy top performers
        for idx in steady_state_selection(evaluated, self.config.elitism_count) {
            next_generation.push(evaluated[idx].genome.clone());
        }

        let parents = self.select_parents(evaluated);

        // Pair parents cyclically: (0, 1), (1, 2), ..., (n-1, 0)
        let mut k = 0;
        while next_generation.len() < pop_size {
            let parent1 = &evaluated[parents[k % parents.len()]].genome;
            let parent2 = &evaluated[parents[(k + 1) % parents.len()]].genome;
            k += 1;

            let (mut child1, mut child2) = if self.rng.gen::<f64>() < self.config.crossover_rate {
                match self.config.crossover_method {
                    CrossoverMethod::SinglePoint => {
                        single_point_crossover(parent1, parent2, &mut self.rng)
                    }
                    CrossoverMethod::Uniform => uniform_crossover(parent1, parent2, &mut self.rng),
                }
            } else {
                (parent1.clone(), parent2.clone())
            };

            // Apply mutation
            let (rate, scale) = (self.config.mutation_rate, self.config.mutation_scale);
            mutate(&mut child1, rate, scale, &mut self.rng);
            mutate(&mut child2, rate, scale, &mut self.rng);

            next_generation.push(child1);
            if next_generation.len() < pop_size {
                next_generation.push(child2);
            }
        }

        next_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::progress::SilentProgressCallback;

    fn usage() -> UsageMatrix {
        UsageMatrix::from_rows(vec![
            vec![5.0, 6.0, 7.0, 6.0],
            vec![1.0, 1.0, 2.0, 1.0],
            vec![3.0, 2.0, 3.0, 3.0],
        ])
        .unwrap()
    }

    fn config() -> OptimizerConfig {
        OptimizerConfig {
            pop_size: 16,
            num_generations: 12,
            num_parents_mating: 8,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_outcome_shape() {
        let mut engine = EvolutionEngine::new(config()).unwrap();
        let outcome = engine.run(&usage(), SilentProgressCallback).unwrap();

        assert_eq!(outcome.best_allocation.len(), 3);
        assert_eq!(outcome.best_genome.len(), 3);
        assert!(outcome.best_allocation.weights().iter().all(|w| *w >= 0.0));
        let total: f64 = outcome.best_allocation.weights().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(outcome.history.len(), 12);
    }

    #[test]
    fn test_gene_count_mismatch() {
        let mut engine = EvolutionEngine::new(OptimizerConfig {
            n_genes: 5,
            ..config()
        })
        .unwrap();
        let err = engine.run(&usage(), SilentProgressCallback).unwrap_err();
        assert!(matches!(err, BwallocError::Configuration(_)));
        assert!(err.to_string().contains("expected 3, got 5"));
    }

    #[test]
    fn test_parallel_and_serial_agree() {
        let mut serial = EvolutionEngine::new(OptimizerConfig {
            parallel: false,
            ..config()
        })
        .unwrap();
        let mut parallel = EvolutionEngine::new(OptimizerConfig {
            parallel: true,
            ..config()
        })
        .unwrap();

        let a = serial.run(&usage(), SilentProgressCallback).unwrap();
        let b = parallel.run(&usage(), SilentProgressCallback).unwrap();
        assert_eq!(a.best_genome, b.best_genome);
        assert_eq!(a.best_fitness, b.best_fitness);
    }

    #[test]
    fn test_zero_elitism_still_fills_population() {
        let mut engine = EvolutionEngine::new(OptimizerConfig {
            elitism_count: 0,
            selection_method: SelectionMethod::Roulette,
            crossover_method: CrossoverMethod::Uniform,
            ..config()
        })
        .unwrap();
        let outcome = engine.run(&usage(), SilentProgressCallback).unwrap();
        assert!(outcome.best_fitness.is_finite());
    }
}
