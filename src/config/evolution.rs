use super::traits::{invalid, ConfigSection};
use crate::error::BwallocError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub pop_size: usize,
    /// Genes per individual; 0 means "one per cell of the loaded usage".
    pub n_genes: usize,
    pub num_generations: usize,
    pub num_parents_mating: usize,
    pub elitism_count: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub mutation_scale: f64,
    pub init_range: (f64, f64),
    pub selection_method: SelectionMethod,
    pub crossover_method: CrossoverMethod,
    pub tournament_size: usize,
    pub cell_penalty: f64,
    pub parallel: bool,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMethod {
    SteadyState,
    Tournament,
    Roulette,
    Rank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverMethod {
    SinglePoint,
    Uniform,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            pop_size: 50,
            n_genes: 0,
            num_generations: 100,
            num_parents_mating: 25,
            elitism_count: 1,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            mutation_scale: 0.2,
            init_range: (0.0, 1.0),
            selection_method: SelectionMethod::SteadyState,
            crossover_method: CrossoverMethod::SinglePoint,
            tournament_size: 3,
            cell_penalty: 0.1,
            parallel: true,
            seed: None,
        }
    }
}

impl ConfigSection for OptimizerConfig {
    fn section_name() -> &'static str {
        "optimizer"
    }

    fn validate(&self) -> Result<(), BwallocError> {
        if self.pop_size == 0 {
            return Err(invalid::<Self>("pop_size must be at least 1"));
        }
        if self.num_generations == 0 {
            return Err(invalid::<Self>("num_generations must be at least 1"));
        }
        if self.num_parents_mating == 0 {
            return Err(invalid::<Self>("num_parents_mating must be at least 1"));
        }
        if self.num_parents_mating > self.pop_size {
            return Err(invalid::<Self>(format!(
                "num_parents_mating ({}) exceeds pop_size ({})",
                self.num_parents_mating, self.pop_size
            )));
        }
        if self.elitism_count > self.pop_size {
            return Err(invalid::<Self>(format!(
                "elitism_count ({}) exceeds pop_size ({})",
                self.elitism_count, self.pop_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid::<Self>("mutation_rate must be between 0 and 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(invalid::<Self>("crossover_rate must be between 0 and 1"));
        }
        if !(self.mutation_scale >= 0.0 && self.mutation_scale.is_finite()) {
            return Err(invalid::<Self>("mutation_scale must be finite and non-negative"));
        }
        let (low, high) = self.init_range;
        if !(low >= 0.0 && high > low && high.is_finite()) {
            return Err(invalid::<Self>(format!(
                "init_range must satisfy 0 <= low < high, got ({}, {})",
                low, high
            )));
        }
        if self.selection_method == SelectionMethod::Tournament && self.tournament_size == 0 {
            return Err(invalid::<Self>("tournament_size must be at least 1"));
        }
        if !(self.cell_penalty >= 0.0 && self.cell_penalty.is_finite()) {
            return Err(invalid::<Self>("cell_penalty must be finite and non-negative"));
        }
        Ok(())
    }
}
