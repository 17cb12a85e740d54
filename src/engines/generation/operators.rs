use crate::engines::generation::genome::{Genome, Scored};
use rand::Rng;
use std::cmp::Ordering;

fn by_fitness_desc(population: &[Scored]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    // `sort_by` is stable: equal fitness keeps population index order.
    order.sort_by(|&a, &b| {
        population[b]
            .fitness
            .partial_cmp(&population[a].fitness)
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Steady-state selection: the `count` fittest individuals.
pub fn steady_state_selection(population: &[Scored], count: usize) -> Vec<usize> {
    let mut order = by_fitness_desc(population);
    order.truncate(count);
    order
}

/// Tournament selection: pick best of K random candidates
pub fn tournament_selection<R: Rng>(
    population: &[Scored],
    tournament_size: usize,
    rng: &mut R,
) -> usize {
    let mut best_idx = rng.gen_range(0..population.len());

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        let challenger = population[idx].fitness;
        let best = population[best_idx].fitness;
        if challenger > best || (challenger == best && idx < best_idx) {
            best_idx = idx;
        }
    }

    best_idx
}

/// Roulette wheel selection: probability proportional to fitness
///
/// Fitness can be negative, so scores are shifted to start at zero first.
pub fn roulette_selection<R: Rng>(population: &[Scored], rng: &mut R) -> usize {
    let floor = population
        .iter()
        .map(|s| s.fitness)
        .fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = population.iter().map(|s| s.fitness - floor).collect();
    spin(&weights, rng)
}

/// Rank selection: probability proportional to rank (worst = 1)
pub fn rank_selection<R: Rng>(population: &[Scored], rng: &mut R) -> usize {
    let order = by_fitness_desc(population);
    let n = population.len();
    let mut weights = vec![0.0; n];
    for (position, &idx) in order.iter().enumerate() {
        weights[idx] = (n - position) as f64;
    }
    spin(&weights, rng)
}

fn spin<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();

    if !(total > 0.0) {
        // Flat landscape, pick random
        return rng.gen_range(0..weights.len());
    }

    let mut ball = rng.gen::<f64>() * total;

    for (idx, weight) in weights.iter().enumerate() {
        ball -= weight;
        if ball < 0.0 {
            return idx;
        }
    }

    // Fallback
    weights.len() - 1
}

/// Single-point crossover: swap genome segments
pub fn single_point_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> (Genome, Genome) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.clone(), parent2.clone());
    }

    let point = rng.gen_range(1..len);

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    child1[point..len].copy_from_slice(&parent2[point..len]);
    child2[point..len].copy_from_slice(&parent1[point..len]);

    (child1, child2)
}

/// Uniform crossover: each gene comes from either parent with equal odds
pub fn uniform_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> (Genome, Genome) {
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    for (a, b) in child1.iter_mut().zip(child2.iter_mut()) {
        if rng.gen_bool(0.5) {
            std::mem::swap(a, b);
        }
    }

    (child1, child2)
}

/// Mutation: nudge genes by at most `scale`, never below zero
pub fn mutate<R: Rng>(genome: &mut Genome, mutation_rate: f64, scale: f64, rng: &mut R) {
    if scale <= 0.0 {
        return;
    }
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *gene = (*gene + rng.gen_range(-scale..=scale)).max(0.0);
        }
    }
}

/// Generate random genome
pub fn random_genome<R: Rng>(length: usize, range: (f64, f64), rng: &mut R) -> Genome {
    (0..length).map(|_| rng.gen_range(range.0..range.1)).collect()
}
