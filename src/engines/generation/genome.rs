/// Genome representation for the allocation search
///
/// A genome holds one non-negative weight per cell, in cell order. It is the
/// raw material the operators work on; the weights only become an allocation
/// once normalised to shares (see `Allocation::normalized`).
///
/// # Why a flat vector?
///
/// - **Crossover**: swapping segments is array slicing
/// - **Mutation**: perturbing one gene touches one cell's weight
/// - **No invalid states**: any non-negative vector is a usable allocation
///
/// # Example
///
/// ```
/// let genome: bwalloc::engines::generation::Genome = vec![0.4, 0.1, 0.9];
/// // normalised shares: [0.286, 0.071, 0.643]
/// # assert_eq!(genome.len(), 3);
/// ```
pub type Genome = Vec<f64>;

/// A genome paired with its fitness for one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub genome: Genome,
    pub fitness: f64,
}
