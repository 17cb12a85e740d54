use crate::types::{normalize_weights, UsageMatrix, EPSILON};

/// Scores a fixed allocation against a multi-step usage history.
///
/// Each step offers cell `c` the share `s_c` of that step's total demand.
/// The score is the mean served fraction of demand minus a penalty on the
/// mean fraction of cells left short:
///
/// ```text
/// fitness = mean_t(1 - unmet_t / total_t) - cell_penalty * mean_t(short_t / C)
/// ```
///
/// Both the allocation and the usage may be rescaled without changing the
/// score, so candidates of different magnitudes compare fairly. The maximum
/// is 1.
#[derive(Debug, Clone, Copy)]
pub struct FitnessModel {
    pub cell_penalty: f64,
}

impl Default for FitnessModel {
    fn default() -> Self {
        Self { cell_penalty: 0.1 }
    }
}

impl FitnessModel {
    pub fn new(cell_penalty: f64) -> Self {
        Self { cell_penalty }
    }

    pub fn evaluate(&self, allocation: &[f64], usage: &UsageMatrix) -> f64 {
        let steps = usage.steps();
        let cells = usage.cells();
        if steps == 0 || cells == 0 {
            return 0.0;
        }

        let shares = normalize_weights(allocation);
        let mut served_sum = 0.0;
        let mut short_sum = 0.0;

        for t in 0..steps {
            let demand = usage.step(t);
            let total = demand.sum();

            // An idle step is trivially served.
            if total < EPSILON {
                served_sum += 1.0;
                continue;
            }

            let mut unmet = 0.0;
            let mut short = 0usize;
            for (share, &used) in shares.iter().zip(demand.iter()) {
                let supply = share * total;
                if used > supply {
                    unmet += used - supply;
                    if used > supply + EPSILON {
                        short += 1;
                    }
                }
            }

            served_sum += 1.0 - unmet / total;
            short_sum += short as f64 / cells as f64;
        }

        let steps = steps as f64;
        served_sum / steps - self.cell_penalty * short_sum / steps
    }
}
