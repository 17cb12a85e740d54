use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Dimension, Zip};
use rand::Rng;

/// Nonlinear autoregressive network.
///
/// One tanh hidden layer between a window of `input_size` lagged values and
/// `output_size` linear outputs. Weights are laid out `[out, in]`.
#[derive(Debug, Clone)]
pub struct NarNetwork {
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array2<f64>,
    b2: Array1<f64>,
}

/// Loss gradient for every parameter of a `NarNetwork`.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub w1: Array2<f64>,
    pub b1: Array1<f64>,
    pub w2: Array2<f64>,
    pub b2: Array1<f64>,
}

impl Gradients {
    fn zeros_like(net: &NarNetwork) -> Self {
        Self {
            w1: Array2::zeros(net.w1.raw_dim()),
            b1: Array1::zeros(net.b1.raw_dim()),
            w2: Array2::zeros(net.w2.raw_dim()),
            b2: Array1::zeros(net.b2.raw_dim()),
        }
    }
}

impl NarNetwork {
    /// Xavier-uniform weights, zero biases.
    pub fn new<R: Rng>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Self {
        Self {
            w1: xavier(hidden_size, input_size, rng),
            b1: Array1::zeros(hidden_size),
            w2: xavier(output_size, hidden_size, rng),
            b2: Array1::zeros(output_size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.w1.ncols()
    }

    pub fn hidden_size(&self) -> usize {
        self.w1.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.w2.nrows()
    }

    pub fn forward(&self, window: ArrayView1<'_, f64>) -> Array1<f64> {
        let hidden = (self.w1.dot(&window) + &self.b1).mapv(f64::tanh);
        self.w2.dot(&hidden) + &self.b2
    }

    /// Mean squared error over a batch and its gradient.
    ///
    /// `inputs` is `[samples, input_size]`, `targets` `[samples, output_size]`.
    pub fn loss_and_gradients(
        &self,
        inputs: ArrayView2<'_, f64>,
        targets: ArrayView2<'_, f64>,
    ) -> (f64, Gradients) {
        let hidden = (inputs.dot(&self.w1.t()) + &self.b1).mapv(f64::tanh);
        let outputs = hidden.dot(&self.w2.t()) + &self.b2;
        let errors = outputs - &targets;

        let count = errors.len().max(1) as f64;
        let loss = errors.mapv(|e| e * e).sum() / count;

        let d_out = errors * (2.0 / count);
        let w2 = d_out.t().dot(&hidden);
        let b2 = d_out.sum_axis(Axis(0));

        let d_hidden = d_out.dot(&self.w2) * hidden.mapv(|h| 1.0 - h * h);
        let w1 = d_hidden.t().dot(&inputs);
        let b1 = d_hidden.sum_axis(Axis(0));

        (loss, Gradients { w1, b1, w2, b2 })
    }
}

fn xavier<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Array2<f64> {
    let limit = (6.0 / (rows + cols) as f64).sqrt();
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-limit..limit))
}

/// Parameter update rule applied after each full-batch gradient.
#[derive(Debug, Clone)]
pub enum Updater {
    Sgd {
        learning_rate: f64,
    },
    Adam {
        learning_rate: f64,
        beta1: f64,
        beta2: f64,
        epsilon: f64,
        step: i32,
        m: Gradients,
        v: Gradients,
    },
}

impl Updater {
    pub fn sgd(learning_rate: f64) -> Self {
        Self::Sgd { learning_rate }
    }

    pub fn adam(learning_rate: f64, net: &NarNetwork) -> Self {
        Self::Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            step: 0,
            m: Gradients::zeros_like(net),
            v: Gradients::zeros_like(net),
        }
    }

    pub fn apply(&mut self, net: &mut NarNetwork, grads: &Gradients) {
        match self {
            Self::Sgd { learning_rate } => {
                let lr = *learning_rate;
                net.w1.scaled_add(-lr, &grads.w1);
                net.b1.scaled_add(-lr, &grads.b1);
                net.w2.scaled_add(-lr, &grads.w2);
                net.b2.scaled_add(-lr, &grads.b2);
            }
            Self::Adam {
                learning_rate,
                beta1,
                beta2,
                epsilon,
                step,
                m,
                v,
            } => {
                *step += 1;
                let moments = AdamStep {
                    lr: *learning_rate,
                    beta1: *beta1,
                    beta2: *beta2,
                    epsilon: *epsilon,
                    bias1: 1.0 - beta1.powi(*step),
                    bias2: 1.0 - beta2.powi(*step),
                };
                moments.update(&mut net.w1, &grads.w1, &mut m.w1, &mut v.w1);
                moments.update(&mut net.b1, &grads.b1, &mut m.b1, &mut v.b1);
                moments.update(&mut net.w2, &grads.w2, &mut m.w2, &mut v.w2);
                moments.update(&mut net.b2, &grads.b2, &mut m.b2, &mut v.b2);
            }
        }
    }
}

struct AdamStep {
    lr: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    bias1: f64,
    bias2: f64,
}

impl AdamStep {
    fn update<D: Dimension>(
        &self,
        param: &mut ndarray::Array<f64, D>,
        grad: &ndarray::Array<f64, D>,
        m: &mut ndarray::Array<f64, D>,
        v: &mut ndarray::Array<f64, D>,
    ) {
        Zip::from(param)
            .and(grad)
            .and(m)
            .and(v)
            .for_each(|p, &g, m, v| {
                *m = self.beta1 * *m + (1.0 - self.beta1) * g;
                *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
                let m_hat = *m / self.bias1;
                let v_hat = *v / self.bias2;
                *p -= self.lr * m_hat / (v_hat.sqrt() + self.epsilon);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_forward_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let net = NarNetwork::new(4, 8, 2, &mut rng);
        let out = net.forward(array![0.1, 0.2, 0.3, 0.4].view());
        assert_eq!(out.len(), 2);
        assert_eq!(net.hidden_size(), 8);
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let mut rng = StdRng::seed_from_u64(7);
        let net = NarNetwork::new(3, 4, 1, &mut rng);
        let inputs = array![[0.1, 0.5, 0.9], [0.3, 0.2, 0.7]];
        let targets = array![[0.4], [0.6]];

        let (_, grads) = net.loss_and_gradients(inputs.view(), targets.view());

        let h = 1e-6;
        let mut plus = net.clone();
        plus.w1[[1, 2]] += h;
        let mut minus = net.clone();
        minus.w1[[1, 2]] -= h;
        let (lp, _) = plus.loss_and_gradients(inputs.view(), targets.view());
        let (lm, _) = minus.loss_and_gradients(inputs.view(), targets.view());
        let numeric = (lp - lm) / (2.0 * h);

        assert!((numeric - grads.w1[[1, 2]]).abs() < 1e-6);

        let mut plus = net.clone();
        plus.b2[0] += h;
        let mut minus = net.clone();
        minus.b2[0] -= h;
        let (lp, _) = plus.loss_and_gradients(inputs.view(), targets.view());
        let (lm, _) = minus.loss_and_gradients(inputs.view(), targets.view());
        let numeric = (lp - lm) / (2.0 * h);

        assert!((numeric - grads.b2[0]).abs() < 1e-6);
    }
}
