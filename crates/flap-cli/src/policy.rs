use flap_core::{PolicyEngine, Sensor};
use rand::Rng;

/// Single-layer tanh network over the three sensor inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPolicy {
    weights: [f64; 3],
    bias: f64,
    /// Inputs are divided by this before weighting.
    scale: f64,
    fitness: f64,
}

impl LinearPolicy {
    pub fn new(weights: [f64; 3], bias: f64, scale: f64) -> Self {
        Self {
            weights,
            bias,
            scale,
            fitness: 0.0,
        }
    }

    /// Weights and bias drawn uniformly from [-1, 1).
    pub fn random<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> Self {
        let weights = [
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        ];
        Self::new(weights, rng.random_range(-1.0..1.0), scale)
    }

    /// A copy with every parameter nudged by up to `strength` and fitness reset.
    pub fn mutated<R: Rng + ?Sized>(&self, rng: &mut R, strength: f64) -> Self {
        let mut weights = self.weights;
        for w in &mut weights {
            *w += rng.random_range(-strength..strength);
        }
        let bias = self.bias + rng.random_range(-strength..strength);
        Self::new(weights, bias, self.scale)
    }

    /// An identical copy with fitness reset.
    pub fn fresh(&self) -> Self {
        Self::new(self.weights, self.bias, self.scale)
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

impl PolicyEngine for LinearPolicy {
    fn decide(&mut self, sensor: &Sensor) -> Vec<f64> {
        let sum: f64 = self
            .weights
            .iter()
            .zip(sensor.as_array())
            .map(|(w, x)| w * x / self.scale)
            .sum();
        vec![(sum + self.bias).tanh()]
    }

    fn notify_fitness(&mut self, delta: f64) {
        self.fitness += delta;
    }
}
