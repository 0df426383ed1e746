use serde::Serialize;

/// Observation handed to a policy each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sensor {
    /// The agent's height.
    pub y: f64,
    /// Distance to the upper edge of the target gap.
    pub to_gap_top: f64,
    /// Distance to the lower edge of the target gap.
    pub to_gap_bottom: f64,
}

impl Sensor {
    /// Build the observation for an agent at `y` aiming at the given gap edges.
    pub fn new(y: f64, gap_top: f64, gap_bottom: f64) -> Self {
        Self {
            y,
            to_gap_top: (y - gap_top).abs(),
            to_gap_bottom: (y - gap_bottom).abs(),
        }
    }

    /// The three inputs in network order.
    pub fn as_array(&self) -> [f64; 3] {
        [self.y, self.to_gap_top, self.to_gap_bottom]
    }
}

/// What an agent does this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep falling.
    Idle,
    /// Start a new jump.
    Jump,
}

impl Action {
    /// Interpret policy output: jump when the first activation exceeds `threshold`.
    /// Empty output never jumps.
    pub fn from_activation(activation: &[f64], threshold: f64) -> Self {
        match activation.first() {
            Some(a) if *a > threshold => Self::Jump,
            _ => Self::Idle,
        }
    }
}

/// The decision-making half of an agent, supplied by the evolutionary driver.
///
/// One instance is bound to each agent for the whole generation.
pub trait PolicyEngine {
    /// Map an observation to output activations. Only the first one is read.
    fn decide(&mut self, sensor: &Sensor) -> Vec<f64>;

    /// Receive a fitness change for the bound agent.
    fn notify_fitness(&mut self, _delta: f64) {}
}

/// Policy that always outputs the same activation and sums its fitness.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPolicy {
    /// Activation returned every tick.
    pub output: f64,
    /// Sum of all notified fitness changes.
    pub fitness: f64,
}

impl ConstantPolicy {
    /// A policy that never jumps.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A policy that jumps every tick.
    pub fn flapping() -> Self {
        Self {
            output: 1.0,
            fitness: 0.0,
        }
    }
}

impl PolicyEngine for ConstantPolicy {
    fn decide(&mut self, _sensor: &Sensor) -> Vec<f64> {
        vec![self.output]
    }

    fn notify_fitness(&mut self, delta: f64) {
        self.fitness += delta;
    }
}

/// Adapts a closure into a policy, summing notified fitness.
pub struct FnPolicy<F> {
    decide: F,
    /// Sum of all notified fitness changes.
    pub fitness: f64,
}

impl<F> FnPolicy<F>
where
    F: FnMut(&Sensor) -> Vec<f64>,
{
    /// Wrap a decision closure.
    pub fn new(decide: F) -> Self {
        Self {
            decide,
            fitness: 0.0,
        }
    }
}

impl<F> std::fmt::Debug for FnPolicy<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPolicy")
            .field("fitness", &self.fitness)
            .finish()
    }
}

impl<F> PolicyEngine for FnPolicy<F>
where
    F: FnMut(&Sensor) -> Vec<f64>,
{
    fn decide(&mut self, sensor: &Sensor) -> Vec<f64> {
        (self.decide)(sensor)
    }

    fn notify_fitness(&mut self, delta: f64) {
        self.fitness += delta;
    }
}
