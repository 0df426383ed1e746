use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Sequential identifier for obstacles within a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pipe#{}", self.0)
    }
}

/// A pair of pipes with a vertical gap between them.
///
/// `height` is the upper edge of the gap. The top pipe hangs from `top`
/// (so its lower end sits at `height`); the bottom pipe starts at `bottom`.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Identifier, increasing in spawn order.
    pub id: ObstacleId,
    /// Left edge.
    pub x: f64,
    /// Upper edge of the gap.
    pub height: f64,
    /// Where the top piece's sprite begins.
    pub top: f64,
    /// Where the bottom piece's sprite begins.
    pub bottom: f64,
    /// Set once the lead agent has moved past `x`.
    pub passed: bool,
}

impl Obstacle {
    /// Spawn an obstacle at `x` with a gap height drawn from the configured range.
    pub fn spawn<R: Rng + ?Sized>(id: ObstacleId, x: f64, rng: &mut R, config: &SimConfig) -> Self {
        let height = rng.random_range(config.gap_height_min..config.gap_height_max);
        Self::with_height(id, x, f64::from(height), config)
    }

    /// Build an obstacle with a known gap height.
    pub fn with_height(id: ObstacleId, x: f64, height: f64, config: &SimConfig) -> Self {
        Self {
            id,
            x,
            height,
            top: height - f64::from(config.obstacle_shape.height()),
            bottom: height + config.obstacle_gap,
            passed: false,
        }
    }

    /// Upper edge of the gap.
    pub fn gap_top(&self) -> f64 {
        self.height
    }

    /// Lower edge of the gap.
    pub fn gap_bottom(&self) -> f64 {
        self.bottom
    }

    /// Right edge of the pipes.
    pub fn trailing_edge(&self, config: &SimConfig) -> f64 {
        self.x + f64::from(config.obstacle_shape.width())
    }

    /// Scroll one tick to the left.
    pub fn advance(&mut self, config: &SimConfig) {
        self.x -= config.obstacle_velocity;
    }

    /// True once the whole obstacle has left the screen.
    pub fn is_offscreen(&self, config: &SimConfig) -> bool {
        self.trailing_edge(config) < 0.0
    }
}
