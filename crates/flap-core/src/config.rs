use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::silhouette::Shape;

/// Largest silhouette side accepted, in cells.
pub const MAX_SHAPE_SIDE: u32 = 4096;

/// Configuration for a generation run.
///
/// Built once and shared by reference with every component; nothing in the
/// simulation reads global constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for obstacle gap heights.
    pub seed: u64,
    /// Width of the visible world.
    pub screen_width: f64,
    /// Height of the visible world.
    pub screen_height: f64,
    /// Height of the floor; agents touching it are out of bounds.
    pub ground_y: f64,

    /// Gravity constant `a` in `d = v*t + a*t^2/2`.
    pub gravity: f64,
    /// Vertical velocity set by a jump (negative is up).
    pub jump_velocity: f64,
    /// Ceiling on the per-tick downward displacement.
    pub terminal_velocity: f64,
    /// Extra upward displacement applied while ascending.
    pub ascent_boost: f64,
    /// Distance below the jump height in which the agent keeps its nose up.
    pub tilt_hold_band: f64,
    /// Maximum upward tilt in degrees.
    pub max_tilt: f64,
    /// Maximum downward tilt in degrees.
    pub min_tilt: f64,
    /// Degrees of downward tilt added per tick while falling.
    pub tilt_rate: f64,
    /// Ticks each wing frame is held.
    pub animation_period: u32,

    /// Spawn x of every agent.
    pub agent_x: f64,
    /// Spawn y of every agent.
    pub agent_y: f64,
    /// Hit shape of an agent.
    pub agent_shape: Shape,

    /// Vertical size of the opening in each obstacle.
    pub obstacle_gap: f64,
    /// Horizontal scroll speed shared by obstacles and ground.
    pub obstacle_velocity: f64,
    /// Lowest gap height that can be drawn (inclusive).
    pub gap_height_min: i32,
    /// Upper bound for drawn gap heights (exclusive).
    pub gap_height_max: i32,
    /// Hit shape of one obstacle piece; the top piece is the same shape.
    pub obstacle_shape: Shape,
    /// Position of the obstacle present when a generation starts.
    pub first_obstacle_x: f64,
    /// Position at which obstacles are appended after a pass.
    pub spawn_x: f64,
    /// Width of one ground segment.
    pub ground_width: f64,

    /// Policy activations above this trigger a jump.
    pub jump_threshold: f64,
    /// Fitness granted to every live agent each tick.
    pub survival_reward: f64,
    /// Fitness removed from an agent that hits an obstacle.
    pub collision_penalty: f64,
    /// Fitness granted to every survivor when the lead agent passes an obstacle.
    pub pass_bonus: f64,

    /// Optional cap on ticks per generation.
    pub max_ticks: Option<u64>,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Nominal frame rate, used only to report elapsed time.
    pub ticks_per_second: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            screen_width: 500.0,
            screen_height: 800.0,
            ground_y: 730.0,
            gravity: 3.0,
            jump_velocity: -10.5,
            terminal_velocity: 16.0,
            ascent_boost: 2.0,
            tilt_hold_band: 50.0,
            max_tilt: 25.0,
            min_tilt: -90.0,
            tilt_rate: 20.0,
            animation_period: 5,
            agent_x: 230.0,
            agent_y: 350.0,
            agent_shape: Shape::Ellipse {
                width: 68,
                height: 48,
            },
            obstacle_gap: 200.0,
            obstacle_velocity: 5.0,
            gap_height_min: 40,
            gap_height_max: 450,
            obstacle_shape: Shape::Rect {
                width: 104,
                height: 640,
            },
            first_obstacle_x: 700.0,
            spawn_x: 600.0,
            ground_width: 672.0,
            jump_threshold: 0.5,
            survival_reward: 0.1,
            collision_penalty: 1.0,
            pass_bonus: 5.0,
            max_ticks: None,
            max_events: 0,
            ticks_per_second: 30,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic gap heights.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of ticks a generation may run.
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set the half-open range gap heights are drawn from.
    pub fn with_gap_height_range(mut self, min: i32, max: i32) -> Self {
        self.gap_height_min = min;
        self.gap_height_max = max;
        self
    }

    /// Set the hit shape of agents.
    pub fn with_agent_shape(mut self, shape: Shape) -> Self {
        self.agent_shape = shape;
        self
    }

    /// Set the hit shape of obstacle pieces.
    pub fn with_obstacle_shape(mut self, shape: Shape) -> Self {
        self.obstacle_shape = shape;
        self
    }

    /// Set where agents spawn.
    pub fn with_agent_start(mut self, x: f64, y: f64) -> Self {
        self.agent_x = x;
        self.agent_y = y;
        self
    }

    /// Set where the first obstacle starts.
    pub fn with_first_obstacle_x(mut self, x: f64) -> Self {
        self.first_obstacle_x = x;
        self
    }

    /// Set the fitness rewards: per-tick survival, collision penalty, pass bonus.
    pub fn with_rewards(mut self, survival: f64, collision: f64, pass: f64) -> Self {
        self.survival_reward = survival;
        self.collision_penalty = collision;
        self.pass_bonus = pass;
        self
    }

    /// Check that the values describe a playable world.
    pub fn validate(&self) -> SimResult<()> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(invalid("screen dimensions must be positive"));
        }
        if self.ground_y <= 0.0 || self.ground_y > self.screen_height {
            return Err(invalid(format!(
                "ground_y {} must lie within (0, {}]",
                self.ground_y, self.screen_height
            )));
        }
        if self.gap_height_min >= self.gap_height_max {
            return Err(invalid(format!(
                "gap height range {}..{} is empty",
                self.gap_height_min, self.gap_height_max
            )));
        }
        if self.gap_height_min < 0 || f64::from(self.gap_height_max) > self.ground_y {
            return Err(invalid(format!(
                "gap height range {}..{} leaves the screen",
                self.gap_height_min, self.gap_height_max
            )));
        }
        if self.obstacle_gap <= 0.0 {
            return Err(invalid("obstacle_gap must be positive"));
        }
        if self.obstacle_velocity <= 0.0 {
            return Err(invalid("obstacle_velocity must be positive"));
        }
        if self.terminal_velocity <= 0.0 {
            return Err(invalid("terminal_velocity must be positive"));
        }
        if self.tilt_rate <= 0.0 || self.min_tilt > self.max_tilt {
            return Err(invalid("tilt bounds are inconsistent"));
        }
        if self.animation_period == 0 || self.ticks_per_second == 0 {
            return Err(invalid("animation_period and ticks_per_second must be non-zero"));
        }
        if self.ground_width < self.screen_width {
            return Err(invalid(format!(
                "ground segment ({}) is narrower than the screen ({})",
                self.ground_width, self.screen_width
            )));
        }
        if self.agent_shape.is_empty() || self.obstacle_shape.is_empty() {
            return Err(invalid("silhouettes must have a non-zero area"));
        }
        for shape in [&self.agent_shape, &self.obstacle_shape] {
            if shape.width() > MAX_SHAPE_SIDE || shape.height() > MAX_SHAPE_SIDE {
                return Err(invalid(format!(
                    "silhouette {}x{} exceeds {MAX_SHAPE_SIDE} cells per side",
                    shape.width(),
                    shape.height()
                )));
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> SimError {
    SimError::InvalidConfig(msg.into())
}
