use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Identifies an agent by the index of the policy it is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Wing frames cycled through while flapping: up, level, down, level.
const WING_CYCLE: [u8; 4] = [0, 1, 2, 1];

/// Tilt at or below which the wings are held level.
const GLIDE_TILT: f64 = -80.0;

/// One simulated flyer and its vertical physics state.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Policy binding; fixed for the agent's lifetime.
    pub id: AgentId,
    /// Horizontal position. Constant within a generation.
    pub x: f64,
    /// Vertical position of the sprite's top edge (down is positive).
    pub y: f64,
    /// Velocity set by the last jump.
    pub velocity: f64,
    /// Nose angle in degrees, positive is up.
    pub tilt: f64,
    /// Ticks since the last jump.
    pub ticks_since_jump: u32,
    /// Height the last jump started from.
    pub jump_height: f64,
    /// Fitness accumulated this generation.
    pub fitness: f64,
    animation_tick: u32,
    wing_frame: u8,
}

impl Agent {
    /// Create an agent at the configured spawn point.
    pub fn new(id: AgentId, config: &SimConfig) -> Self {
        Self::at(id, config.agent_x, config.agent_y)
    }

    /// Create an agent at an explicit position, at rest.
    pub fn at(id: AgentId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            velocity: 0.0,
            tilt: 0.0,
            ticks_since_jump: 0,
            jump_height: y,
            fitness: 0.0,
            animation_tick: 0,
            wing_frame: 0,
        }
    }

    /// Start a new jump from the current height.
    pub fn jump(&mut self, config: &SimConfig) {
        self.velocity = config.jump_velocity;
        self.ticks_since_jump = 0;
        self.jump_height = self.y;
    }

    /// Displacement the next [`advance`](Self::advance) would apply, given
    /// the tick count it will have reached.
    pub fn displacement(&self, ticks: u32, config: &SimConfig) -> f64 {
        let t = f64::from(ticks);
        let mut d = self.velocity * t + 0.5 * config.gravity * t * t;
        if d >= config.terminal_velocity {
            d = config.terminal_velocity;
        }
        if d < 0.0 {
            d -= config.ascent_boost;
        }
        d
    }

    /// Integrate one tick of motion and update the tilt.
    pub fn advance(&mut self, config: &SimConfig) {
        self.ticks_since_jump += 1;
        let d = self.displacement(self.ticks_since_jump, config);
        self.y += d;

        if d < 0.0 || self.y < self.jump_height + config.tilt_hold_band {
            if self.tilt < config.max_tilt {
                self.tilt = config.max_tilt;
            }
        } else {
            self.tilt = (self.tilt - config.tilt_rate).max(config.min_tilt);
        }
    }

    /// Advance the wing animation by one tick.
    pub fn animate(&mut self, config: &SimConfig) {
        if self.tilt <= GLIDE_TILT {
            // Hold the wings level and resume the cycle from there.
            self.wing_frame = 1;
            self.animation_tick = config.animation_period * 2;
            return;
        }

        self.animation_tick += 1;
        let slot = (self.animation_tick / config.animation_period) as usize;
        match WING_CYCLE.get(slot) {
            Some(frame) => self.wing_frame = *frame,
            None => {
                self.animation_tick = 0;
                self.wing_frame = WING_CYCLE[0];
            }
        }
    }

    /// Current wing frame for renderers.
    pub fn wing_frame(&self) -> u8 {
        self.wing_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn agent_at(y: f64) -> Agent {
        Agent::at(AgentId(0), 230.0, y)
    }

    #[test]
    fn jump_resets_motion() {
        let config = SimConfig::default();
        let mut agent = agent_at(300.0);
        agent.ticks_since_jump = 17;
        agent.velocity = 4.0;
        agent.jump(&config);
        assert!((agent.velocity + 10.5).abs() < f64::EPSILON);
        assert_eq!(agent.ticks_since_jump, 0);
        assert!((agent.jump_height - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn first_tick_after_jump_rises_eleven() {
        let config = SimConfig::default();
        let mut agent = agent_at(350.0);
        agent.jump(&config);
        agent.advance(&config);
        // -10.5 * 1 + 1.5 * 1 = -9, boosted to -11
        assert!((agent.y - 339.0).abs() < 1e-9);
        assert_eq!(agent.ticks_since_jump, 1);
        assert!((agent.tilt - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn falling_from_rest() {
        let config = SimConfig::default();
        let mut agent = agent_at(100.0);
        agent.advance(&config);
        assert!((agent.y - 101.5).abs() < 1e-9);
        agent.advance(&config);
        assert!((agent.y - 107.5).abs() < 1e-9);
    }

    #[test]
    fn displacement_clamped_to_terminal_velocity() {
        let config = SimConfig::default();
        let agent = agent_at(0.0);
        // 1.5 * 4^2 = 24 > 16
        assert!((agent.displacement(4, &config) - 16.0).abs() < f64::EPSILON);
        assert!((agent.displacement(3, &config) - 13.5).abs() < f64::EPSILON);
    }

    #[test]
    fn tilt_drops_after_leaving_hold_band() {
        let config = SimConfig::default();
        let mut agent = agent_at(100.0);
        agent.jump(&config);
        let mut tilts = Vec::new();
        for _ in 0..30 {
            agent.advance(&config);
            tilts.push(agent.tilt);
        }
        assert!((tilts[0] - 25.0).abs() < f64::EPSILON);
        assert!(tilts.iter().any(|t| *t < 25.0));
        assert!((tilts[29] + 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn wings_cycle_while_flapping() {
        let config = SimConfig::default();
        let mut agent = agent_at(100.0);
        agent.tilt = 25.0;
        let frames: Vec<u8> = (0..21)
            .map(|_| {
                agent.animate(&config);
                agent.wing_frame()
            })
            .collect();
        assert_eq!(&frames[0..4], &[0, 0, 0, 0]);
        assert_eq!(frames[4], 1);
        assert_eq!(frames[9], 2);
        assert_eq!(frames[14], 1);
        assert_eq!(frames[19], 0);
        assert_eq!(frames[20], 0);
    }

    #[test]
    fn wings_level_when_diving() {
        let config = SimConfig::default();
        let mut agent = agent_at(100.0);
        agent.tilt = -90.0;
        agent.animate(&config);
        assert_eq!(agent.wing_frame(), 1);
    }

    proptest! {
        #[test]
        fn jump_invariant_holds_for_any_state(
            y in 0.0f64..730.0,
            velocity in -20.0f64..20.0,
            ticks in 0u32..500,
        ) {
            let config = SimConfig::default();
            let mut agent = agent_at(y);
            agent.velocity = velocity;
            agent.ticks_since_jump = ticks;
            agent.jump(&config);
            prop_assert!((agent.velocity + 10.5).abs() < f64::EPSILON);
            prop_assert_eq!(agent.ticks_since_jump, 0);
        }

        #[test]
        fn displacement_never_exceeds_terminal(ticks in 0u32..10_000, velocity in -20.0f64..20.0) {
            let config = SimConfig::default();
            let mut agent = agent_at(0.0);
            agent.velocity = velocity;
            prop_assert!(agent.displacement(ticks, &config) <= config.terminal_velocity);
        }

        #[test]
        fn tilt_stays_in_bounds(jumps in proptest::collection::vec(any::<bool>(), 1..200)) {
            let config = SimConfig::default();
            let mut agent = agent_at(350.0);
            for jump in jumps {
                if jump {
                    agent.jump(&config);
                }
                agent.advance(&config);
                prop_assert!(agent.tilt <= config.max_tilt);
                prop_assert!(agent.tilt >= config.min_tilt);
            }
        }

        #[test]
        fn advance_is_deterministic(y in 0.0f64..730.0, ticks in 0u32..40) {
            let config = SimConfig::default();
            let mut a = agent_at(y);
            a.jump(&config);
            a.ticks_since_jump = ticks;
            let mut b = a.clone();
            a.advance(&config);
            b.advance(&config);
            prop_assert_eq!(a, b);
        }
    }
}
