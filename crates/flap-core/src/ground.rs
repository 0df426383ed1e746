use crate::config::SimConfig;

/// Two ground segments scrolled end to end so the floor never shows a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Ground {
    /// Left edge of the first segment.
    pub x1: f64,
    /// Left edge of the second segment.
    pub x2: f64,
}

impl Ground {
    /// Segments placed side by side starting at the left screen edge.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            x1: 0.0,
            x2: config.ground_width,
        }
    }

    /// Scroll in lock-step with obstacles, recycling a segment that has left the screen.
    pub fn advance(&mut self, config: &SimConfig) {
        let width = config.ground_width;
        self.x1 -= config.obstacle_velocity;
        self.x2 -= config.obstacle_velocity;

        if self.x1 + width < 0.0 {
            self.x1 = self.x2 + width;
        }
        if self.x2 + width < 0.0 {
            self.x2 = self.x1 + width;
        }
    }

    /// Whether the segments together span the whole screen width.
    pub fn covers(&self, config: &SimConfig) -> bool {
        let width = config.ground_width;
        let (left, right) = if self.x1 <= self.x2 {
            (self.x1, self.x2)
        } else {
            (self.x2, self.x1)
        };
        left <= 0.0 && right <= left + width && right + width >= config.screen_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_side_by_side() {
        let config = SimConfig::default();
        let ground = Ground::new(&config);
        assert_eq!(ground.x1, 0.0);
        assert_eq!(ground.x2, 672.0);
        assert!(ground.covers(&config));
    }

    #[test]
    fn segment_wraps_behind_the_other() {
        let config = SimConfig::default();
        let mut ground = Ground { x1: -670.0, x2: 2.0 };
        ground.advance(&config);
        // x1 reached -675 and jumped to the right of x2 (-3).
        assert_eq!(ground.x2, -3.0);
        assert_eq!(ground.x1, 669.0);
        assert!(ground.covers(&config));
    }

    proptest! {
        #[test]
        fn floor_always_covered(ticks in 0usize..2_000) {
            let config = SimConfig::default();
            let mut ground = Ground::new(&config);
            for _ in 0..ticks {
                ground.advance(&config);
                prop_assert!(ground.covers(&config));
            }
        }
    }
}
