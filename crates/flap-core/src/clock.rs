/// Tracks simulation time: a monotonic tick counter with an optional cap.
///
/// Ticks are nominally paced at a fixed frame rate by the host; the clock
/// only counts them and converts to seconds for reporting.
#[derive(Debug, Clone)]
pub struct TickClock {
    tick: u64,
    max_ticks: Option<u64>,
    ticks_per_second: u32,
}

impl TickClock {
    /// Create a clock at tick 0.
    pub fn new(max_ticks: Option<u64>, ticks_per_second: u32) -> Self {
        Self {
            tick: 0,
            max_ticks,
            ticks_per_second,
        }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// True once the configured cap has been reached.
    pub fn cap_reached(&self) -> bool {
        self.max_ticks.is_some_and(|max| self.tick >= max)
    }

    /// Simulated seconds elapsed at the nominal frame rate.
    pub fn elapsed_secs(&self) -> f64 {
        self.tick as f64 / f64::from(self.ticks_per_second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        let clock = TickClock::new(None, 30);
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.elapsed_secs(), 0.0);
        assert!(!clock.cap_reached());
    }

    #[test]
    fn clock_advance_increments() {
        let mut clock = TickClock::new(None, 30);
        for _ in 0..45 {
            clock.advance();
        }
        assert_eq!(clock.tick(), 45);
        assert!((clock.elapsed_secs() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn clock_cap() {
        let mut clock = TickClock::new(Some(2), 30);
        clock.advance();
        assert!(!clock.cap_reached());
        clock.advance();
        assert!(clock.cap_reached());
    }

    #[test]
    fn zero_cap_is_reached_immediately() {
        assert!(TickClock::new(Some(0), 30).cap_reached());
    }
}
