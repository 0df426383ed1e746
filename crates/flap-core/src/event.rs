use std::collections::VecDeque;

use crate::agent::AgentId;
use crate::evaluator::FinishReason;
use crate::obstacle::ObstacleId;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEventKind {
    // Agents
    /// An agent hit an obstacle and was removed.
    AgentCrashed {
        /// The removed agent.
        agent: AgentId,
        /// The obstacle it hit.
        obstacle: ObstacleId,
        /// Fitness the agent finished with.
        fitness: f64,
    },
    /// An agent touched the ground or left the top of the screen and was removed.
    AgentOutOfBounds {
        /// The removed agent.
        agent: AgentId,
        /// Fitness the agent finished with.
        fitness: f64,
    },

    // Obstacles
    /// The lead agent moved past an obstacle.
    ObstaclePassed {
        /// The obstacle that was passed.
        obstacle: ObstacleId,
        /// Score after the pass.
        score: u32,
    },
    /// A new obstacle entered the course.
    ObstacleSpawned {
        /// The new obstacle.
        obstacle: ObstacleId,
        /// Its gap height.
        height: f64,
    },
    /// An obstacle scrolled off the left edge and was dropped.
    ObstacleRetired {
        /// The dropped obstacle.
        obstacle: ObstacleId,
    },

    // Lifecycle
    /// The generation reached its terminal state.
    GenerationFinished {
        /// Why it ended.
        reason: FinishReason,
    },
}

impl SimEventKind {
    /// Check whether a given agent is involved in this event.
    pub fn involves(&self, id: AgentId) -> bool {
        match self {
            Self::AgentCrashed { agent, .. } | Self::AgentOutOfBounds { agent, .. } => *agent == id,
            Self::ObstaclePassed { .. }
            | Self::ObstacleSpawned { .. }
            | Self::ObstacleRetired { .. }
            | Self::GenerationFinished { .. } => false,
        }
    }

    /// True for events that remove an agent from the population.
    pub fn is_removal(&self) -> bool {
        matches!(
            self,
            Self::AgentCrashed { .. } | Self::AgentOutOfBounds { .. }
        )
    }
}

/// Something that happened during a tick, with a line fit for a log.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    /// Tick the event happened on.
    pub tick: u64,
    /// What happened.
    pub kind: SimEventKind,
    /// Human-readable summary.
    pub description: String,
}

impl SimEvent {
    /// Build an event.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Events of one generation, oldest first.
///
/// With a nonzero capacity the log keeps only the most recent events.
#[derive(Debug, Default)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
    capacity: usize,
}

impl EventLog {
    /// A log holding at most `capacity` events; 0 keeps everything.
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
        }
    }

    /// Record an event, evicting the oldest one when full.
    pub fn push(&mut self, event: SimEvent) {
        if self.capacity > 0 && self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// All retained events in the order they happened.
    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    /// Events recorded on `tick`.
    pub fn at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.iter().filter(|e| e.tick == tick).collect()
    }

    /// Events that name `id`.
    pub fn for_agent(&self, id: AgentId) -> Vec<&SimEvent> {
        self.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Crashes and out-of-bounds removals.
    pub fn removals(&self) -> impl Iterator<Item = &SimEvent> {
        self.iter().filter(|e| e.kind.is_removal())
    }

    /// Number of obstacle passes still in the log.
    pub fn passes(&self) -> usize {
        self.iter()
            .filter(|e| matches!(e.kind, SimEventKind::ObstaclePassed { .. }))
            .count()
    }

    /// Retained event count.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crash(tick: u64, agent: usize) -> SimEvent {
        SimEvent::new(
            tick,
            SimEventKind::AgentCrashed {
                agent: AgentId(agent),
                obstacle: ObstacleId(0),
                fitness: 1.0,
            },
            "test",
        )
    }

    #[test]
    fn crash_is_found_by_agent_and_tick() {
        let mut log = EventLog::new(0);
        log.push(crash(1, 3));
        assert_eq!(log.len(), 1);
        assert_eq!(log.at_tick(1).len(), 1);
        assert_eq!(log.for_agent(AgentId(3)).len(), 1);
        assert!(log.for_agent(AgentId(4)).is_empty());
    }

    #[test]
    fn bounded_log_keeps_newest() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(crash(i, 0));
        }
        let ticks: Vec<_> = log.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![3, 4]);
    }

    #[test]
    fn event_kind_involves_agent() {
        let kind = SimEventKind::AgentOutOfBounds {
            agent: AgentId(1),
            fitness: 0.0,
        };
        assert!(kind.involves(AgentId(1)));
        assert!(!kind.involves(AgentId(2)));
        assert!(kind.is_removal());

        let kind = SimEventKind::ObstaclePassed {
            obstacle: ObstacleId(0),
            score: 1,
        };
        assert!(!kind.involves(AgentId(1)));
        assert!(!kind.is_removal());
    }

    #[test]
    fn removals_and_passes_are_counted() {
        let mut log = EventLog::new(0);
        log.push(crash(1, 0));
        log.push(SimEvent::new(
            1,
            SimEventKind::ObstacleSpawned {
                obstacle: ObstacleId(1),
                height: 120.0,
            },
            "spawn",
        ));
        log.push(crash(2, 1));
        log.push(SimEvent::new(
            2,
            SimEventKind::ObstaclePassed {
                obstacle: ObstacleId(0),
                score: 1,
            },
            "pass",
        ));

        assert_eq!(log.at_tick(1).len(), 2);
        assert_eq!(log.at_tick(3).len(), 0);
        assert_eq!(log.removals().count(), 2);
        assert_eq!(log.passes(), 1);
        assert!(EventLog::default().is_empty());
    }
}
