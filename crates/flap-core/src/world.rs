//! Per-generation world state and the deterministic tick step.
//!
//! A tick is split in two so the policy query stays outside the world:
//! [`World::sense`] builds one observation per live agent, the caller turns
//! them into [`Action`]s, and [`World::step`] applies everything else in a
//! fixed order. Live collections are only mutated after the scans that read
//! them have finished.

use std::mem;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::agent::{Agent, AgentId};
use crate::clock::TickClock;
use crate::collision::CollisionDetector;
use crate::config::SimConfig;
use crate::error::SimResult;
use crate::event::{SimEvent, SimEventKind};
use crate::ground::Ground;
use crate::obstacle::{Obstacle, ObstacleId};
use crate::policy::{Action, Sensor};
use crate::snapshot::{AgentView, GroundView, ObstacleView, WorldSnapshot};

/// Why an agent's fitness changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardKind {
    /// Per-tick reward for staying alive.
    Survival,
    /// Penalty for hitting an obstacle.
    Collision,
    /// Bonus for surviving a tick in which an obstacle was passed.
    Pass,
}

/// A single fitness change for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessChange {
    /// The agent whose fitness changed.
    pub agent: AgentId,
    /// Signed amount.
    pub delta: f64,
    /// What earned it.
    pub kind: RewardKind,
}

/// Why an agent left the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalCause {
    /// Hit the given obstacle.
    Collision(ObstacleId),
    /// Touched the ground or left through the top.
    OutOfBounds,
}

/// An agent culled during a tick, with the fitness it finished on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemovedAgent {
    /// The culled agent.
    pub id: AgentId,
    /// Final fitness.
    pub fitness: f64,
    /// Why it was culled.
    pub cause: RemovalCause,
}

/// Everything a call to [`World::step`] changed.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// The tick that was processed.
    pub tick: u64,
    /// Fitness changes in the order they were applied.
    pub fitness_changes: Vec<FitnessChange>,
    /// Agents culled this tick.
    pub removed: Vec<RemovedAgent>,
    /// Whether the lead agent passed an obstacle this tick.
    pub passed: bool,
    /// Events to record.
    pub events: Vec<SimEvent>,
}

/// The live agents, obstacles, and ground of one generation.
#[derive(Debug)]
pub struct World {
    config: SimConfig,
    detector: CollisionDetector,
    rng: StdRng,
    clock: TickClock,
    agents: Vec<Agent>,
    obstacles: Vec<Obstacle>,
    ground: Ground,
    score: u32,
    next_obstacle_id: u64,
}

impl World {
    /// Start a generation with `population` agents at the spawn point and one
    /// obstacle at `first_obstacle_x`.
    pub fn new(population: usize, config: SimConfig) -> SimResult<Self> {
        let agents = (0..population)
            .map(|i| Agent::new(AgentId(i), &config))
            .collect();
        let mut world = Self::with_layout(config, agents, Vec::new())?;
        let first = world.spawn_obstacle(world.config.first_obstacle_x);
        world.obstacles.push(first);
        Ok(world)
    }

    /// Start from explicit agents and obstacles. Obstacles are sorted by x.
    pub fn with_layout(
        config: SimConfig,
        agents: Vec<Agent>,
        mut obstacles: Vec<Obstacle>,
    ) -> SimResult<Self> {
        config.validate()?;
        obstacles.sort_by(|a, b| a.x.total_cmp(&b.x));
        let next_obstacle_id = obstacles.iter().map(|o| o.id.0 + 1).max().unwrap_or(0);
        Ok(Self {
            detector: CollisionDetector::new(&config),
            rng: StdRng::seed_from_u64(config.seed),
            clock: TickClock::new(config.max_ticks, config.ticks_per_second),
            ground: Ground::new(&config),
            agents,
            obstacles,
            score: 0,
            next_obstacle_id,
            config,
        })
    }

    fn spawn_obstacle(&mut self, x: f64) -> Obstacle {
        let id = ObstacleId(self.next_obstacle_id);
        self.next_obstacle_id += 1;
        Obstacle::spawn(id, x, &mut self.rng, &self.config)
    }

    /// The frontmost live agent; the first in population order on ties.
    pub fn lead_agent(&self) -> Option<&Agent> {
        self.agents
            .iter()
            .reduce(|lead, a| if a.x > lead.x { a } else { lead })
    }

    /// Index of the obstacle agents should aim for.
    ///
    /// Once the lead agent is past the nearest obstacle's trailing edge and a
    /// second obstacle exists, agents look ahead to it. `None` when there are
    /// no agents or no obstacles.
    pub fn target_index(&self) -> Option<usize> {
        let lead = self.lead_agent()?;
        let nearest = self.obstacles.first()?;
        if self.obstacles.len() > 1 && lead.x > nearest.trailing_edge(&self.config) {
            Some(1)
        } else {
            Some(0)
        }
    }

    /// Observations for every live agent, in population order.
    ///
    /// Without an obstacle the target gap is the whole open sky, from the top
    /// of the screen down to the ground.
    pub fn sense(&self) -> Vec<(AgentId, Sensor)> {
        let (gap_top, gap_bottom) = match self.target_index() {
            Some(i) => (self.obstacles[i].gap_top(), self.obstacles[i].gap_bottom()),
            None => (0.0, self.config.ground_y),
        };
        self.agents
            .iter()
            .map(|a| (a.id, Sensor::new(a.y, gap_top, gap_bottom)))
            .collect()
    }

    /// Process one tick given one action per live agent, in population order.
    ///
    /// Order: actions and survival reward, physics, collision pass (penalty,
    /// pass detection, retirement scheduling), bounds pass, culling, pass
    /// bonus, obstacle maintenance, ground.
    pub fn step(&mut self, actions: &[Action]) -> TickOutcome {
        debug_assert_eq!(actions.len(), self.agents.len(), "one action per live agent");
        let tick = self.clock.advance();
        let mut outcome = TickOutcome {
            tick,
            ..TickOutcome::default()
        };
        let population_before = self.agents.len();
        let lead_x = self.lead_agent().map(|a| a.x);
        let config = &self.config;

        // Act, and reward everyone still flying.
        for (agent, action) in self.agents.iter_mut().zip(actions) {
            agent.fitness += config.survival_reward;
            outcome.fitness_changes.push(FitnessChange {
                agent: agent.id,
                delta: config.survival_reward,
                kind: RewardKind::Survival,
            });
            if *action == Action::Jump {
                agent.jump(config);
            }
        }

        for agent in &mut self.agents {
            agent.advance(config);
            agent.animate(config);
        }

        // Collision pass. Nothing is removed here, only marked.
        let mut doomed: Vec<Option<RemovalCause>> = vec![None; self.agents.len()];
        let mut passed: Vec<ObstacleId> = Vec::new();
        let mut retiring: Vec<ObstacleId> = Vec::new();
        for obstacle in &mut self.obstacles {
            for (i, agent) in self.agents.iter_mut().enumerate() {
                if doomed[i].is_none() && self.detector.collides(agent, obstacle) {
                    agent.fitness -= config.collision_penalty;
                    outcome.fitness_changes.push(FitnessChange {
                        agent: agent.id,
                        delta: -config.collision_penalty,
                        kind: RewardKind::Collision,
                    });
                    doomed[i] = Some(RemovalCause::Collision(obstacle.id));
                }
            }

            if !obstacle.passed && lead_x.is_some_and(|x| obstacle.x < x) {
                obstacle.passed = true;
                passed.push(obstacle.id);
            }

            if obstacle.is_offscreen(config) {
                retiring.push(obstacle.id);
            }
        }

        // Bounds pass.
        for (i, agent) in self.agents.iter().enumerate() {
            if doomed[i].is_none() && self.detector.out_of_bounds(agent) {
                doomed[i] = Some(RemovalCause::OutOfBounds);
            }
        }

        // Cull in one pass now that every agent has been checked.
        let (culled, kept): (Vec<_>, Vec<_>) = mem::take(&mut self.agents)
            .into_iter()
            .zip(doomed)
            .partition(|(_, cause)| cause.is_some());
        self.agents = kept.into_iter().map(|(agent, _)| agent).collect();
        for (agent, cause) in culled {
            let Some(cause) = cause else { continue };
            let kind = match cause {
                RemovalCause::Collision(obstacle) => SimEventKind::AgentCrashed {
                    agent: agent.id,
                    obstacle,
                    fitness: agent.fitness,
                },
                RemovalCause::OutOfBounds => SimEventKind::AgentOutOfBounds {
                    agent: agent.id,
                    fitness: agent.fitness,
                },
            };
            debug!(tick, agent = %agent.id, fitness = agent.fitness, ?cause, "agent culled");
            outcome.events.push(SimEvent::new(
                tick,
                kind,
                format!("{} removed ({cause:?}) with fitness {:.1}", agent.id, agent.fitness),
            ));
            outcome.removed.push(RemovedAgent {
                id: agent.id,
                fitness: agent.fitness,
                cause,
            });
        }

        if !passed.is_empty() {
            outcome.passed = true;
            self.score += 1;
            for agent in &mut self.agents {
                agent.fitness += config.pass_bonus;
                outcome.fitness_changes.push(FitnessChange {
                    agent: agent.id,
                    delta: config.pass_bonus,
                    kind: RewardKind::Pass,
                });
            }
            for obstacle in &passed {
                outcome.events.push(SimEvent::new(
                    tick,
                    SimEventKind::ObstaclePassed {
                        obstacle: *obstacle,
                        score: self.score,
                    },
                    format!("{obstacle} passed, score {}", self.score),
                ));
            }
        }

        // Obstacle maintenance.
        for obstacle in &mut self.obstacles {
            obstacle.advance(config);
        }
        if outcome.passed {
            let spawned = self.spawn_obstacle(self.config.spawn_x);
            debug!(tick, obstacle = %spawned.id, height = spawned.height, "obstacle spawned");
            outcome.events.push(SimEvent::new(
                tick,
                SimEventKind::ObstacleSpawned {
                    obstacle: spawned.id,
                    height: spawned.height,
                },
                format!("{} spawned with gap at {}", spawned.id, spawned.height),
            ));
            let at = self.obstacles.partition_point(|o| o.x <= spawned.x);
            self.obstacles.insert(at, spawned);
        }
        if !retiring.is_empty() {
            self.obstacles.retain(|o| !retiring.contains(&o.id));
            for obstacle in retiring {
                debug!(tick, %obstacle, "obstacle retired");
                outcome.events.push(SimEvent::new(
                    tick,
                    SimEventKind::ObstacleRetired { obstacle },
                    format!("{obstacle} left the screen"),
                ));
            }
        }

        self.ground.advance(&self.config);

        debug_assert!(
            self.obstacles.windows(2).all(|w| w[0].x <= w[1].x),
            "obstacles lost x order"
        );
        debug_assert!(self.agents.len() <= population_before, "population grew");
        trace!(
            tick,
            alive = self.agents.len(),
            obstacles = self.obstacles.len(),
            score = self.score,
            "tick processed"
        );
        outcome
    }

    /// Read-only view for renderers.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.clock.tick(),
            score: self.score,
            agents: self
                .agents
                .iter()
                .map(|a| AgentView {
                    id: a.id,
                    x: a.x,
                    y: a.y,
                    tilt: a.tilt,
                    frame: a.wing_frame(),
                })
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    x: o.x,
                    top_y: o.top,
                    bottom_y: o.bottom,
                })
                .collect(),
            ground: GroundView {
                x1: self.ground.x1,
                x2: self.ground.x2,
            },
        }
    }

    /// Live agents in population order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Live obstacles in ascending x.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// The scrolling floor.
    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    /// Obstacles passed so far.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// The generation's clock.
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// The configuration this world was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of live agents.
    pub fn population(&self) -> usize {
        self.agents.len()
    }

    /// True when every agent has been culled.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
