use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::info;

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::policy::{Action, PolicyEngine};
use crate::snapshot::{NullRenderer, Renderer};
use crate::world::World;

/// Why a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Every agent was culled.
    PopulationExhausted,
    /// The configured tick cap was reached.
    TickCap,
    /// The stop signal was raised.
    Aborted,
}

/// Lifecycle of a generation. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    /// Ticks are still being processed.
    Running,
    /// No further ticks will be processed.
    Finished(FinishReason),
}

/// Cloneable handle the host can raise to abort a running generation.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// A lowered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the generation to stop before its next tick.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the signal has been raised.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a generation, indexed like the policies that were evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Final fitness of each policy.
    pub fitness: Vec<f64>,
    /// Tick at which each agent was culled; `None` for survivors.
    pub removed_at: Vec<Option<u64>>,
    /// Obstacles passed.
    pub score: u32,
    /// Ticks processed.
    pub ticks: u64,
    /// Agents still alive at the end.
    pub survivors: usize,
    /// Why the generation ended.
    pub reason: FinishReason,
}

impl GenerationReport {
    /// Index and fitness of the fittest policy, first one on ties.
    pub fn best(&self) -> Option<(usize, f64)> {
        self.fitness
            .iter()
            .copied()
            .enumerate()
            .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
    }
}

/// Runs one generation: binds each policy to an agent and drives the world
/// until the population is exhausted, the tick cap is hit, or the stop
/// signal is raised.
pub struct Evaluator<'p, P> {
    world: World,
    events: EventLog,
    policies: &'p mut [P],
    fitness: Vec<f64>,
    removed_at: Vec<Option<u64>>,
    state: GenerationState,
    stop: StopSignal,
}

impl<P> std::fmt::Debug for Evaluator<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("tick", &self.world.clock().tick())
            .field("alive", &self.world.population())
            .field("policies", &self.policies.len())
            .field("state", &self.state)
            .finish()
    }
}

impl<'p, P: PolicyEngine> Evaluator<'p, P> {
    /// Create a generation with one agent per policy.
    ///
    /// An empty slice is a valid, already exhausted generation.
    pub fn new(policies: &'p mut [P], config: SimConfig) -> SimResult<Self> {
        let world = World::new(policies.len(), config)?;
        Self::with_world(policies, world)
    }

    /// Drive a prepared world. Every agent's id must index into `policies`,
    /// and no two agents may share one.
    pub fn with_world(policies: &'p mut [P], world: World) -> SimResult<Self> {
        let mut bound = HashSet::with_capacity(world.population());
        for agent in world.agents() {
            if agent.id.0 >= policies.len() {
                return Err(SimError::UnboundAgent(agent.id));
            }
            if !bound.insert(agent.id) {
                return Err(SimError::DuplicateBinding(agent.id));
            }
        }
        let events = EventLog::new(world.config().max_events);
        Ok(Self {
            fitness: vec![0.0; policies.len()],
            removed_at: vec![None; policies.len()],
            world,
            events,
            policies,
            state: GenerationState::Running,
            stop: StopSignal::new(),
        })
    }

    /// Use an externally owned stop signal.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// A handle to this generation's stop signal.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Process one tick and present the resulting snapshot.
    ///
    /// Does nothing once the generation has finished. A raised stop signal or
    /// an exhausted population ends the generation without stepping.
    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> GenerationState {
        if self.is_finished() {
            return self.state;
        }
        if self.stop.is_raised() {
            return self.finish(FinishReason::Aborted);
        }
        if self.world.is_empty() {
            return self.finish(FinishReason::PopulationExhausted);
        }
        if self.world.clock().cap_reached() {
            return self.finish(FinishReason::TickCap);
        }

        let threshold = self.world.config().jump_threshold;
        let actions: Vec<Action> = self
            .world
            .sense()
            .iter()
            .map(|(id, sensor)| {
                let activation = self.policies[id.0].decide(sensor);
                Action::from_activation(&activation, threshold)
            })
            .collect();

        let outcome = self.world.step(&actions);

        for change in &outcome.fitness_changes {
            let i = change.agent.0;
            self.fitness[i] += change.delta;
            self.policies[i].notify_fitness(change.delta);
        }
        for removed in &outcome.removed {
            self.removed_at[removed.id.0] = Some(outcome.tick);
        }
        for event in outcome.events {
            self.events.push(event);
        }

        renderer.present(&self.world.snapshot());

        if self.world.is_empty() {
            self.finish(FinishReason::PopulationExhausted)
        } else if self.world.clock().cap_reached() {
            self.finish(FinishReason::TickCap)
        } else {
            self.state
        }
    }

    /// Tick until the generation finishes, then report.
    pub fn run<R: Renderer>(&mut self, renderer: &mut R) -> GenerationReport {
        while !self.is_finished() {
            self.tick(renderer);
        }
        self.report()
    }

    fn finish(&mut self, reason: FinishReason) -> GenerationState {
        self.state = GenerationState::Finished(reason);
        let tick = self.world.clock().tick();
        info!(
            tick,
            score = self.world.score(),
            survivors = self.world.population(),
            ?reason,
            "generation finished"
        );
        self.events.push(SimEvent::new(
            tick,
            SimEventKind::GenerationFinished { reason },
            format!("generation finished after {tick} ticks ({reason:?})"),
        ));
        self.state
    }

    /// Summary of the generation so far.
    pub fn report(&self) -> GenerationReport {
        GenerationReport {
            fitness: self.fitness.clone(),
            removed_at: self.removed_at.clone(),
            score: self.world.score(),
            ticks: self.world.clock().tick(),
            survivors: self.world.population(),
            reason: match self.state {
                GenerationState::Finished(reason) => reason,
                GenerationState::Running => FinishReason::Aborted,
            },
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// True once the generation reached its terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, GenerationState::Finished(_))
    }

    /// The world being simulated.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events recorded so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Fitness of each policy so far.
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }
}

/// Evaluate one generation headlessly and return each policy's fitness.
pub fn run_generation<P: PolicyEngine>(
    policies: &mut [P],
    config: &SimConfig,
) -> SimResult<GenerationReport> {
    let mut evaluator = Evaluator::new(policies, config.clone())?;
    Ok(evaluator.run(&mut NullRenderer))
}
