//! Headless side-scroller simulation for neuroevolution.
//!
//! A population of agents, each bound to an external [`PolicyEngine`], flies
//! through a scrolling course of pipes. Every tick the [`Evaluator`] senses,
//! asks each policy whether to jump, integrates physics, tests collisions,
//! culls the losers, and keeps the course moving. The fitness each agent
//! accumulates is handed back to whatever evolutionary process supplied the
//! policies. Rendering is a one-way [`Renderer`] hook fed with snapshots.

/// Agent state and vertical physics.
pub mod agent;
/// Tick counting and tick caps.
pub mod clock;
/// Shape-precise collision and bounds tests.
pub mod collision;
/// Configuration for generation runs.
pub mod config;
/// Error types for the simulation crate.
pub mod error;
/// Generation lifecycle and the `run_generation` entry point.
pub mod evaluator;
/// Simulation event types and the event log.
pub mod event;
/// The two-segment scrolling floor.
pub mod ground;
/// Scrolling pipe obstacles.
pub mod obstacle;
/// The policy contract and simple policies.
pub mod policy;
/// Bit-mask hit shapes.
pub mod silhouette;
/// Read-only snapshots and the renderer contract.
pub mod snapshot;
/// World state and the per-tick step.
pub mod world;

/// Re-export of agent types.
pub use agent::{Agent, AgentId};
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of generation types and the entry point.
pub use evaluator::{
    Evaluator, FinishReason, GenerationReport, GenerationState, StopSignal, run_generation,
};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of obstacle types.
pub use obstacle::{Obstacle, ObstacleId};
/// Re-exports of the policy contract.
pub use policy::{Action, PolicyEngine, Sensor};
/// Re-export of hit shape types.
pub use silhouette::{Shape, Silhouette};
/// Re-exports of the renderer contract.
pub use snapshot::{NullRenderer, RecordingRenderer, Renderer, WorldSnapshot};
/// Re-export of [`world::World`].
pub use world::World;
