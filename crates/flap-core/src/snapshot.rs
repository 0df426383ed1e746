//! Read-only world views handed to renderers.

use serde::Serialize;

use crate::agent::AgentId;

/// Everything a renderer needs to draw one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    /// Tick this snapshot was taken at.
    pub tick: u64,
    /// Obstacles passed so far this generation.
    pub score: u32,
    /// Live agents, in population order.
    pub agents: Vec<AgentView>,
    /// Live obstacles, in ascending x.
    pub obstacles: Vec<ObstacleView>,
    /// Ground segment offsets.
    pub ground: GroundView,
}

/// Drawable state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentView {
    /// The agent's policy binding.
    pub id: AgentId,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Nose angle in degrees.
    pub tilt: f64,
    /// Wing animation frame (0..=2).
    pub frame: u8,
}

/// Drawable state of one obstacle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    /// Left edge.
    pub x: f64,
    /// Where the top piece's sprite begins.
    pub top_y: f64,
    /// Where the bottom piece's sprite begins.
    pub bottom_y: f64,
}

/// Ground segment offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundView {
    /// Left edge of the first segment.
    pub x1: f64,
    /// Left edge of the second segment.
    pub x2: f64,
}

/// Consumer of per-tick snapshots. There is no way back into the simulation.
pub trait Renderer {
    /// Draw (or record, or drop) one snapshot.
    fn present(&mut self, snapshot: &WorldSnapshot);
}

/// Renderer that discards every snapshot; used for headless evaluation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _snapshot: &WorldSnapshot) {}
}

/// Renderer that keeps every snapshot it is given.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<WorldSnapshot>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots in presentation order.
    pub fn frames(&self) -> &[WorldSnapshot] {
        &self.frames
    }

    /// Take ownership of the recorded snapshots.
    pub fn into_frames(self) -> Vec<WorldSnapshot> {
        self.frames
    }
}

impl Renderer for RecordingRenderer {
    fn present(&mut self, snapshot: &WorldSnapshot) {
        self.frames.push(snapshot.clone());
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn present(&mut self, snapshot: &WorldSnapshot) {
        (**self).present(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(tick: u64) -> WorldSnapshot {
        WorldSnapshot {
            tick,
            score: 0,
            agents: vec![AgentView {
                id: AgentId(0),
                x: 230.0,
                y: 350.0,
                tilt: 0.0,
                frame: 0,
            }],
            obstacles: vec![ObstacleView {
                x: 700.0,
                top_y: -340.0,
                bottom_y: 500.0,
            }],
            ground: GroundView { x1: 0.0, x2: 672.0 },
        }
    }

    #[test]
    fn recorder_keeps_order() {
        let mut recorder = RecordingRenderer::new();
        recorder.present(&snapshot(1));
        recorder.present(&snapshot(2));
        let ticks: Vec<u64> = recorder.frames().iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![1, 2]);
    }

    #[test]
    fn snapshot_serializes_renderer_fields() {
        let json = serde_json::to_value(snapshot(3)).unwrap();
        assert_eq!(json["tick"], 3);
        assert_eq!(json["agents"][0]["id"], 0);
        assert_eq!(json["obstacles"][0]["bottom_y"], 500.0);
        assert_eq!(json["ground"]["x2"], 672.0);
    }
}
