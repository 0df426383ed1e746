use crate::agent::Agent;
use crate::config::SimConfig;
use crate::obstacle::Obstacle;
use crate::silhouette::Silhouette;

/// Shape-precise collision tests between agents, obstacles, and world bounds.
///
/// Silhouettes are rasterized once from the config; both checks are pure.
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    agent: Silhouette,
    top_piece: Silhouette,
    bottom_piece: Silhouette,
    ground_y: f64,
}

impl CollisionDetector {
    /// Rasterize the configured shapes. The top piece is the bottom one upside down.
    pub fn new(config: &SimConfig) -> Self {
        let bottom_piece = config.obstacle_shape.to_silhouette();
        Self {
            agent: config.agent_shape.to_silhouette(),
            top_piece: bottom_piece.flipped_vertical(),
            bottom_piece,
            ground_y: config.ground_y,
        }
    }

    /// True if the agent overlaps either piece of the obstacle.
    pub fn collides(&self, agent: &Agent, obstacle: &Obstacle) -> bool {
        let ax = agent.x.round();
        let ay = agent.y.round();
        let dx = (obstacle.x.round() - ax) as i64;
        let top_offset = (dx, (obstacle.top.round() - ay) as i64);
        let bottom_offset = (dx, (obstacle.bottom.round() - ay) as i64);

        self.agent.overlap(&self.top_piece, top_offset).is_some()
            || self.agent.overlap(&self.bottom_piece, bottom_offset).is_some()
    }

    /// True if the agent touches the ground or leaves through the top of the screen.
    pub fn out_of_bounds(&self, agent: &Agent) -> bool {
        agent.y + f64::from(self.agent.height()) >= self.ground_y || agent.y < 0.0
    }
}
