//! Graph construction parameters

use glam::Vec2;

/// Parameters for [`SceneGraph::new`](crate::SceneGraph::new)
#[derive(Debug, Clone, Copy)]
pub struct GraphConfig {
    /// Initial root position (world units)
    pub root_position: Vec2,
    /// Initial root rotation in radians
    pub root_rotation: f32,
    /// Initial root scale
    pub root_scale: Vec2,
    /// Pre-allocated slots in the pending-update queue
    pub queue_capacity: usize,
    /// Pre-allocated slots in the node arena
    pub node_capacity: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            root_position: Vec2::ZERO,
            root_rotation: 0.0,
            root_scale: Vec2::ONE,
            queue_capacity: 64,
            node_capacity: 256,
        }
    }
}
