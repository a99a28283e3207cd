//! Debug overlay registration and line generation

use glam::Vec2;
use scene_graph::{Aabb, Color, NodeId, SceneGraph};

/// A colored line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec2,
    pub end: Vec2,
    pub color: Color,
}

/// What the overlay draws
#[derive(Debug, Clone, Copy)]
pub struct DebugOptions {
    /// Draw each node's local X/Y axes at its derived transform
    pub draw_axes: bool,
    /// Draw the subtree bounds of every node carrying drawables
    pub draw_aabbs: bool,
    /// Axis length before the node's derived scale is applied
    pub axis_length: f32,
    pub x_axis_color: Color,
    pub y_axis_color: Color,
    pub aabb_color: Color,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            draw_axes: true,
            draw_aabbs: true,
            axis_length: 10.0,
            x_axis_color: Color::new(1.0, 0.0, 0.0, 1.0),
            y_axis_color: Color::new(0.0, 1.0, 0.0, 1.0),
            aabb_color: Color::new(1.0, 1.0, 0.0, 1.0),
        }
    }
}

/// Debug drawing facility attached to one or more graphs
#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    graphs: Vec<u32>,
    pub options: DebugOptions,
}

impl DebugOverlay {
    pub fn new(options: DebugOptions) -> Self {
        Self {
            graphs: Vec::new(),
            options,
        }
    }

    /// Start drawing the graph with this id; registering twice is harmless
    pub fn register(&mut self, graph_id: u32) {
        if !self.graphs.contains(&graph_id) {
            self.graphs.push(graph_id);
        }
    }

    pub fn unregister(&mut self, graph_id: u32) -> bool {
        let before = self.graphs.len();
        self.graphs.retain(|&id| id != graph_id);
        self.graphs.len() != before
    }

    pub fn is_registered(&self, graph_id: u32) -> bool {
        self.graphs.contains(&graph_id)
    }

    pub fn registered(&self) -> &[u32] {
        &self.graphs
    }

    /// Lines for every node of `graph`, or nothing if it is not registered
    ///
    /// Uses the same derived-transform queries as gameplay code, so dirty
    /// nodes are resolved on demand rather than drawn stale.
    pub fn collect(&self, graph: &SceneGraph) -> Vec<DebugLine> {
        if !self.is_registered(graph.id()) {
            return Vec::new();
        }

        let root = graph.root();
        let Ok(descendants) = graph.descendants(root) else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        for id in std::iter::once(root).chain(descendants) {
            if self.options.draw_axes {
                self.push_axes(graph, id, &mut lines);
            }
            if self.options.draw_aabbs {
                self.push_bounds(graph, id, &mut lines);
            }
        }

        log::trace!("debug overlay: {} lines for graph {}", lines.len(), graph.id());
        lines
    }

    fn push_axes(&self, graph: &SceneGraph, id: NodeId, lines: &mut Vec<DebugLine>) {
        let Ok(world) = graph.derived_transform(id) else {
            return;
        };
        let axes = Vec2::from_angle(world.rotation);
        let x_end = world.position + axes.rotate(Vec2::new(self.options.axis_length * world.scale.x, 0.0));
        let y_end = world.position + axes.rotate(Vec2::new(0.0, self.options.axis_length * world.scale.y));

        lines.push(DebugLine {
            start: world.position,
            end: x_end,
            color: self.options.x_axis_color,
        });
        lines.push(DebugLine {
            start: world.position,
            end: y_end,
            color: self.options.y_axis_color,
        });
    }

    fn push_bounds(&self, graph: &SceneGraph, id: NodeId, lines: &mut Vec<DebugLine>) {
        let has_drawables = graph
            .node(id)
            .is_some_and(|node| !node.drawables().is_empty());
        if !has_drawables {
            return;
        }
        if let Ok(bounds) = graph.aabb(id) {
            lines.extend(box_edges(&bounds, self.options.aabb_color));
        }
    }
}

/// The four edges of a box, counter-clockwise from the min corner
pub fn box_edges(bounds: &Aabb, color: Color) -> [DebugLine; 4] {
    let (min, max) = (bounds.min(), bounds.max());
    let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
    std::array::from_fn(|i| DebugLine {
        start: corners[i],
        end: corners[(i + 1) % 4],
        color,
    })
}
