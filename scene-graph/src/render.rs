//! Render command collection for the draw pass
//!
//! The graph does not rasterize anything. Drawables submit render commands
//! to a [`RenderTarget`]; [`CommandList`] is the stock target that simply
//! records them in draw order for a graphics backend to consume.

use crate::graph::SceneGraph;
use crate::types::Color;
use glam::{Mat4, Vec2};

/// A draw request for a single primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand {
    /// World matrix of the owning node
    pub transform: Mat4,

    /// Half-size of the primitive in node-local units
    pub half_extents: Vec2,

    /// Tint for compositing
    pub color: Color,
}

/// Destination for render commands
pub trait RenderTarget {
    fn submit(&mut self, command: RenderCommand);
}

/// Render target that records commands in submission order
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Vec<RenderCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn into_commands(self) -> Vec<RenderCommand> {
        self.commands
    }
}

impl RenderTarget for CommandList {
    fn submit(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }
}

/// Draw a graph and return its render commands in depth-first order
pub fn render_graph(graph: &SceneGraph) -> Vec<RenderCommand> {
    let mut list = CommandList::new();
    graph.draw(&mut list);
    list.into_commands()
}

/// Draw a graph, keeping only the commands that pass `filter`
pub fn render_graph_filtered<F>(graph: &SceneGraph, mut filter: F) -> Vec<RenderCommand>
where
    F: FnMut(&RenderCommand) -> bool,
{
    render_graph(graph)
        .into_iter()
        .filter(|command| filter(command))
        .collect()
}
