//! GPU-ready vertex layout for debug lines

use crate::overlay::DebugLine;
use bytemuck::{Pod, Zeroable};

/// Line-list vertex: position followed by RGBA color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Expand lines into a line-list vertex stream (two vertices per line)
pub fn line_vertices(lines: &[DebugLine]) -> Vec<DebugVertex> {
    let mut vertices = Vec::with_capacity(lines.len() * 2);
    for line in lines {
        let color = line.color.to_array();
        vertices.push(DebugVertex {
            position: line.start.to_array(),
            color,
        });
        vertices.push(DebugVertex {
            position: line.end.to_array(),
            color,
        });
    }
    vertices
}

/// View a vertex stream as raw bytes for buffer upload
pub fn vertex_bytes(vertices: &[DebugVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use scene_graph::Color;

    #[test]
    fn test_line_vertices() {
        let lines = [DebugLine {
            start: Vec2::new(1.0, 2.0),
            end: Vec2::new(3.0, 4.0),
            color: Color::BLACK,
        }];
        let vertices = line_vertices(&lines);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].position, [1.0, 2.0]);
        assert_eq!(vertices[1].position, [3.0, 4.0]);
        assert_eq!(vertices[1].color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_vertex_bytes_layout() {
        assert_eq!(std::mem::size_of::<DebugVertex>(), 24);
        let vertices = vec![DebugVertex::zeroed(); 3];
        assert_eq!(vertex_bytes(&vertices).len(), 72);
    }
}
