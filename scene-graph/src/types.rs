//! Core type definitions for the scene graph
//!
//! Node identifiers, coordinate spaces and the color type shared by
//! drawables and render commands.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node stored in a [`SceneGraph`](crate::SceneGraph).
    ///
    /// Only valid for the graph that created it. Ids of destroyed nodes are
    /// never reused for a different node (generational keys).
    pub struct NodeId;
}

/// Coordinate space in which a mutation delta is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformSpace {
    /// Along the node's own orientation axes
    Local,
    /// In the parent's frame, applied directly to the relative transform
    #[default]
    Parent,
    /// In world units, converted through the parent's derived transform
    World,
}

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Modulate this color by another (component-wise multiply)
    pub fn blend(self, other: Color) -> Self {
        Self {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
            a: self.a * other.a,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
