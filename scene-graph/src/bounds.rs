//! Axis-aligned bounding boxes and subtree bounds aggregation

use crate::error::Result;
use crate::graph::SceneGraph;
use crate::types::NodeId;
use glam::Vec2;

/// Axis-aligned bounding box stored as center and half-extents
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Zero-area box at a point
    pub fn point(center: Vec2) -> Self {
        Self::new(center, Vec2::ZERO)
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        let lo = min.min(max);
        let hi = min.max(max);
        Self {
            center: (lo + hi) * 0.5,
            half_extents: (hi - lo) * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Smallest box spanning both boxes
    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        let (min, max) = (self.min(), self.max());
        let (other_min, other_max) = (other.min(), other.max());
        min.cmple(other_min).all() && max.cmpge(other_max).all()
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.cmpge(self.min()).all() && point.cmple(self.max()).all()
    }

    /// Place a local-space box into a parent frame
    ///
    /// Scales, then rotates (re-expanding the half-extents so the result
    /// stays axis-aligned), then translates by `position`.
    pub fn transformed(&self, position: Vec2, rotation: f32, scale: Vec2) -> Aabb {
        let (sin, cos) = rotation.sin_cos();
        let center = self.center * scale;
        let half = (self.half_extents * scale).abs();

        let rotated_center = Vec2::new(
            center.x * cos - center.y * sin,
            center.x * sin + center.y * cos,
        );
        let (abs_cos, abs_sin) = (cos.abs(), sin.abs());
        let rotated_half = Vec2::new(
            abs_cos * half.x + abs_sin * half.y,
            abs_sin * half.x + abs_cos * half.y,
        );

        Aabb {
            center: position + rotated_center,
            half_extents: rotated_half,
        }
    }
}

impl SceneGraph {
    /// World-space bounds of every drawable attached to `id` or any node below it
    ///
    /// Starts from a zero-area box at the node's derived position, so a node
    /// without drawables still contributes its own location.
    pub fn aabb(&self, id: NodeId) -> Result<Aabb> {
        let mut bounds = Aabb::point(self.derived_position(id)?);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_ref(current)?;
            if !node.drawables().is_empty() {
                let world = self.derived_transform(current)?;
                for drawable in node.drawables() {
                    let local = drawable.read().local_aabb();
                    let placed = local.transformed(world.position, world.rotation, world.scale);
                    bounds = bounds.merge(&placed);
                }
            }
            stack.extend(node.children().iter().rev().copied());
        }

        Ok(bounds)
    }
}
