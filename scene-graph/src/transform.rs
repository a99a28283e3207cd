//! Transform composition, space conversion and node mutation
//!
//! This module owns the one composition rule of the hierarchy. Both the
//! eager update pass and the on-demand queries on dirty nodes go through
//! [`Transform2D::compose`], so a node resolves to the same world transform
//! whichever path computes it.

use crate::error::Result;
use crate::graph::SceneGraph;
use crate::types::{NodeId, TransformSpace};
use glam::{Mat4, Vec2};

/// Position, rotation (radians) and scale of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    pub fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Resolve a relative transform against its parent's derived transform
    ///
    /// The relative position is projected onto the parent's rotated axes,
    /// each scaled by the parent's scale. Rotation adds, scale multiplies
    /// component-wise.
    pub fn compose(&self, relative: &Transform2D) -> Transform2D {
        let axes = Vec2::from_angle(self.rotation);
        Transform2D {
            position: self.position + axes.rotate(relative.position * self.scale),
            rotation: self.rotation + relative.rotation,
            scale: self.scale * relative.scale,
        }
    }

    /// Express a world-space vector in the frame this transform defines
    ///
    /// Returns `None` when a scale component is zero and the frame cannot
    /// be inverted.
    pub fn world_to_parent(&self, world: Vec2) -> Option<Vec2> {
        if self.scale.x == 0.0 || self.scale.y == 0.0 {
            return None;
        }
        Some(Vec2::from_angle(-self.rotation).rotate(world) / self.scale)
    }

    /// Build the draw matrix: scale, then rotate, then translate
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position.extend(0.0))
            * Mat4::from_rotation_z(self.rotation)
            * Mat4::from_scale(self.scale.extend(1.0))
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SceneGraph {
    /// Move a node by `delta` expressed in `space`
    pub fn translate(&mut self, id: NodeId, delta: Vec2, space: TransformSpace) -> Result<()> {
        let relative = self.node_ref(id)?.relative;
        if delta == Vec2::ZERO {
            return Ok(());
        }

        let offset = match space {
            TransformSpace::Local => Vec2::from_angle(relative.rotation).rotate(delta),
            TransformSpace::Parent => delta,
            TransformSpace::World => match self.world_to_parent_vector(id, delta)? {
                Some(offset) => offset,
                None => {
                    log::warn!("translate({id:?}): parent scale has a zero axis, ignoring");
                    return Ok(());
                }
            },
        };

        self.node_mut(id)?.relative.position += offset;
        self.queue_for_update(id)
    }

    /// Rotate a node by `angle` radians
    ///
    /// In parent space the node also orbits its parent's origin, since its
    /// position is defined in that frame. World-space rotation is not
    /// supported and leaves the node untouched.
    pub fn rotate(&mut self, id: NodeId, angle: f32, space: TransformSpace) -> Result<()> {
        let node = self.node_mut(id)?;
        if angle == 0.0 {
            return Ok(());
        }

        match space {
            TransformSpace::Local => {
                node.relative.rotation += angle;
            }
            TransformSpace::Parent => {
                node.relative.rotation += angle;
                node.relative.position = Vec2::from_angle(angle).rotate(node.relative.position);
            }
            TransformSpace::World => {
                log::warn!("rotate({id:?}): world-space rotation is unsupported, ignoring");
                return Ok(());
            }
        }

        self.queue_for_update(id)
    }

    /// Multiply the relative scale component-wise
    pub fn scale_axes(&mut self, id: NodeId, factor: Vec2) -> Result<()> {
        let node = self.node_mut(id)?;
        if factor == Vec2::ONE {
            return Ok(());
        }
        node.relative.scale *= factor;
        self.queue_for_update(id)
    }

    /// Replace the whole relative transform
    pub fn set_all(&mut self, id: NodeId, position: Vec2, rotation: f32, scale: Vec2) -> Result<()> {
        self.set_relative(id, Transform2D::new(position, rotation, scale))
    }

    pub fn set_relative(&mut self, id: NodeId, transform: Transform2D) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.relative == transform {
            return Ok(());
        }
        node.relative = transform;
        self.queue_for_update(id)
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec2) -> Result<()> {
        let relative = self.node_ref(id)?.relative;
        self.set_relative(
            id,
            Transform2D {
                position,
                ..relative
            },
        )
    }

    pub fn set_rotation(&mut self, id: NodeId, rotation: f32) -> Result<()> {
        let relative = self.node_ref(id)?.relative;
        self.set_relative(
            id,
            Transform2D {
                rotation,
                ..relative
            },
        )
    }

    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) -> Result<()> {
        let relative = self.node_ref(id)?.relative;
        self.set_relative(id, Transform2D { scale, ..relative })
    }

    /// Place a node at a world position, whatever its depth
    pub fn set_derived_position(&mut self, id: NodeId, position: Vec2) -> Result<()> {
        let relative = match self.parent_world(id)? {
            None => position,
            Some(parent) => match parent.world_to_parent(position - parent.position) {
                Some(local) => local,
                None => {
                    log::warn!("set_derived_position({id:?}): parent scale has a zero axis, ignoring");
                    return Ok(());
                }
            },
        };
        self.set_position(id, relative)
    }

    pub fn set_derived_rotation(&mut self, id: NodeId, rotation: f32) -> Result<()> {
        let parent_rotation = self.parent_world(id)?.map_or(0.0, |parent| parent.rotation);
        self.set_rotation(id, rotation - parent_rotation)
    }

    pub fn set_derived_scale(&mut self, id: NodeId, scale: Vec2) -> Result<()> {
        let relative = match self.parent_world(id)? {
            None => scale,
            Some(parent) if parent.scale.x == 0.0 || parent.scale.y == 0.0 => {
                log::warn!("set_derived_scale({id:?}): parent scale has a zero axis, ignoring");
                return Ok(());
            }
            Some(parent) => scale / parent.scale,
        };
        self.set_scale(id, relative)
    }

    pub fn relative_transform(&self, id: NodeId) -> Result<Transform2D> {
        Ok(self.node_ref(id)?.relative)
    }

    /// World transform of a node
    ///
    /// Clean nodes answer from the cache. Dirty nodes are resolved on demand
    /// by composing down from the nearest clean ancestor (or the top of the
    /// chain); the cache itself is only refreshed by [`SceneGraph::update`].
    pub fn derived_transform(&self, id: NodeId) -> Result<Transform2D> {
        let node = self.node_ref(id)?;
        if !node.dirty {
            return Ok(node.derived);
        }

        let mut chain = vec![node.relative];
        let mut resolved = None;
        let mut parent = node.parent;
        while let Some(current) = parent {
            let ancestor = self.node_ref(current)?;
            if !ancestor.dirty {
                resolved = Some(ancestor.derived);
                break;
            }
            chain.push(ancestor.relative);
            parent = ancestor.parent;
        }

        let mut world = resolved;
        for relative in chain.iter().rev() {
            world = Some(match world {
                Some(parent) => parent.compose(relative),
                None => *relative,
            });
        }
        Ok(world.unwrap_or(Transform2D::IDENTITY))
    }

    pub fn derived_position(&self, id: NodeId) -> Result<Vec2> {
        Ok(self.derived_transform(id)?.position)
    }

    pub fn derived_rotation(&self, id: NodeId) -> Result<f32> {
        Ok(self.derived_transform(id)?.rotation)
    }

    pub fn derived_scale(&self, id: NodeId) -> Result<Vec2> {
        Ok(self.derived_transform(id)?.scale)
    }

    pub fn derived_matrix(&self, id: NodeId) -> Result<Mat4> {
        let node = self.node_ref(id)?;
        if !node.dirty {
            return Ok(node.matrix);
        }
        Ok(self.derived_transform(id)?.matrix())
    }

    fn parent_world(&self, id: NodeId) -> Result<Option<Transform2D>> {
        match self.node_ref(id)?.parent {
            Some(parent) => Ok(Some(self.derived_transform(parent)?)),
            None => Ok(None),
        }
    }

    fn world_to_parent_vector(&self, id: NodeId, world: Vec2) -> Result<Option<Vec2>> {
        Ok(match self.parent_world(id)? {
            Some(parent) => parent.world_to_parent(world),
            None => Some(world),
        })
    }
}
