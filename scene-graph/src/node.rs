//! Scene node storage
//!
//! A node holds its transform relative to its parent, the cached world
//! transform resolved from it, and the bookkeeping flags the graph uses to
//! schedule recomputation. Nodes live in the graph's arena; parent and
//! children are stored as [`NodeId`]s.

use crate::drawable::SharedDrawable;
use crate::transform::Transform2D;
use crate::types::NodeId;
use glam::Mat4;

/// A single element of the transform hierarchy
pub struct SceneNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) drawables: Vec<SharedDrawable>,

    /// Transform relative to the parent (or the world, for a top-level node)
    pub(crate) relative: Transform2D,

    // Cached world transform, valid only while `dirty` is false
    pub(crate) derived: Transform2D,
    pub(crate) matrix: Mat4,
    pub(crate) dirty: bool,

    /// Present in the graph's pending-update queue
    pub(crate) queued: bool,

    name: Option<String>,
}

impl SceneNode {
    pub(crate) fn new(relative: Transform2D) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            drawables: Vec::new(),
            relative,
            derived: relative,
            matrix: relative.matrix(),
            dirty: true,
            queued: false,
            name: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order (the update and draw order)
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn drawables(&self) -> &[SharedDrawable] {
        &self.drawables
    }

    pub fn relative(&self) -> Transform2D {
        self.relative
    }

    /// Cached world transform; stale while [`is_dirty`](Self::is_dirty) is true
    pub fn cached_derived(&self) -> Transform2D {
        self.derived
    }

    pub fn cached_matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_queued(&self) -> bool {
        self.queued
    }

    /// A node without a parent (the graph root, or a detached node)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("drawables", &self.drawables.len())
            .field("relative", &self.relative)
            .field("dirty", &self.dirty)
            .finish()
    }
}
