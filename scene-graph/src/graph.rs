//! Scene graph: node arena, hierarchy management and per-frame passes
//!
//! The graph owns every node (in a slotmap arena), the root, and the queue
//! of nodes waiting for their derived transforms to be recomputed. Each
//! graph has its own queue, so mutating or updating one graph never touches
//! another graph's pending work.
//!
//! Per frame: mutate transforms, call [`SceneGraph::update`] once, then
//! [`SceneGraph::draw`]. Drawing before the queue is drained renders stale
//! transforms; it never fails.

use crate::config::GraphConfig;
use crate::drawable::SharedDrawable;
use crate::error::{Result, SceneError};
use crate::node::SceneNode;
use crate::render::RenderTarget;
use crate::transform::Transform2D;
use crate::types::NodeId;
use slotmap::SlotMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

/// Source of process-unique graph identifiers
static NEXT_GRAPH_ID: AtomicU32 = AtomicU32::new(1);

/// A transform hierarchy with its own pending-update queue
pub struct SceneGraph {
    id: u32,
    nodes: SlotMap<NodeId, SceneNode>,
    root: NodeId,

    /// Nodes whose derived transforms must be recomputed (FIFO, deduplicated)
    queue: VecDeque<NodeId>,

    /// Statistics
    update_count: u64,
    draw_count: AtomicU64,
}

impl SceneGraph {
    /// Create a graph with a single root node
    pub fn new(config: GraphConfig) -> Self {
        let mut nodes = SlotMap::with_capacity_and_key(config.node_capacity);
        let root = nodes.insert(SceneNode::new(Transform2D::new(
            config.root_position,
            config.root_rotation,
            config.root_scale,
        )));

        let mut graph = Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            nodes,
            root,
            queue: VecDeque::with_capacity(config.queue_capacity),
            update_count: 0,
            draw_count: AtomicU64::new(0),
        };
        graph.enqueue(root);
        graph
    }

    /// Integer identifier, unique within the process
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, including the root and detached nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node_ref(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node_ref(id)?.children)
    }

    pub fn is_dirty(&self, id: NodeId) -> Result<bool> {
        Ok(self.node_ref(id)?.dirty)
    }

    /// Number of entries waiting in the update queue
    pub fn pending_updates(&self) -> usize {
        self.queue.len()
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count.load(Ordering::Relaxed)
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes.get_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    // ------------------------------------------------------------------
    // Node creation
    // ------------------------------------------------------------------

    /// Create a detached node with an identity transform
    pub fn create_node(&mut self) -> NodeId {
        self.create_node_with(Transform2D::IDENTITY)
    }

    /// Create a detached node; it starts dirty and queued
    pub fn create_node_with(&mut self, relative: Transform2D) -> NodeId {
        let id = self.nodes.insert(SceneNode::new(relative));
        self.enqueue(id);
        id
    }

    /// Create a node and attach it under `parent`
    pub fn create_child(&mut self, parent: NodeId, relative: Transform2D) -> Result<NodeId> {
        self.node_ref(parent)?;
        let id = self.create_node_with(relative);
        self.add_child(parent, id)?;
        Ok(id)
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.set_name(Some(name.into()));
        Ok(())
    }

    /// First node (depth-first from the root) carrying `name`
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root).ok()?)
            .find(|&id| self.nodes.get(id).and_then(SceneNode::name) == Some(name))
    }

    // ------------------------------------------------------------------
    // Hierarchy management
    // ------------------------------------------------------------------

    /// Attach `child` under `parent` (appended after existing children)
    ///
    /// A child that already belongs to another parent is moved; this is
    /// allowed but logged, since it silently changes the child's world
    /// transform.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node_ref(parent)?;
        let current_parent = self.node_ref(child)?.parent;

        if parent == child {
            return Err(SceneError::SelfParent(child));
        }
        if child == self.root {
            return Err(SceneError::RootNode(child));
        }
        if current_parent == Some(parent) {
            return Err(SceneError::AlreadyChild { parent, child });
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        if let Some(previous) = current_parent {
            log::warn!("add_child: {child:?} is re-parented from {previous:?} to {parent:?}");
            self.unlink(previous, child);
        }

        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        self.queue_for_update(child)
    }

    /// Detach `child` from `parent`; the child and its subtree stay alive
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_child_of(parent, child)?;
        self.unlink(parent, child);
        self.queue_for_update(child)
    }

    /// Detach every child of `parent`, returning them in their former order
    pub fn remove_all_children(&mut self, parent: NodeId) -> Result<Vec<NodeId>> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        for &child in &children {
            self.node_mut(child)?.parent = None;
            self.queue_for_update(child)?;
        }
        Ok(children)
    }

    /// Detach `child`, dispose every drawable in its subtree and free the subtree
    ///
    /// Returns the number of nodes freed. Their ids become invalid.
    pub fn remove_and_dispose_child(&mut self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.check_child_of(parent, child)?;
        self.unlink(parent, child);
        Ok(self.destroy_subtree(child))
    }

    /// Dispose and free every subtree below `parent`
    pub fn remove_and_dispose_all_children(&mut self, parent: NodeId) -> Result<usize> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        let mut freed = 0;
        for child in children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = None;
            }
            freed += self.destroy_subtree(child);
        }
        Ok(freed)
    }

    /// Whether `child` is a direct child of `parent` (or any descendant when `deep`)
    pub fn contains_child(&self, parent: NodeId, child: NodeId, deep: bool) -> Result<bool> {
        let parent_node = self.node_ref(parent)?;
        if !deep {
            return Ok(parent_node.children.contains(&child));
        }
        Ok(child != parent && self.is_ancestor(parent, child))
    }

    /// Attach a node directly under the root
    pub fn add_node(&mut self, child: NodeId) -> Result<()> {
        self.add_child(self.root, child)
    }

    pub fn remove_node(&mut self, child: NodeId) -> Result<()> {
        self.remove_child(self.root, child)
    }

    pub fn contains_node(&self, id: NodeId, deep: bool) -> Result<bool> {
        self.contains_child(self.root, id, deep)
    }

    /// Number of nodes below `id` (not counting `id` itself)
    pub fn descendant_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.descendants(id)?.count())
    }

    /// Depth-first, pre-order walk below `id`, children in insertion order
    pub fn descendants(&self, id: NodeId) -> Result<Descendants<'_>> {
        let node = self.node_ref(id)?;
        Ok(Descendants {
            graph: self,
            stack: node.children.iter().rev().copied().collect(),
        })
    }

    /// True when `ancestor` is `node` or lies on the parent chain of `node`
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    fn check_child_of(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node_ref(parent)?;
        if child == self.root {
            return Err(SceneError::RootNode(child));
        }
        if self.node_ref(child)?.parent != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }
        Ok(())
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
    }

    /// Free `id` and everything below it, disposing each drawable once
    fn destroy_subtree(&mut self, id: NodeId) -> usize {
        let mut disposed: Vec<SharedDrawable> = Vec::new();
        let mut freed = 0;
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            freed += 1;
            stack.extend(node.children.iter().copied());

            for drawable in node.drawables {
                if !disposed.iter().any(|d| same_drawable(d, &drawable)) {
                    drawable.write().dispose();
                    disposed.push(drawable);
                }
            }
        }

        let nodes = &self.nodes;
        self.queue.retain(|&queued| nodes.contains_key(queued));

        log::debug!(
            "graph {}: freed {} nodes, disposed {} drawables",
            self.id,
            freed,
            disposed.len()
        );
        freed
    }

    // ------------------------------------------------------------------
    // Invalidation and the update pass
    // ------------------------------------------------------------------

    /// Schedule `id` for recomputation and invalidate its subtree
    ///
    /// A node is not enqueued twice, and a dirty node under a dirty parent is
    /// not enqueued at all: the ancestor's update already reaches it.
    pub fn queue_for_update(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_ref(id)?;
        let covered = node.queued
            || (node.dirty && node.parent.is_some_and(|p| self.nodes.get(p).is_some_and(|n| n.dirty)));
        if !covered {
            self.enqueue(id);
        }
        self.flag_subtree(id)
    }

    /// Flag `id` and every descendant as dirty; no recomputation happens here
    ///
    /// The node is also enqueued unless its parent is dirty, so the next
    /// `update` still reaches the flagged subtree.
    pub fn mark_as_dirty(&mut self, id: NodeId) -> Result<()> {
        self.flag_subtree(id)?;
        let parent_dirty = self
            .node_ref(id)?
            .parent
            .is_some_and(|p| self.nodes.get(p).is_some_and(|n| n.dirty));
        if !parent_dirty {
            self.enqueue(id);
        }
        Ok(())
    }

    fn flag_subtree(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.dirty = true;

        let mut stack: Vec<NodeId> = self.node_ref(id)?.children.clone();
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current) else {
                continue;
            };
            // Dirtiness is monotonic downward, a dirty node's subtree is already dirty
            if node.dirty {
                continue;
            }
            node.dirty = true;
            stack.extend(node.children.iter().copied());
        }
        Ok(())
    }

    fn enqueue(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            if !node.queued {
                node.queued = true;
                self.queue.push_back(id);
            }
        }
    }

    /// Drain the pending queue, recomputing derived transforms
    ///
    /// Call once per frame after all mutation for that frame. Returns the
    /// number of nodes whose derived transform was recomputed.
    pub fn update(&mut self) -> usize {
        let mut recomputed = 0;

        while let Some(id) = self.queue.pop_front() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.queued = false;
            if !node.dirty {
                // Already refreshed by an ancestor's cascade
                continue;
            }
            let parent = node.parent;
            if parent.is_some_and(|p| self.nodes.get(p).is_some_and(|n| n.dirty)) {
                // A dirty ancestor is still queued and will cascade here
                continue;
            }
            recomputed += self.recompute_subtree(id);
        }

        self.update_count += 1;
        log::trace!("graph {}: update recomputed {} nodes", self.id, recomputed);
        recomputed
    }

    /// Recompute `id` and its whole subtree immediately
    ///
    /// If an ancestor is also dirty, recomputation starts from the topmost
    /// dirty ancestor so no clean node is left under a dirty one.
    pub fn update_node(&mut self, id: NodeId) -> Result<usize> {
        let mut start = id;
        while let Some(parent) = self.node_ref(start)?.parent {
            if !self.node_ref(parent)?.dirty {
                break;
            }
            start = parent;
        }
        Ok(self.recompute_subtree(start))
    }

    /// Recompute `id` from its parent's cached derived transform, then
    /// unconditionally every node below it
    fn recompute_subtree(&mut self, id: NodeId) -> usize {
        let parent_world = self
            .nodes
            .get(id)
            .and_then(|node| node.parent)
            .and_then(|parent| self.nodes.get(parent))
            .map(|parent| parent.derived);

        let mut count = 0;
        let mut stack = vec![(id, parent_world)];
        while let Some((current, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current) else {
                continue;
            };

            let derived = match parent_world {
                Some(parent) => parent.compose(&node.relative),
                None => node.relative,
            };
            node.derived = derived;
            node.matrix = derived.matrix();
            node.dirty = false;
            count += 1;

            stack.extend(node.children.iter().rev().map(|&child| (child, Some(derived))));
        }
        count
    }

    // ------------------------------------------------------------------
    // Draw pass
    // ------------------------------------------------------------------

    /// Walk the tree from the root and hand every drawable its node's matrix
    ///
    /// Returns the number of drawables invoked.
    pub fn draw(&self, target: &mut dyn RenderTarget) -> usize {
        self.draw_count.fetch_add(1, Ordering::Relaxed);

        if !self.queue.is_empty() {
            log::debug!(
                "graph {}: drawing with {} pending updates, transforms may be stale",
                self.id,
                self.queue.len()
            );
        }

        let mut invoked = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            for drawable in &node.drawables {
                drawable.read().draw(target, &node.matrix);
                invoked += 1;
            }
            stack.extend(node.children.iter().rev().copied());
        }
        invoked
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("id", &self.id)
            .field("nodes", &self.nodes.len())
            .field("pending_updates", &self.queue.len())
            .field("update_count", &self.update_count)
            .field("draw_count", &self.draw_count())
            .finish()
    }
}

/// Depth-first, pre-order iterator over a subtree (see [`SceneGraph::descendants`])
pub struct Descendants<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.graph.nodes.get(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}

/// Identity comparison of shared drawables (same allocation)
pub(crate) fn same_drawable(a: &SharedDrawable, b: &SharedDrawable) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
