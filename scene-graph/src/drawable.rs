//! Drawable capability and node attachment
//!
//! Nodes never own what they draw. Callers keep their own handle to each
//! drawable; the graph only borrows it through a shared, lockable reference
//! and releases it explicitly in the remove-and-dispose paths.

use crate::bounds::Aabb;
use crate::error::{Result, SceneError};
use crate::graph::{same_drawable, SceneGraph};
use crate::render::RenderTarget;
use crate::types::{Color, NodeId};
use glam::Mat4;
use parking_lot::RwLock;
use std::sync::Arc;

/// Something a node can render with its resolved world transform
pub trait Drawable: Send + Sync {
    /// Bounding box in the node's local frame
    fn local_aabb(&self) -> Aabb;

    /// Render using the node's fully resolved world matrix
    fn draw(&self, target: &mut dyn RenderTarget, transform: &Mat4);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    fn color(&self) -> Color;

    fn set_color(&mut self, color: Color);

    fn flip_visibility(&mut self) {
        let visible = self.is_visible();
        self.set_visible(!visible);
    }

    /// Modulate the current color by `color`
    fn blend_color(&mut self, color: Color) {
        let blended = self.color().blend(color);
        self.set_color(blended);
    }

    /// Release resources; called by the remove-and-dispose operations
    fn dispose(&mut self) {}
}

/// Borrowed handle to a drawable attached to a node
pub type SharedDrawable = Arc<RwLock<dyn Drawable>>;

impl SceneGraph {
    /// Attach a drawable; attaching the same drawable twice to one node fails
    pub fn attach_drawable(&mut self, id: NodeId, drawable: SharedDrawable) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.drawables.iter().any(|d| same_drawable(d, &drawable)) {
            return Err(SceneError::DuplicateDrawable(id));
        }
        node.drawables.push(drawable);
        Ok(())
    }

    pub fn detach_drawable(&mut self, id: NodeId, drawable: &SharedDrawable) -> Result<()> {
        let node = self.node_mut(id)?;
        let index = node
            .drawables
            .iter()
            .position(|d| same_drawable(d, drawable))
            .ok_or(SceneError::DrawableNotAttached(id))?;
        node.drawables.remove(index);
        Ok(())
    }

    /// Detach every drawable from the node, handing the references back
    pub fn detach_all_drawables(&mut self, id: NodeId) -> Result<Vec<SharedDrawable>> {
        Ok(std::mem::take(&mut self.node_mut(id)?.drawables))
    }

    pub fn set_visibility(&mut self, id: NodeId, visible: bool, cascade: bool) -> Result<()> {
        self.for_each_drawable(id, cascade, |d| d.set_visible(visible))
    }

    pub fn flip_visibility(&mut self, id: NodeId, cascade: bool) -> Result<()> {
        self.for_each_drawable(id, cascade, |d| d.flip_visibility())
    }

    pub fn set_color(&mut self, id: NodeId, color: Color, cascade: bool) -> Result<()> {
        self.for_each_drawable(id, cascade, |d| d.set_color(color))
    }

    pub fn blend_color(&mut self, id: NodeId, color: Color, cascade: bool) -> Result<()> {
        self.for_each_drawable(id, cascade, |d| d.blend_color(color))
    }

    /// Apply `f` to the node's drawables, and to every descendant's when `cascade`
    ///
    /// A drawable borrowed by several nodes of the subtree is visited once.
    fn for_each_drawable<F>(&mut self, id: NodeId, cascade: bool, mut f: F) -> Result<()>
    where
        F: FnMut(&mut dyn Drawable),
    {
        let mut targets = vec![id];
        if cascade {
            targets.extend(self.descendants(id)?);
        }

        let mut seen: Vec<SharedDrawable> = Vec::new();
        for target in targets {
            for drawable in self.node_ref(target)?.drawables() {
                if seen.iter().any(|d| same_drawable(d, drawable)) {
                    continue;
                }
                f(&mut *drawable.write());
                seen.push(drawable.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Quad;
    use crate::transform::Transform2D;
    use glam::Vec2;

    fn quad() -> Arc<RwLock<Quad>> {
        Arc::new(RwLock::new(Quad::new(Vec2::ONE)))
    }

    #[test]
    fn test_attach_detach() {
        let mut graph = SceneGraph::default();
        let node = graph.create_node();
        let first: SharedDrawable = quad();
        let second: SharedDrawable = quad();

        graph.attach_drawable(node, first.clone()).unwrap();
        graph.attach_drawable(node, second.clone()).unwrap();
        assert_eq!(graph.node(node).unwrap().drawables().len(), 2);

        graph.detach_drawable(node, &first).unwrap();
        assert_eq!(
            graph.detach_drawable(node, &first),
            Err(SceneError::DrawableNotAttached(node))
        );

        let rest = graph.detach_all_drawables(node).unwrap();
        assert_eq!(rest.len(), 1);
        assert!(Arc::ptr_eq(&rest[0], &second));
        assert!(graph.node(node).unwrap().drawables().is_empty());
    }

    #[test]
    fn test_duplicate_drawable_rejected() {
        let mut graph = SceneGraph::default();
        let a = graph.create_node();
        let b = graph.create_node();
        let shared: SharedDrawable = quad();

        graph.attach_drawable(a, shared.clone()).unwrap();
        assert_eq!(
            graph.attach_drawable(a, shared.clone()),
            Err(SceneError::DuplicateDrawable(a))
        );
        // Another node may borrow the same drawable
        graph.attach_drawable(b, shared).unwrap();
        assert_eq!(graph.node(a).unwrap().drawables().len(), 1);
    }

    #[test]
    fn test_attach_does_not_touch_dirty_state() {
        let mut graph = SceneGraph::default();
        let node = graph.create_child(graph.root(), Transform2D::IDENTITY).unwrap();
        graph.update();

        graph.attach_drawable(node, quad()).unwrap();
        graph.set_visibility(node, false, true).unwrap();
        graph.blend_color(node, Color::BLACK, true).unwrap();
        assert!(!graph.is_dirty(node).unwrap());
        assert_eq!(graph.pending_updates(), 0);
    }

    #[test]
    fn test_visibility_cascade() {
        let mut graph = SceneGraph::default();
        let parent = graph.create_child(graph.root(), Transform2D::IDENTITY).unwrap();
        let child = graph.create_child(parent, Transform2D::IDENTITY).unwrap();
        let on_parent = quad();
        let on_child = quad();
        graph.attach_drawable(parent, on_parent.clone()).unwrap();
        graph.attach_drawable(child, on_child.clone()).unwrap();

        graph.set_visibility(parent, false, false).unwrap();
        assert!(!on_parent.read().is_visible());
        assert!(on_child.read().is_visible());

        graph.flip_visibility(parent, true).unwrap();
        assert!(on_parent.read().is_visible());
        assert!(!on_child.read().is_visible());
    }

    #[test]
    fn test_color_cascade() {
        let mut graph = SceneGraph::default();
        let parent = graph.create_child(graph.root(), Transform2D::IDENTITY).unwrap();
        let child = graph.create_child(parent, Transform2D::IDENTITY).unwrap();
        let on_parent = quad();
        let on_child = quad();
        graph.attach_drawable(parent, on_parent.clone()).unwrap();
        graph.attach_drawable(child, on_child.clone()).unwrap();

        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        graph.set_color(parent, red, true).unwrap();
        assert_eq!(on_child.read().color(), red);

        let half = Color::new(0.5, 0.5, 0.5, 0.5);
        graph.blend_color(parent, half, false).unwrap();
        assert_eq!(on_parent.read().color(), Color::new(0.5, 0.0, 0.0, 0.5));
        assert_eq!(on_child.read().color(), red);
    }

    #[test]
    fn test_cascade_visits_shared_drawable_once() {
        let mut graph = SceneGraph::default();
        let parent = graph.create_child(graph.root(), Transform2D::IDENTITY).unwrap();
        let child = graph.create_child(parent, Transform2D::IDENTITY).unwrap();
        let shared = quad();
        graph.attach_drawable(parent, shared.clone()).unwrap();
        graph.attach_drawable(child, shared.clone()).unwrap();

        graph.flip_visibility(parent, true).unwrap();
        assert!(!shared.read().is_visible());

        let half = Color::new(0.5, 0.5, 0.5, 0.5);
        graph.blend_color(parent, half, true).unwrap();
        assert_eq!(shared.read().color(), half);
    }
}
