//! Stock drawable shapes

use crate::bounds::Aabb;
use crate::drawable::{Drawable, SharedDrawable};
use crate::render::{RenderCommand, RenderTarget};
use crate::types::Color;
use glam::{Mat4, Vec2};
use parking_lot::RwLock;
use std::sync::Arc;

/// Axis-aligned rectangle centered on its node
#[derive(Debug, Clone)]
pub struct Quad {
    pub half_extents: Vec2,
    pub color: Color,
    pub visible: bool,
    dispose_count: u32,
}

impl Quad {
    pub fn new(half_extents: Vec2) -> Self {
        Self {
            half_extents,
            color: Color::WHITE,
            visible: true,
            dispose_count: 0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Wrap into a handle that can be attached to nodes
    pub fn shared(self) -> SharedDrawable {
        Arc::new(RwLock::new(self))
    }

    pub fn is_disposed(&self) -> bool {
        self.dispose_count > 0
    }

    pub fn dispose_count(&self) -> u32 {
        self.dispose_count
    }
}

impl Drawable for Quad {
    fn local_aabb(&self) -> Aabb {
        Aabb::new(Vec2::ZERO, self.half_extents)
    }

    fn draw(&self, target: &mut dyn RenderTarget, transform: &Mat4) {
        if !self.visible || self.is_disposed() {
            return;
        }
        target.submit(RenderCommand {
            transform: *transform,
            half_extents: self.half_extents,
            color: self.color,
        });
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn dispose(&mut self) {
        self.dispose_count += 1;
    }
}
