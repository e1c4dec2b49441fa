//! Container walls
//!
//! Four static rectangles around the viewport. They are never resized in
//! place; a rebuild adds a fresh set and then drops the old one.

use glam::Vec2;

use super::dims::Viewport;
use crate::physics::{BodyHandle, PhysicsWorld, StaticRect};
use crate::settings::Settings;

/// Floor, ceiling, left and right rectangles for `viewport`.
///
/// The floor sits `extra_lower_percent` of the height below the bottom
/// edge, the ceiling six thicknesses above the top to catch fast spawns.
pub fn wall_rects(viewport: Viewport, thickness: f32, extra_lower_percent: f32) -> [StaticRect; 4] {
    let (w, h) = (viewport.width, viewport.height);
    let t = thickness.max(1.0);
    let floor_top = h + (extra_lower_percent * h).round();
    let floor_y = floor_top + t / 10.0;
    let ceiling_y = -t * 6.0;

    let rect = |center: Vec2, size: Vec2| StaticRect {
        center,
        size,
        friction: 0.0,
        restitution: 0.0,
    };
    [
        rect(Vec2::new(w / 2.0, floor_y), Vec2::new(w + t * 2.0, t)),
        rect(Vec2::new(w / 2.0, ceiling_y), Vec2::new(w + t * 2.0, t)),
        rect(Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t, h)),
        rect(Vec2::new(w + t / 2.0, h / 2.0), Vec2::new(t, h)),
    ]
}

/// Owner of the current wall bodies
#[derive(Debug, Clone)]
pub struct Walls {
    handles: Vec<BodyHandle>,
    thickness: f32,
    extra_lower_percent: f32,
}

impl Walls {
    pub fn new(settings: &Settings) -> Self {
        Self {
            handles: Vec::with_capacity(4),
            thickness: settings.wall_thickness,
            extra_lower_percent: settings.extra_lower_percent,
        }
    }

    pub fn handles(&self) -> &[BodyHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Replace the wall set with one sized to `viewport`
    pub fn rebuild<W: PhysicsWorld>(&mut self, world: &mut W, viewport: Viewport) {
        let fresh: Vec<BodyHandle> = wall_rects(viewport, self.thickness, self.extra_lower_percent)
            .into_iter()
            .map(|rect| world.create_static_rect(rect))
            .collect();
        for old in std::mem::replace(&mut self.handles, fresh) {
            world.remove_body(old);
        }
        log::info!("Walls rebuilt for {}x{}", viewport.width, viewport.height);
    }
}
