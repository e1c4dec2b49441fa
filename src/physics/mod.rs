//! Physics engine seam
//!
//! The bean logic never integrates bodies itself. It talks to a
//! `PhysicsWorld` through opaque `BodyHandle`s:
//! - Body creation/removal (static rectangles, dynamic circles)
//! - Velocity and air-resistance writes
//! - Pose/bounds reads after each step
//! - Pointer grab/drag/release (the engine's interaction layer)
//!
//! Velocities are in length units per base step (1000/60 ms).

pub mod rapier;

pub use rapier::RapierWorld;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::EngineTuning;

/// Opaque body id handed out by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Parameters for a dynamic circular body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleBody {
    pub center: Vec2,
    pub radius: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Linear and angular damping per step
    pub air_resistance: f32,
    /// Mass per unit area
    pub density: f32,
    /// Quiet steps before the engine may put the body to sleep
    pub sleep_threshold: u32,
    /// Sides of the polygon approximating the circle (below 3: a true circle)
    pub sides: u32,
}

/// Parameters for an immovable rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticRect {
    pub center: Vec2,
    pub size: Vec2,
    pub friction: f32,
    pub restitution: f32,
}

/// Position and rotation (radians) of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Half of the larger side, used as a stand-in radius
    #[inline]
    pub fn half_max_extent(&self) -> f32 {
        self.size().max_element() * 0.5
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// The contract a physics engine must offer the bean logic
pub trait PhysicsWorld {
    /// Apply solver iterations and gravity (once, at startup)
    fn configure(&mut self, tuning: &EngineTuning);

    fn create_static_rect(&mut self, rect: StaticRect) -> BodyHandle;
    fn create_circle(&mut self, circle: CircleBody) -> BodyHandle;
    /// Returns false if the handle was unknown
    fn remove_body(&mut self, body: BodyHandle) -> bool;

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: f32);
    fn set_air_resistance(&mut self, body: BodyHandle, air_resistance: f32);

    fn pose(&self, body: BodyHandle) -> Option<Pose>;
    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;
    fn air_resistance(&self, body: BodyHandle) -> Option<f32>;
    fn bounds(&self, body: BodyHandle) -> Option<Bounds>;
    fn is_static(&self, body: BodyHandle) -> Option<bool>;
    /// All bodies, static ones included
    fn body_count(&self) -> usize;

    /// Advance every body by one fixed step
    fn step(&mut self, dt_ms: f32);

    /// Pointer pressed: attach a pointer constraint to the body under `point`
    fn grab(&mut self, point: Vec2) -> Option<BodyHandle>;
    /// Pointer moved while pressed
    fn drag_to(&mut self, point: Vec2);
    /// Pointer released: detach the constraint, returning the body it held
    fn release(&mut self) -> Option<BodyHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_half_max_extent() {
        let b = Bounds::from_center(Vec2::new(10.0, 10.0), Vec2::new(4.0, 7.0));
        assert_eq!(b.size(), Vec2::new(8.0, 14.0));
        assert_eq!(b.half_max_extent(), 7.0);
    }

    #[test]
    fn test_bounds_overlap_and_contains() {
        let a = Bounds::from_center(Vec2::ZERO, Vec2::splat(5.0));
        let b = Bounds::from_center(Vec2::new(9.0, 0.0), Vec2::splat(5.0));
        let c = Bounds::from_center(Vec2::new(20.0, 0.0), Vec2::splat(5.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.contains(Vec2::new(5.0, -5.0)));
        assert!(!a.contains(Vec2::new(5.1, 0.0)));
    }
}
