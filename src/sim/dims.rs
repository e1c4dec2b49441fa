//! Viewport-driven bean sizing
//!
//! Pure functions: the viewport width picks a size range, a chosen bean
//! width fixes its height, artwork scale and collision radius.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Visible drawing area, floor-clamped to 320x240
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        // f32::max ignores NaN, so garbage collapses to the floor
        Self {
            width: width.max(MIN_VIEWPORT_WIDTH),
            height: height.max(MIN_VIEWPORT_HEIGHT),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Bean width bounds for the current viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

/// Size of one bean derived from its width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    /// Artwork scale relative to the reference width
    pub scale: f32,
    /// Collision radius
    pub radius: f32,
}

/// Width range for beans spawned into `viewport`
pub fn size_range(viewport: Viewport, base_mult: f32) -> SizeRange {
    let base = (viewport.width * base_mult).round();
    let base = if base.is_finite() {
        base.clamp(BASE_MIN, BASE_MAX)
    } else {
        BASE_MIN
    };
    SizeRange {
        min: (base * SIZE_SPREAD_MIN).round().max(MIN_BEAN_WIDTH),
        max: (base * SIZE_SPREAD_MAX).round(),
    }
}

/// Height, scale and radius for a bean `width` units wide
pub fn derive_dimensions(width: f32) -> Dimensions {
    let width = if width.is_finite() { width.max(1.0) } else { 1.0 };
    let height = (width * (ART_REFERENCE_HEIGHT / ART_REFERENCE_WIDTH)).round();
    Dimensions {
        width,
        height,
        scale: width / ART_REFERENCE_WIDTH,
        radius: (width.max(height) * 0.5).round().max(MIN_BEAN_RADIUS),
    }
}
