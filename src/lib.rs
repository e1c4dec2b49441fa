//! Bean Drop - coffee beans that fall, settle and can be tossed around
//!
//! Core modules:
//! - `sim`: Sizing, placement, spawning, walls, pose sync and drag handling
//! - `physics`: Physics engine seam and its rapier2d backend
//! - `renderer`: Visual surface seam, SVG surface and bean artwork
//! - `platform`: Host stage abstraction
//! - `settings`: Data-driven tuning

pub mod error;
pub mod physics;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::BeanError;
pub use settings::{EngineTuning, Settings};

use rand::Rng;

/// Tuning constants
pub mod consts {
    /// Fixed physics timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport floor
    pub const MIN_VIEWPORT_WIDTH: f32 = 320.0;
    pub const MIN_VIEWPORT_HEIGHT: f32 = 240.0;

    /// Bean width is `clamp(round(w * BASE_MULT), BASE_MIN, BASE_MAX)` before spread
    pub const BASE_MULT: f32 = 0.020;
    pub const BASE_MIN: f32 = 8.0;
    pub const BASE_MAX: f32 = 48.0;
    pub const SIZE_SPREAD_MIN: f32 = 0.72;
    pub const SIZE_SPREAD_MAX: f32 = 1.08;
    pub const MIN_BEAN_WIDTH: f32 = 6.0;
    pub const MIN_BEAN_RADIUS: f32 = 4.0;

    /// Artwork geometry (template is authored at 100x125 reference size)
    pub const ART_REFERENCE_WIDTH: f32 = 100.0;
    pub const ART_REFERENCE_HEIGHT: f32 = 125.0;
    pub const ART_CENTER_X: f32 = 150.0;
    pub const ART_CENTER_Y: f32 = 150.0;

    /// Bean body parameters
    pub const BEAN_FRICTION: f32 = 0.95;
    pub const BEAN_RESTITUTION: f32 = 0.01;
    pub const BEAN_AIR_RESISTANCE: f32 = 0.02;
    pub const BEAN_SLEEP_THRESHOLD: u32 = 60;
    pub const BEAN_POLYGON_SIDES: u32 = 8;

    /// Extra clearance between a spawn candidate and its neighbours
    pub const PLACEMENT_MARGIN: f32 = 1.2;
    pub const PLACEMENT_ATTEMPTS: usize = 12;
    pub const SIDE_MARGIN_MIN: f32 = 10.0;

    /// Spawning
    pub const TARGET_BEAN_COUNT: usize = 160;
    pub const SPAWN_BURST: usize = 4;
    pub const SPAWN_INTERVAL_MS: f32 = 80.0;
    pub const SPAWN_HEIGHT_MIN: f32 = 160.0;
    pub const SPAWN_HEIGHT_FRACTION: f32 = 0.24;

    /// Walls
    pub const WALL_THICKNESS: f32 = 50.0;
    pub const EXTRA_LOWER_PERCENT: f32 = 0.01;
    pub const RESIZE_DEBOUNCE_MS: f32 = 160.0;

    /// Pointer drag
    pub const DRAG_AIR_RESISTANCE: f32 = 0.001;
    pub const TOSS_SPEED_X: f32 = 0.5;
    pub const TOSS_SPEED_Y: f32 = 0.2;

    /// Engine-wide solver tuning
    pub const POSITION_ITERATIONS: u32 = 28;
    pub const VELOCITY_ITERATIONS: u32 = 25;
    pub const CONSTRAINT_ITERATIONS: u32 = 6;
    pub const GRAVITY: f32 = 1.05;
}

/// Uniform draw in `[min, max)`, tolerant of empty or inverted ranges
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + (max - min) * rng.random::<f32>()
}

/// Round half away from zero to three decimals
#[inline]
pub fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng, -0.18, 0.18);
            assert!((-0.18..0.18).contains(&v));
        }
    }

    #[test]
    fn test_uniform_degenerate_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(uniform(&mut rng, 5.0, 5.0), 5.0);
    }

    #[test]
    fn test_round3() {
        assert!((round3(1.23456) - 1.235).abs() < 1e-6);
        assert!((round3(0.9204) - 0.920).abs() < 1e-6);
    }
}
