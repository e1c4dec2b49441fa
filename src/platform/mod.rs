//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Stage element lookup and size
//! - Seeding from the wall clock

use glam::Vec2;

/// The host element beans are drawn into
pub trait HostStage {
    /// Current client size, or `None` if there is no stage element
    fn client_size(&self) -> Option<Vec2>;
}

/// Fixed-size stage for the native binary and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessHost {
    size: Option<Vec2>,
}

impl HeadlessHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Some(Vec2::new(width, height)),
        }
    }

    /// A host without a stage element
    pub fn missing() -> Self {
        Self { size: None }
    }
}

impl HostStage for HeadlessHost {
    fn client_size(&self) -> Option<Vec2> {
        self.size
    }
}

/// Seed derived from the current time
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
