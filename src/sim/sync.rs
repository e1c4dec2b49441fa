//! Pose synchronization
//!
//! Runs after every physics step: each bean's visual takes the body's
//! position and rotation, scaled and mirrored about the artwork centre.

use glam::{Affine2, Vec2};

use super::scene::{BeanRecord, Scene};
use crate::physics::{PhysicsWorld, Pose};
use crate::renderer::Surface;

/// Counts from one synchronization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub updated: usize,
    /// Visuals found detached and put back
    pub reattached: usize,
    /// Records whose body no longer exists, dropped with their visuals
    pub missing: usize,
}

/// translate(body) * rotate(angle) * scale(record) * translate(-art centre)
pub fn bean_transform(pose: Pose, record: &BeanRecord) -> Affine2 {
    Affine2::from_translation(pose.position)
        * Affine2::from_angle(pose.angle)
        * Affine2::from_scale(Vec2::new(record.scale_x, record.scale_y))
        * Affine2::from_translation(-record.art_center)
}

/// Copy every body pose onto its visual, re-attaching strays.
///
/// A record whose body has vanished is removed along with its visual, so
/// every record left afterwards has an attached, up-to-date visual.
pub fn synchronize<W: PhysicsWorld, S: Surface>(scene: &mut Scene<W, S>) -> SyncReport {
    let mut report = SyncReport::default();
    let mut orphans = Vec::new();
    for (body, record) in scene.beans.iter() {
        let Some(pose) = scene.world.pose(body) else {
            orphans.push(body);
            continue;
        };
        if !scene.surface.is_attached(record.visual) {
            scene.surface.attach(record.visual);
            report.reattached += 1;
        }
        scene
            .surface
            .set_transform(record.visual, bean_transform(pose, record));
        report.updated += 1;
    }
    for body in orphans {
        if let Some(record) = scene.beans.remove(body) {
            log::warn!("Bean {:?} has no body; dropping its visual", body);
            scene.surface.remove_element(record.visual);
            report.missing += 1;
        }
    }
    if report.reattached > 0 {
        log::debug!("Re-attached {} detached bean visuals", report.reattached);
    }
    report
}
