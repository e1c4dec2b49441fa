//! Bean creation
//!
//! One call creates the physics body, its styled visual and the record
//! linking them. There is no failure path: a crowded spawn line only
//! degrades placement.

use glam::Vec2;
use rand::Rng;

use super::dims::{Viewport, derive_dimensions, size_range};
use super::placement::find_free_position;
use super::scene::{BeanRecord, Scene};
use crate::consts::*;
use crate::physics::{BodyHandle, CircleBody, PhysicsWorld};
use crate::renderer::{BeanArt, Surface};
use crate::settings::Settings;
use crate::{round3, uniform};

/// Chance a bean is drawn mirrored
const MIRROR_CHANCE: f32 = 0.12;

/// Creates beans from one artwork template
#[derive(Debug, Clone)]
pub struct BeanFactory {
    art: BeanArt,
    base_mult: f32,
    placement_attempts: usize,
}

impl BeanFactory {
    pub fn new(art: BeanArt, settings: &Settings) -> Self {
        Self {
            art,
            base_mult: settings.base_mult,
            placement_attempts: settings.placement_attempts,
        }
    }

    /// Spawn one bean on the line `y`.
    ///
    /// `width` of `None` draws a width from the viewport's size range.
    pub fn spawn<W, S, R>(
        &self,
        scene: &mut Scene<W, S>,
        rng: &mut R,
        viewport: Viewport,
        y: f32,
        width: Option<f32>,
    ) -> BodyHandle
    where
        W: PhysicsWorld,
        S: Surface,
        R: Rng + ?Sized,
    {
        let width = width.unwrap_or_else(|| {
            let range = size_range(viewport, self.base_mult);
            uniform(rng, range.min, range.max).round()
        });
        let dims = derive_dimensions(width);

        let side = (dims.width * 0.5).round().max(SIDE_MARGIN_MIN);
        let placement = find_free_position(
            rng,
            side,
            viewport.width - side,
            y,
            dims.radius,
            &scene.occupants(),
            self.placement_attempts,
        );
        if !placement.clear {
            log::debug!(
                "No clear spot for r={} at y={} after {} tries; spawning overlapped",
                dims.radius,
                y,
                self.placement_attempts
            );
        }

        let body = scene.world.create_circle(CircleBody {
            center: placement.position,
            radius: dims.radius,
            friction: BEAN_FRICTION,
            restitution: BEAN_RESTITUTION,
            air_resistance: BEAN_AIR_RESISTANCE,
            density: 0.004 + (dims.radius / 60.0) * 0.001,
            sleep_threshold: BEAN_SLEEP_THRESHOLD,
            sides: BEAN_POLYGON_SIDES,
        });
        scene.world.set_velocity(
            body,
            Vec2::new(uniform(rng, -0.18, 0.18), uniform(rng, 0.08, 0.4)),
        );
        scene
            .world
            .set_angular_velocity(body, uniform(rng, -0.02, 0.02));

        let visual = scene
            .surface
            .create_element(self.art.instance_markup(dims.scale));
        scene.surface.attach(visual);

        let sx = round3(uniform(rng, 0.92, 1.12));
        let sy = round3(uniform(rng, 0.88, 1.08));
        let flip = if rng.random::<f32>() > 1.0 - MIRROR_CHANCE { -1.0 } else { 1.0 };

        scene.beans.insert(
            body,
            BeanRecord {
                visual,
                scale_x: sx * flip * dims.scale,
                scale_y: sy * dims.scale,
                radius: dims.radius,
                art_center: Vec2::new(ART_CENTER_X, ART_CENTER_Y),
            },
        );
        log::debug!(
            "Spawned bean {:?} w={} r={} at ({:.1}, {:.1})",
            body,
            dims.width,
            dims.radius,
            placement.position.x,
            placement.position.y
        );
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RapierWorld;
    use crate::renderer::SvgSurface;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Scene<RapierWorld, SvgSurface>, BeanFactory, Pcg32, Viewport) {
        let viewport = Viewport::new(800.0, 600.0);
        let scene = Scene::new(RapierWorld::new(), SvgSurface::new(viewport));
        let factory = BeanFactory::new(BeanArt::default(), &Settings::default());
        (scene, factory, Pcg32::seed_from_u64(2024), viewport)
    }

    #[test]
    fn test_spawn_registers_body_and_visual() {
        let (mut scene, factory, mut rng, viewport) = setup();
        let body = factory.spawn(&mut scene, &mut rng, viewport, -160.0, Some(16.0));

        let record = *scene.beans.get(body).unwrap();
        assert_eq!(record.radius, 10.0);
        assert_eq!(record.art_center, Vec2::new(150.0, 150.0));
        assert!(scene.surface.is_attached(record.visual));
        assert_eq!(scene.world.body_count(), 1);
        assert_eq!(scene.surface.element_count(), 1);
    }

    #[test]
    fn test_spawn_respects_line_and_margins() {
        let (mut scene, factory, mut rng, viewport) = setup();
        for _ in 0..30 {
            let body = factory.spawn(&mut scene, &mut rng, viewport, -160.0, Some(16.0));
            let pos = scene.world.pose(body).unwrap().position;
            assert_eq!(pos.y, -160.0);
            assert!(pos.x >= 10.0 && pos.x <= 790.0);
        }
    }

    #[test]
    fn test_initial_motion_ranges() {
        let (mut scene, factory, mut rng, viewport) = setup();
        for _ in 0..30 {
            let body = factory.spawn(&mut scene, &mut rng, viewport, -160.0, None);
            let v = scene.world.velocity(body).unwrap();
            // Per-step units survive the engine's per-second conversion
            assert!(v.x >= -0.18 - 1e-6 && v.x <= 0.18 + 1e-6, "v = {v}");
            assert!(v.y >= 0.08 - 1e-6 && v.y <= 0.4 + 1e-6, "v = {v}");
            assert_eq!(scene.world.air_resistance(body), Some(BEAN_AIR_RESISTANCE));
        }
    }

    #[test]
    fn test_random_width_comes_from_size_range() {
        let (mut scene, factory, mut rng, viewport) = setup();
        let range = size_range(viewport, BASE_MULT);
        for _ in 0..30 {
            let body = factory.spawn(&mut scene, &mut rng, viewport, -160.0, None);
            let radius = scene.beans.get(body).unwrap().radius;
            assert!(radius >= derive_dimensions(range.min).radius);
            assert!(radius <= derive_dimensions(range.max).radius);
        }
    }

    #[test]
    fn test_visual_scales_and_mirroring() {
        let (mut scene, factory, mut rng, viewport) = setup();
        let mut mirrored = 0;
        for _ in 0..400 {
            let body = factory.spawn(&mut scene, &mut rng, viewport, -160.0, Some(100.0));
            let record = scene.beans.get(body).unwrap();
            // Width 100 gives an artwork scale of exactly 1
            assert!((0.92..=1.12).contains(&record.scale_x.abs()));
            assert!((0.88..=1.08).contains(&record.scale_y));
            if record.is_mirrored() {
                mirrored += 1;
            }
        }
        // ~12% of 400
        assert!((20..=80).contains(&mirrored), "mirrored = {mirrored}");
    }

    #[test]
    fn test_second_bean_avoids_first() {
        let (mut scene, factory, mut rng, viewport) = setup();
        let a = factory.spawn(&mut scene, &mut rng, viewport, -160.0, Some(16.0));
        let b = factory.spawn(&mut scene, &mut rng, viewport, -160.0, Some(16.0));
        let pa = scene.world.pose(a).unwrap().position;
        let pb = scene.world.pose(b).unwrap().position;
        assert!(pa.distance(pb) >= 10.0 + 10.0 + PLACEMENT_MARGIN);
    }
}
