//! Pointer drag handling
//!
//! While held, a bean loses almost all air resistance so it tracks the
//! pointer; on release it gets its normal damping back plus a random toss.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::uniform;

/// Grab notifications from the engine's pointer layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabEvent {
    /// Pointer pressed; `None` when it landed on empty space
    Start(Option<BodyHandle>),
    /// Pointer released; `None` when nothing was held
    End(Option<BodyHandle>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragController {
    held_air: f32,
    rest_air: f32,
    /// Half-range of the release velocity per axis
    toss: Vec2,
}

impl Default for DragController {
    fn default() -> Self {
        Self {
            held_air: DRAG_AIR_RESISTANCE,
            rest_air: BEAN_AIR_RESISTANCE,
            toss: Vec2::new(TOSS_SPEED_X, TOSS_SPEED_Y),
        }
    }
}

impl DragController {
    pub fn handle<W, R>(&self, world: &mut W, rng: &mut R, event: GrabEvent)
    where
        W: PhysicsWorld,
        R: Rng + ?Sized,
    {
        match event {
            GrabEvent::Start(Some(body)) => {
                world.set_air_resistance(body, self.held_air);
                log::debug!("Grabbed {:?}", body);
            }
            GrabEvent::End(Some(body)) => {
                world.set_air_resistance(body, self.rest_air);
                let toss = Vec2::new(
                    uniform(rng, -self.toss.x, self.toss.x),
                    uniform(rng, -self.toss.y, self.toss.y),
                );
                world.set_velocity(body, toss);
                log::debug!("Released {:?} with toss ({:.2}, {:.2})", body, toss.x, toss.y);
            }
            GrabEvent::Start(None) | GrabEvent::End(None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{CircleBody, RapierWorld};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world_with_bean() -> (RapierWorld, BodyHandle) {
        let mut world = RapierWorld::new();
        let body = world.create_circle(CircleBody {
            center: Vec2::new(100.0, 100.0),
            radius: 10.0,
            friction: 0.95,
            restitution: 0.01,
            air_resistance: BEAN_AIR_RESISTANCE,
            density: 0.004,
            sleep_threshold: 60,
            sides: 8,
        });
        (world, body)
    }

    #[test]
    fn test_grab_lowers_air_resistance() {
        let (mut world, body) = world_with_bean();
        let mut rng = Pcg32::seed_from_u64(5);
        DragController::default().handle(&mut world, &mut rng, GrabEvent::Start(Some(body)));
        assert_eq!(world.air_resistance(body), Some(0.001));
    }

    #[test]
    fn test_release_restores_and_tosses() {
        let (mut world, body) = world_with_bean();
        let drag = DragController::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let max = (0.5f32 * 0.5 + 0.2 * 0.2).sqrt();
        for _ in 0..100 {
            drag.handle(&mut world, &mut rng, GrabEvent::Start(Some(body)));
            drag.handle(&mut world, &mut rng, GrabEvent::End(Some(body)));
            assert_eq!(world.air_resistance(body), Some(0.02));
            let v = world.velocity(body).unwrap();
            assert!(v.x.abs() <= 0.5 && v.y.abs() <= 0.2);
            assert!(v.length() <= max);
        }
    }

    #[test]
    fn test_empty_grab_is_noop() {
        let (mut world, body) = world_with_bean();
        let mut rng = Pcg32::seed_from_u64(5);
        let drag = DragController::default();
        drag.handle(&mut world, &mut rng, GrabEvent::Start(None));
        drag.handle(&mut world, &mut rng, GrabEvent::End(None));
        assert_eq!(world.air_resistance(body), Some(BEAN_AIR_RESISTANCE));
        assert_eq!(world.velocity(body), Some(Vec2::ZERO));
    }
}
