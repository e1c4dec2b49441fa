//! Rapier-backed physics world
//!
//! Bodies live in rapier's rigid-body and collider sets; the rest of the
//! crate only ever sees `BodyHandle`s. Velocities cross the seam in length
//! units per base step (1000/60 ms) and are converted to rapier's
//! per-second units here.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;

use super::{BodyHandle, Bounds, CircleBody, PhysicsWorld, Pose, StaticRect};
use crate::consts::SIM_DT_MS;
use crate::settings::EngineTuning;

/// Base steps per second
const STEP_RATE: f32 = 1000.0 / SIM_DT_MS;
/// Downward acceleration (length units per s²) at gravity = 1.0
const GRAVITY_SCALE: f32 = 1000.0;
/// Typical bean size; scales rapier's tolerances to pixel units
const LENGTH_UNIT: f32 = 20.0;
/// Pointer spring as acceleration per unit of stretch (1/s²)
const POINTER_STIFFNESS: f32 = 720.0;
/// Roughly critical damping for `POINTER_STIFFNESS`
const POINTER_DAMPING: f32 = 54.0;
/// Per-step velocity loss is capped below 1
const MAX_AIR_RESISTANCE: f32 = 0.99;

#[inline]
fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
fn to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

/// Per-step velocity loss as a rapier damping coefficient (1/s).
///
/// Rapier scales velocity by `1 / (1 + dt * d)` each step.
fn damping_for(air_resistance: f32) -> f32 {
    let air = air_resistance.max(0.0).min(MAX_AIR_RESISTANCE);
    air / (1.0 - air) * STEP_RATE
}

/// Regular polygon inscribed in the circle, or a true ball below 3 sides
fn circle_collider(circle: &CircleBody) -> ColliderBuilder {
    let radius = circle.radius.max(f32::EPSILON);
    let polygon = (circle.sides >= 3)
        .then(|| {
            let points: Vec<Point<Real>> = (0..circle.sides)
                .map(|i| {
                    let a = std::f32::consts::TAU * i as f32 / circle.sides as f32;
                    point![radius * a.cos(), radius * a.sin()]
                })
                .collect();
            ColliderBuilder::convex_polyline(points)
        })
        .flatten();
    polygon.unwrap_or_else(|| ColliderBuilder::ball(radius))
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    air_resistance: f32,
}

/// A held body, the kinematic anchor following the pointer and the spring
/// between them
#[derive(Debug, Clone, Copy)]
struct Pointer {
    body: BodyHandle,
    anchor: RigidBodyHandle,
    joint: ImpulseJointHandle,
}

pub struct RapierWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    entries: BTreeMap<BodyHandle, Entry>,
    next_id: u32,
    pointer: Option<Pointer>,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RapierWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RapierWorld")
            .field("bodies", &self.entries.len())
            .field("gravity", &self.gravity.y)
            .field("held", &self.pointer.map(|p| p.body))
            .finish()
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        let mut world = Self {
            gravity: vector![0.0, 0.0],
            params: IntegrationParameters {
                dt: SIM_DT_MS / 1000.0,
                length_unit: LENGTH_UNIT,
                ..IntegrationParameters::default()
            },
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            entries: BTreeMap::new(),
            next_id: 1,
            pointer: None,
        };
        world.configure(&EngineTuning::default());
        world
    }

    /// Whether rapier has put the body to sleep
    pub fn is_sleeping(&self, body: BodyHandle) -> Option<bool> {
        self.rigid_body(body).map(|rb| rb.is_sleeping())
    }

    fn allocate(&mut self) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    fn rigid_body(&self, body: BodyHandle) -> Option<&RigidBody> {
        let entry = self.entries.get(&body)?;
        self.bodies.get(entry.body)
    }

    fn dynamic_mut(&mut self, body: BodyHandle) -> Option<&mut RigidBody> {
        let entry = self.entries.get(&body)?;
        self.bodies.get_mut(entry.body).filter(|rb| rb.is_dynamic())
    }

    fn drop_pointer(&mut self) -> Option<Pointer> {
        let pointer = self.pointer.take()?;
        self.impulse_joints.remove(pointer.joint, true);
        self.bodies.remove(
            pointer.anchor,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        Some(pointer)
    }
}

impl PhysicsWorld for RapierWorld {
    fn configure(&mut self, tuning: &EngineTuning) {
        self.gravity = vector![0.0, tuning.gravity * GRAVITY_SCALE];
        self.params.num_solver_iterations =
            NonZeroUsize::new(tuning.velocity_iterations as usize).unwrap_or(NonZeroUsize::MIN);
        self.params.num_internal_stabilization_iterations = tuning.position_iterations as usize;
        self.params.num_additional_friction_iterations = tuning.constraint_iterations as usize;
        log::debug!(
            "Rapier tuned: solver={} stabilization={} friction={} gravity={}",
            tuning.velocity_iterations,
            tuning.position_iterations,
            tuning.constraint_iterations,
            tuning.gravity
        );
    }

    fn create_static_rect(&mut self, rect: StaticRect) -> BodyHandle {
        let handle = self.allocate();
        let body = self.bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(to_vector(rect.center))
                .user_data(handle.0 as u128),
        );
        let half = rect.size * 0.5;
        let collider = ColliderBuilder::cuboid(half.x, half.y)
            .friction(rect.friction)
            .restitution(rect.restitution)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution_combine_rule(CoefficientCombineRule::Max);
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        self.entries.insert(
            handle,
            Entry {
                body,
                collider,
                air_resistance: 0.0,
            },
        );
        handle
    }

    fn create_circle(&mut self, circle: CircleBody) -> BodyHandle {
        let handle = self.allocate();
        let damping = damping_for(circle.air_resistance);
        let mut rb = RigidBodyBuilder::dynamic()
            .translation(to_vector(circle.center))
            .linear_damping(damping)
            .angular_damping(damping)
            .can_sleep(circle.sleep_threshold > 0)
            .user_data(handle.0 as u128)
            .build();
        rb.activation_mut().time_until_sleep = circle.sleep_threshold as f32 / STEP_RATE;
        let body = self.bodies.insert(rb);

        let collider = circle_collider(&circle)
            .density(circle.density)
            .friction(circle.friction)
            .restitution(circle.restitution)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution_combine_rule(CoefficientCombineRule::Max);
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        self.entries.insert(
            handle,
            Entry {
                body,
                collider,
                air_resistance: circle.air_resistance,
            },
        );
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        let Some(entry) = self.entries.remove(&body) else {
            return false;
        };
        if self.pointer.is_some_and(|p| p.body == body) {
            self.drop_pointer();
        }
        self.bodies.remove(
            entry.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        true
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(rb) = self.dynamic_mut(body) {
            rb.set_linvel(to_vector(velocity * STEP_RATE), true);
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: f32) {
        if let Some(rb) = self.dynamic_mut(body) {
            rb.set_angvel(angular_velocity * STEP_RATE, true);
        }
    }

    fn set_air_resistance(&mut self, body: BodyHandle, air_resistance: f32) {
        let Some(entry) = self.entries.get_mut(&body) else {
            return;
        };
        entry.air_resistance = air_resistance;
        if let Some(rb) = self.bodies.get_mut(entry.body) {
            let damping = damping_for(air_resistance);
            rb.set_linear_damping(damping);
            rb.set_angular_damping(damping);
        }
    }

    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        self.rigid_body(body).map(|rb| {
            let t = rb.translation();
            Pose {
                position: Vec2::new(t.x, t.y),
                angle: rb.rotation().angle(),
            }
        })
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.rigid_body(body).map(|rb| {
            let v = rb.linvel();
            Vec2::new(v.x, v.y) / STEP_RATE
        })
    }

    fn air_resistance(&self, body: BodyHandle) -> Option<f32> {
        self.entries.get(&body).map(|e| e.air_resistance)
    }

    fn bounds(&self, body: BodyHandle) -> Option<Bounds> {
        let entry = self.entries.get(&body)?;
        let aabb = self.colliders.get(entry.collider)?.compute_aabb();
        Some(Bounds {
            min: Vec2::new(aabb.mins.x, aabb.mins.y),
            max: Vec2::new(aabb.maxs.x, aabb.maxs.y),
        })
    }

    fn is_static(&self, body: BodyHandle) -> Option<bool> {
        self.rigid_body(body).map(|rb| !rb.is_dynamic())
    }

    fn body_count(&self) -> usize {
        self.entries.len()
    }

    fn step(&mut self, dt_ms: f32) {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        self.params.dt = dt_ms / 1000.0;
        // A held body must not fall asleep under the pointer
        let held = self.pointer.map(|p| p.body);
        if let Some(rb) = held.and_then(|body| self.dynamic_mut(body)) {
            rb.wake_up(true);
        }
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    fn grab(&mut self, point: Vec2) -> Option<BodyHandle> {
        self.drop_pointer();
        let target = to_point(point);
        let (handle, body, local) = self.entries.iter().find_map(|(&handle, entry)| {
            let rb = self.bodies.get(entry.body)?;
            let collider = self.colliders.get(entry.collider)?;
            let hit = rb.is_dynamic()
                && collider
                    .shape()
                    .contains_point(collider.position(), &target);
            hit.then(|| (handle, entry.body, rb.position().inverse_transform_point(&target)))
        })?;

        if let Some(rb) = self.bodies.get_mut(body) {
            rb.wake_up(true);
        }
        let anchor = self.bodies.insert(
            RigidBodyBuilder::kinematic_position_based().translation(to_vector(point)),
        );
        let spring = GenericJointBuilder::new(JointAxesMask::empty())
            .local_anchor2(local)
            .motor_position(JointAxis::LinX, 0.0, POINTER_STIFFNESS, POINTER_DAMPING)
            .motor_position(JointAxis::LinY, 0.0, POINTER_STIFFNESS, POINTER_DAMPING)
            .motor_model(JointAxis::LinX, MotorModel::AccelerationBased)
            .motor_model(JointAxis::LinY, MotorModel::AccelerationBased);
        let joint = self.impulse_joints.insert(anchor, body, spring, true);
        self.pointer = Some(Pointer {
            body: handle,
            anchor,
            joint,
        });
        Some(handle)
    }

    fn drag_to(&mut self, point: Vec2) {
        let Some(pointer) = self.pointer else {
            return;
        };
        if let Some(anchor) = self.bodies.get_mut(pointer.anchor) {
            anchor.set_next_kinematic_translation(to_vector(point));
        }
    }

    fn release(&mut self) -> Option<BodyHandle> {
        let pointer = self.drop_pointer()?;
        self.entries.contains_key(&pointer.body).then_some(pointer.body)
    }
}
