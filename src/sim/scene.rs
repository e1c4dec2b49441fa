//! Bean bookkeeping
//!
//! The physics world and the surface know nothing about each other. The
//! registry is the only link: one `BeanRecord` per bean body, created and
//! destroyed together with the body and its visual.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::placement::Occupant;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::renderer::{ElementId, Surface};

/// Per-bean visual parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeanRecord {
    pub visual: ElementId,
    /// Final horizontal scale (negative when mirrored)
    pub scale_x: f32,
    pub scale_y: f32,
    /// Collision radius the body was created with
    pub radius: f32,
    /// Artwork point that sits on the body centre
    pub art_center: Vec2,
}

impl BeanRecord {
    pub fn is_mirrored(&self) -> bool {
        self.scale_x < 0.0
    }
}

/// Body -> bean mapping. Iteration order is not part of the contract.
#[derive(Debug, Clone, Default)]
pub struct BeanRegistry {
    records: BTreeMap<BodyHandle, BeanRecord>,
}

impl BeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, body: BodyHandle, record: BeanRecord) {
        self.records.insert(body, record);
    }

    pub fn remove(&mut self, body: BodyHandle) -> Option<BeanRecord> {
        self.records.remove(&body)
    }

    pub fn get(&self, body: BodyHandle) -> Option<&BeanRecord> {
        self.records.get(&body)
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.records.contains_key(&body)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &BeanRecord)> {
        self.records.iter().map(|(&body, record)| (body, record))
    }

    pub fn bodies(&self) -> Vec<BodyHandle> {
        self.records.keys().copied().collect()
    }
}

/// Physics world, surface and the registry tying them together
#[derive(Debug)]
pub struct Scene<W, S> {
    pub world: W,
    pub surface: S,
    pub beans: BeanRegistry,
}

impl<W: PhysicsWorld, S: Surface> Scene<W, S> {
    pub fn new(world: W, surface: S) -> Self {
        Self {
            world,
            surface,
            beans: BeanRegistry::new(),
        }
    }

    /// Live beans as circles for the placement search.
    ///
    /// Uses the recorded radius, or half the larger bounding-box side for a
    /// record without one.
    pub fn occupants(&self) -> Vec<Occupant> {
        self.beans
            .iter()
            .filter_map(|(body, record)| {
                let pose = self.world.pose(body)?;
                let radius = if record.radius > 0.0 {
                    record.radius
                } else {
                    self.world.bounds(body)?.half_max_extent()
                };
                Some(Occupant {
                    center: pose.position,
                    radius,
                })
            })
            .collect()
    }

    /// Remove a bean's body, visual and record together
    pub fn remove_bean(&mut self, body: BodyHandle) -> bool {
        let Some(record) = self.beans.remove(body) else {
            return false;
        };
        self.surface.remove_element(record.visual);
        self.world.remove_body(body);
        true
    }

    /// Remove every bean; returns how many were removed
    pub fn clear_beans(&mut self) -> usize {
        let bodies = self.beans.bodies();
        for &body in &bodies {
            self.remove_bean(body);
        }
        bodies.len()
    }
}
