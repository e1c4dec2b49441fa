//! Stage coordinator
//!
//! Everything runs on one thread, once per host frame:
//! 1. Drain queued input (resize, pointer)
//! 2. Advance the resize debounce and the spawn scheduler
//! 3. Run fixed physics steps, each followed by a synchronization pass
//!
//! Synchronization therefore only ever sees fully advanced steps.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::dims::{Viewport, size_range};
use super::drag::{DragController, GrabEvent};
use super::factory::BeanFactory;
use super::scene::Scene;
use super::spawner::SpawnScheduler;
use super::sync::{SyncReport, synchronize};
use super::timer::Debounce;
use super::walls::Walls;
use crate::consts::*;
use crate::error::BeanError;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::platform::{HostStage, clock_seed};
use crate::renderer::{BeanArt, Surface};
use crate::settings::Settings;
use crate::uniform;

/// Longest frame the stage will simulate (ms)
const MAX_FRAME_MS: f32 = 100.0;

/// Host input, queued until the next frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageEvent {
    Resize { width: f32, height: f32 },
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
}

pub struct Stage<W, S> {
    scene: Scene<W, S>,
    settings: Settings,
    factory: BeanFactory,
    spawner: SpawnScheduler,
    walls: Walls,
    drag: DragController,
    rng: Pcg32,
    viewport: Viewport,
    pending_viewport: Option<Viewport>,
    resize_debounce: Debounce,
    input: VecDeque<StageEvent>,
    accumulator: f32,
    last_sync: SyncReport,
}

impl<W: PhysicsWorld, S: Surface> Stage<W, S> {
    /// Set up the world, surface and walls for the host's stage element
    pub fn new<H: HostStage>(
        host: &H,
        mut world: W,
        mut surface: S,
        settings: Settings,
        art: BeanArt,
    ) -> Result<Self, BeanError> {
        let size = host.client_size().ok_or(BeanError::MissingStage)?;
        let viewport = Viewport::new(size.x, size.y);

        world.configure(&settings.engine);
        surface.resize(viewport);

        let seed = settings.seed.unwrap_or_else(clock_seed);
        let mut walls = Walls::new(&settings);
        walls.rebuild(&mut world, viewport);

        log::info!(
            "Stage ready: {}x{}, seed {}",
            viewport.width,
            viewport.height,
            seed
        );

        Ok(Self {
            scene: Scene::new(world, surface),
            factory: BeanFactory::new(art, &settings),
            spawner: SpawnScheduler::new(settings.burst_size, settings.spawn_interval_ms),
            walls,
            drag: DragController::default(),
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            pending_viewport: None,
            resize_debounce: Debounce::new(settings.resize_debounce_ms),
            input: VecDeque::new(),
            accumulator: 0.0,
            last_sync: SyncReport::default(),
            settings,
        })
    }

    /// Start spawning the configured population
    pub fn start(&mut self) {
        self.start_with(self.settings.target_count);
    }

    /// Start (or restart) spawning towards `target` beans
    pub fn start_with(&mut self, target: usize) {
        self.spawner.start(target);
    }

    pub fn push_event(&mut self, event: StageEvent) {
        self.input.push_back(event);
    }

    /// Advance the stage by `dt_ms` of host time; returns physics steps run.
    ///
    /// A non-finite or negative `dt_ms` counts as an empty frame.
    pub fn frame(&mut self, dt_ms: f32) -> u32 {
        let dt_ms = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };

        while let Some(event) = self.input.pop_front() {
            self.handle_event(event);
        }

        if self.resize_debounce.advance(dt_ms) {
            self.apply_resize();
        }

        let due = self.spawner.advance(dt_ms);
        if due > 0 {
            self.spawn_burst(due);
        }

        self.accumulator += dt_ms;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(SIM_DT_MS);
        }
        substeps
    }

    /// One physics step followed by one synchronization pass
    pub fn step(&mut self) -> SyncReport {
        self.scene.world.step(SIM_DT_MS);
        self.last_sync = synchronize(&mut self.scene);
        self.last_sync
    }

    fn handle_event(&mut self, event: StageEvent) {
        match event {
            StageEvent::Resize { width, height } => {
                self.pending_viewport = Some(Viewport::new(width, height));
                self.resize_debounce.trigger();
            }
            StageEvent::PointerDown(point) => {
                let body = self.scene.world.grab(point);
                self.drag
                    .handle(&mut self.scene.world, &mut self.rng, GrabEvent::Start(body));
            }
            StageEvent::PointerMove(point) => self.scene.world.drag_to(point),
            StageEvent::PointerUp => {
                let body = self.scene.world.release();
                self.drag
                    .handle(&mut self.scene.world, &mut self.rng, GrabEvent::End(body));
            }
        }
    }

    fn apply_resize(&mut self) {
        let Some(viewport) = self.pending_viewport.take() else {
            return;
        };
        self.viewport = viewport;
        self.scene.surface.resize(viewport);
        self.walls.rebuild(&mut self.scene.world, viewport);
    }

    /// Spawn `count` beans above the visible area
    fn spawn_burst(&mut self, count: usize) {
        let viewport = self.viewport;
        let top_y = -(viewport.height * SPAWN_HEIGHT_FRACTION)
            .round()
            .max(SPAWN_HEIGHT_MIN);
        let range = size_range(viewport, self.settings.base_mult);
        for _ in 0..count {
            let width = uniform(&mut self.rng, range.min, range.max).round();
            self.factory
                .spawn(&mut self.scene, &mut self.rng, viewport, top_y, Some(width));
        }
    }

    /// Spawn one bean at the top of the stage right away
    pub fn spawn_one(&mut self, width: Option<f32>) -> BodyHandle {
        let viewport = self.viewport;
        let top_y = -(viewport.height * SPAWN_HEIGHT_FRACTION)
            .round()
            .max(SPAWN_HEIGHT_MIN);
        self.factory
            .spawn(&mut self.scene, &mut self.rng, viewport, top_y, width)
    }

    pub fn remove_bean(&mut self, body: BodyHandle) -> bool {
        self.scene.remove_bean(body)
    }

    pub fn clear_beans(&mut self) -> usize {
        let removed = self.scene.clear_beans();
        log::info!("Cleared {} beans", removed);
        removed
    }

    pub fn scene(&self) -> &Scene<W, S> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<W, S> {
        &mut self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    pub fn walls(&self) -> &Walls {
        &self.walls
    }

    pub fn bean_count(&self) -> usize {
        self.scene.beans.len()
    }

    pub fn last_sync(&self) -> SyncReport {
        self.last_sync
    }

    pub fn is_resize_pending(&self) -> bool {
        self.resize_debounce.is_pending()
    }
}
