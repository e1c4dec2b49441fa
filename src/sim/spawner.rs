//! Timed batch spawning
//!
//! Beans arrive in small bursts on a fixed interval until the target
//! population is reached. Only one run is ever active: starting again
//! replaces the current run.

use super::timer::Interval;

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPhase {
    Idle,
    Running,
}

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    phase: SpawnPhase,
    target: usize,
    spawned: usize,
    burst: usize,
    interval: Interval,
}

impl SpawnScheduler {
    pub fn new(burst: usize, interval_ms: f32) -> Self {
        Self {
            phase: SpawnPhase::Idle,
            target: 0,
            spawned: 0,
            burst: burst.max(1),
            interval: Interval::new(interval_ms),
        }
    }

    /// Begin a run towards `target` beans, cancelling any active run
    pub fn start(&mut self, target: usize) {
        if self.is_active() {
            log::debug!(
                "Cancelling spawn run at {}/{} for a new target of {}",
                self.spawned,
                self.target,
                target
            );
        }
        self.target = target;
        self.spawned = 0;
        self.interval.reset();
        self.phase = if target == 0 {
            SpawnPhase::Idle
        } else {
            log::info!(
                "Spawning {} beans, {} every {}ms",
                target,
                self.burst,
                self.interval.period_ms()
            );
            SpawnPhase::Running
        };
    }

    pub fn cancel(&mut self) {
        self.phase = SpawnPhase::Idle;
    }

    pub fn phase(&self) -> SpawnPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SpawnPhase::Running
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Advance the timer by `dt_ms`; returns how many beans are due now.
    ///
    /// The caller must spawn exactly that many.
    pub fn advance(&mut self, dt_ms: f32) -> usize {
        if !self.is_active() {
            return 0;
        }
        let ticks = self.interval.advance(dt_ms) as usize;
        let due = ticks
            .saturating_mul(self.burst)
            .min(self.target - self.spawned);
        self.spawned += due;
        if self.spawned >= self.target {
            self.phase = SpawnPhase::Idle;
            log::info!("Spawn run complete: {} beans", self.spawned);
        }
        due
    }
}
