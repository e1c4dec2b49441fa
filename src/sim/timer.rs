//! Millisecond timers driven by the frame clock

/// Repeating timer; reports how many periods elapsed per advance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period_ms: f32,
    elapsed_ms: f32,
}

impl Interval {
    pub fn new(period_ms: f32) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            elapsed_ms: 0.0,
        }
    }

    pub fn period_ms(&self) -> f32 {
        self.period_ms
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }

    /// Advance by `dt_ms`, returning the number of times the timer fired.
    ///
    /// NaN counts as no time; the count saturates at `u32::MAX`.
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        let dt_ms = if dt_ms.is_nan() { 0.0 } else { dt_ms.max(0.0) };
        let elapsed = f64::from(self.elapsed_ms) + f64::from(dt_ms);
        let period = f64::from(self.period_ms);
        let fires = (elapsed / period).floor();
        if !fires.is_finite() || fires >= f64::from(u32::MAX) {
            self.elapsed_ms = 0.0;
            return u32::MAX;
        }
        self.elapsed_ms = (elapsed - fires * period) as f32;
        fires as u32
    }
}

/// Cancellable one-shot delay; every trigger restarts the countdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debounce {
    delay_ms: f32,
    remaining_ms: Option<f32>,
}

impl Debounce {
    pub fn new(delay_ms: f32) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            remaining_ms: None,
        }
    }

    /// Cancel any pending countdown and start a fresh one
    pub fn trigger(&mut self) {
        self.remaining_ms = Some(self.delay_ms);
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining_ms.is_some()
    }

    /// Advance by `dt_ms`; true exactly once when the countdown runs out
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        let Some(remaining) = self.remaining_ms else {
            return false;
        };
        let remaining = remaining - dt_ms.max(0.0);
        if remaining <= 0.0 {
            self.remaining_ms = None;
            true
        } else {
            self.remaining_ms = Some(remaining);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_fires_per_period() {
        let mut t = Interval::new(80.0);
        assert_eq!(t.advance(79.0), 0);
        assert_eq!(t.advance(1.0), 1);
        assert_eq!(t.advance(250.0), 3);
        assert_eq!(t.advance(10.0), 0);
    }

    #[test]
    fn test_interval_reset() {
        let mut t = Interval::new(80.0);
        t.advance(70.0);
        t.reset();
        assert_eq!(t.advance(70.0), 0);
    }

    #[test]
    fn test_interval_period_floor() {
        let mut t = Interval::new(0.0);
        assert_eq!(t.period_ms(), 1.0);
        assert_eq!(t.advance(3.0), 3);
    }

    #[test]
    fn test_interval_huge_and_infinite_steps_return() {
        let mut t = Interval::new(80.0);
        assert_eq!(t.advance(1.0e12), u32::MAX);
        assert_eq!(t.advance(f32::INFINITY), u32::MAX);
        // Still usable afterwards
        assert_eq!(t.advance(79.0), 0);
        assert_eq!(t.advance(1.0), 1);
    }

    #[test]
    fn test_interval_ignores_nan() {
        let mut t = Interval::new(80.0);
        t.advance(40.0);
        assert_eq!(t.advance(f32::NAN), 0);
        assert_eq!(t.advance(40.0), 1);
    }

    #[test]
    fn test_interval_carries_remainder() {
        let mut t = Interval::new(80.0);
        assert_eq!(t.advance(1000.0), 12);
        assert_eq!(t.advance(39.0), 0);
        assert_eq!(t.advance(1.0), 1);
    }

    #[test]
    fn test_debounce_coalesces_triggers() {
        let mut d = Debounce::new(160.0);
        d.trigger();
        assert!(!d.advance(100.0));
        d.trigger();
        assert!(!d.advance(100.0));
        assert!(d.advance(60.0));
        assert!(!d.is_pending());
        assert!(!d.advance(500.0));
    }

    #[test]
    fn test_debounce_cancel() {
        let mut d = Debounce::new(160.0);
        d.trigger();
        d.cancel();
        assert!(!d.advance(1000.0));
    }
}
