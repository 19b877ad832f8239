//! Frame clock fed by host timestamps

/// Default stall clamp: a frame never integrates more than 100ms
pub const DEFAULT_MAX_FRAME_DT: f64 = 0.1;

/// Tracks page time from host-supplied frame timestamps (seconds).
///
/// The first tick after creation or [`FrameClock::reset`] yields a zero
/// delta, so resuming from a hidden tab never produces a catch-up step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Total simulated time in seconds (sum of clamped deltas)
    pub total_time: f64,
    /// Clamped time since last frame in seconds
    pub delta_time: f64,
    /// Upper bound applied to every delta
    pub max_delta: f64,
    /// Timestamp of the previous tick
    last_timestamp: f64,
    /// Whether the next tick re-establishes the baseline
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::with_max_delta(DEFAULT_MAX_FRAME_DT)
    }
}

impl FrameClock {
    /// Create a clock with the default 100ms stall clamp
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock with a custom stall clamp
    pub fn with_max_delta(max_delta: f64) -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            max_delta: max_delta.max(0.0),
            last_timestamp: 0.0,
            first_tick: true,
        }
    }

    /// Advance the clock to `now` (seconds). Call once per frame.
    ///
    /// Returns the clamped delta. Timestamps that go backwards yield zero.
    pub fn tick(&mut self, now: f64) -> f64 {
        if self.first_tick {
            self.first_tick = false;
            self.last_timestamp = now;
            self.delta_time = 0.0;
            return 0.0;
        }

        let elapsed = now - self.last_timestamp;
        self.last_timestamp = now;

        self.delta_time = if elapsed.is_finite() {
            elapsed.clamp(0.0, self.max_delta)
        } else {
            0.0
        };
        self.total_time += self.delta_time;
        self.delta_time
    }

    /// Forget the previous timestamp; the next tick yields a zero delta
    pub fn reset(&mut self) {
        self.first_tick = true;
        self.delta_time = 0.0;
    }
}
