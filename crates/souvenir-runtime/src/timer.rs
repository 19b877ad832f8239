//! One-shot wall-clock timer that the owner re-arms after each firing

/// Ambient spawn timer.
///
/// Mirrors a host `setTimeout` handle: armed with an absolute due time,
/// fires at most once per arming, and can be stopped synchronously.
#[derive(Debug, Clone, Default)]
pub struct SpawnTimer {
    due_at: Option<f64>,
}

impl SpawnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `interval` seconds after `now`, replacing any pending due time
    pub fn arm(&mut self, now: f64, interval: f64) {
        self.due_at = Some(now + interval.max(0.0));
    }

    /// Cancel the pending firing, if any
    pub fn stop(&mut self) {
        self.due_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_at.is_some()
    }

    pub fn due_at(&self) -> Option<f64> {
        self.due_at
    }

    /// Returns true exactly once when `now` has reached the due time.
    /// The timer is disarmed after firing.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.due_at {
            Some(due) if now >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_when_due() {
        let mut timer = SpawnTimer::new();
        timer.arm(10.0, 2.0);
        assert!(!timer.poll(11.9));
        assert!(timer.poll(12.0));
        assert!(!timer.poll(13.0));
        assert!(!timer.is_armed());
    }

    #[test]
    fn stop_cancels() {
        let mut timer = SpawnTimer::new();
        timer.arm(0.0, 1.0);
        timer.stop();
        assert!(!timer.poll(5.0));
    }

    #[test]
    fn rearm_replaces_due_time() {
        let mut timer = SpawnTimer::new();
        timer.arm(0.0, 1.0);
        timer.arm(0.5, 3.0);
        assert_eq!(timer.due_at(), Some(3.5));
    }
}
