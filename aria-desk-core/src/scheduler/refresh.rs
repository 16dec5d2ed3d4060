use embassy_time::{Duration, Instant};

/// 全刷进行中标志
///
/// Set right before a full refresh is issued and cleared once the panel
/// reports idle. A flag that stays up longer than the watchdog is dropped
/// so a wedged controller cannot block full refreshes forever.
#[derive(Debug, Clone, Copy)]
pub struct RefreshGuard {
    started: Option<Instant>,
    watchdog: Duration,
}

impl RefreshGuard {
    pub const fn new(watchdog: Duration) -> Self {
        Self {
            started: None,
            watchdog,
        }
    }

    pub fn begin(&mut self, now: Instant) {
        self.started = Some(now);
    }

    pub fn end(&mut self) {
        self.started = None;
    }

    pub fn is_active(&self) -> bool {
        self.started.is_some()
    }

    /// Returns how long the flag had been stuck when the watchdog fired.
    pub fn maintain(&mut self, now: Instant, panel_busy: bool) -> Option<Duration> {
        let started = self.started?;
        if !panel_busy {
            self.started = None;
            return None;
        }
        let elapsed = now.saturating_duration_since(started);
        if elapsed >= self.watchdog {
            self.started = None;
            return Some(elapsed);
        }
        None
    }
}
