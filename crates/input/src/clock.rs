use std::time::{Duration, Instant};

/// Per-frame time step with an upper bound, so a stalled frame does not
/// fling the camera.
///
/// Also keeps a short history of raw frame times for diagnostics.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_step: Duration,
    last: Option<Instant>,
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 60)
    }
}

impl FrameClock {
    pub fn new(max_step: Duration, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            max_step,
            last: None,
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn max_step(&self) -> Duration {
        self.max_step
    }

    /// Seconds since the previous tick, clamped. The first tick returns 0.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let elapsed = self
            .last
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        self.advance(elapsed)
    }

    /// Record `elapsed` and return the clamped step in seconds.
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        self.history[self.index] = elapsed;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
        if elapsed > self.max_step {
            tracing::trace!(?elapsed, max = ?self.max_step, "frame step clamped");
        }
        elapsed.min(self.max_step).as_secs_f32()
    }

    /// Mean raw frame time over the history window.
    pub fn average(&self) -> Duration {
        let count = if self.filled { self.capacity } else { self.index };
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.history[..count].iter().sum();
        total / count as u32
    }
}
