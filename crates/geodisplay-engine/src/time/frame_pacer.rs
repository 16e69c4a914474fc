use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic loop-iteration counter.
    pub frame_index: u64,
}

/// Fixed-interval loop pacing.
///
/// The loop sleeps for the whole interval after every iteration, so the
/// interval bounds input latency rather than setting an exact frame rate.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    last: Instant,
    frame_index: u64,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
            frame_index: 0,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advances the counter and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Blocks the calling thread for one interval.
    pub fn sleep(&self) {
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}
