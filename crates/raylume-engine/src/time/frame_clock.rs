use std::time::{Duration, Instant};

/// Smallest step reported; guards against zero-length ticks.
const MIN_STEP: Duration = Duration::from_micros(100);
/// Largest step reported. A stall (debugger, minimized window, scene reload)
/// would otherwise throw the camera across the scene.
const MAX_STEP: Duration = Duration::from_millis(250);

#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt:    f32,
    /// Ticks before this one.
    pub frame: u64,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    last:   Instant,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: Instant::now(), frames: 0 }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.advance(Instant::now())
    }

    fn advance(&mut self, now: Instant) -> FrameTime {
        let step = now.saturating_duration_since(self.last).clamp(MIN_STEP, MAX_STEP);
        self.last = now;

        let time = FrameTime { dt: step.as_secs_f32(), frame: self.frames };
        self.frames += 1;
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
