//! Time management utilities

use std::time::{Duration, Instant};

/// Frame pacer for the caller-owned main loop
///
/// The window core never sleeps; the loop that drains events calls
/// [`FrameTimer::wait_for_next_frame`] once per iteration instead.
pub struct FrameTimer {
    frame_budget: Duration,
    frame_start: Instant,
    delta_time: f32,
    frame_count: u64,
}

impl FrameTimer {
    /// Create a timer pacing towards `target_fps` frames per second
    ///
    /// A target of zero is treated as one frame per second.
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_budget: Self::budget_for(target_fps),
            frame_start: Instant::now(),
            delta_time: 0.0,
            frame_count: 0,
        }
    }

    /// Time allotted to a single frame at `target_fps`, in whole milliseconds
    pub fn budget_for(target_fps: u32) -> Duration {
        Duration::from_millis(1000 / u64::from(target_fps.max(1)))
    }

    /// Time allotted to a single frame
    pub const fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    /// Sleep for whatever is left of the current frame budget, then start the next frame
    ///
    /// Frames that already overran their budget do not sleep at all.
    pub fn wait_for_next_frame(&mut self) {
        let remaining = self.frame_budget.saturating_sub(self.frame_start.elapsed());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        self.tick();
    }

    fn tick(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.frame_start).as_secs_f32();
        self.frame_start = now;
        self.frame_count += 1;
    }

    /// Get the duration of the last completed frame in seconds
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the number of completed frames
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
