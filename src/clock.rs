//! Frame pacing
//!
//! Waiting is the only suspension point of the engine. Patterns never sleep
//! directly; they hand every wait to a [`FrameClock`], which lets tests run
//! whole animations against a virtual clock.

use embassy_time::{Duration, Instant};

/// Something that can suspend the engine between frames
pub trait FrameClock {
    /// Block until `duration` has passed since the previous frame deadline
    fn wait(&mut self, duration: Duration);

    /// Forget any pending deadline; the next wait is measured from now
    fn restart(&mut self) {}
}

impl<C: FrameClock + ?Sized> FrameClock for &mut C {
    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration);
    }

    fn restart(&mut self) {
        (**self).restart();
    }
}

/// Default number of frame intervals the clock may fall behind before it
/// drops the backlog.
pub const DEFAULT_MAX_DRIFT_FRAMES: u32 = 2;

/// Blocking clock driven by `embassy-time`.
///
/// Waits are measured against absolute deadlines, so time spent computing and
/// writing a frame does not stretch the animation. If the engine falls behind
/// by more than the drift limit (for example after a slow bus transfer), the
/// deadline is reset to now instead of rushing through the missed frames.
#[derive(Debug, Clone)]
pub struct BlockingClock {
    deadline: Option<Instant>,
    max_drift_frames: u32,
}

impl Default for BlockingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockingClock {
    pub const fn new() -> Self {
        Self {
            deadline: None,
            max_drift_frames: DEFAULT_MAX_DRIFT_FRAMES,
        }
    }

    /// Set how many frame intervals of lag are tolerated before resync
    #[must_use]
    pub const fn with_max_drift_frames(mut self, frames: u32) -> Self {
        self.max_drift_frames = frames;
        self
    }

    fn next_deadline(&mut self, now: Instant, duration: Duration) -> Instant {
        let previous = self.deadline.unwrap_or(now);
        let max_drift = duration * self.max_drift_frames;
        // Drift correction: skip the backlog instead of catching up
        let base = if now > previous + max_drift {
            now
        } else {
            previous
        };
        let deadline = base + duration;
        self.deadline = Some(deadline);
        deadline
    }
}

impl FrameClock for BlockingClock {
    fn wait(&mut self, duration: Duration) {
        let now = Instant::now();
        let deadline = self.next_deadline(now, duration);
        if let Some(remaining) = deadline.checked_duration_since(now) {
            embassy_time::block_for(remaining);
        }
    }

    fn restart(&mut self) {
        self.deadline = None;
    }
}
