//! Linear brightness ramps
//!
//! A [`Fade`] is a pure sample generator: it knows nothing about channels or
//! hardware. [`LightContext::fade`](crate::LightContext::fade) applies the
//! samples and performs the waits.

use core::num::NonZeroU16;

use embassy_time::Duration;

/// Default number of interpolation steps for a fade
pub const DEFAULT_FADE_STEPS: NonZeroU16 = match NonZeroU16::new(20) {
    Some(steps) => steps,
    None => unreachable!(),
};

/// One point of a fade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeSample {
    /// Brightness percentage to apply
    pub brightness: f32,
    /// Time to wait after applying it
    pub wait: Duration,
}

/// Iterator over the `steps + 1` evenly spaced samples between two levels.
///
/// The first sample is exactly `from` and the last exactly `to`. Every sample
/// carries the same wait of `duration / steps`.
#[derive(Debug, Clone)]
pub struct Fade {
    from: f32,
    to: f32,
    steps: u16,
    wait: Duration,
    next: u16,
    done: bool,
}

impl Fade {
    pub fn new(from: f32, to: f32, duration: Duration, steps: NonZeroU16) -> Self {
        Self {
            from,
            to,
            steps: steps.get(),
            wait: duration / u32::from(steps.get()),
            next: 0,
            done: false,
        }
    }

    /// Wait interval shared by all samples
    pub const fn wait(&self) -> Duration {
        self.wait
    }

    /// Brightness at sample `index` (0..=steps)
    pub fn sample_at(&self, index: u16) -> f32 {
        if index >= self.steps {
            return self.to;
        }
        let progress = f32::from(index) / f32::from(self.steps);
        self.from + (self.to - self.from) * progress
    }
}

impl Iterator for Fade {
    type Item = FadeSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let index = self.next;
        if index == self.steps {
            self.done = true;
        } else {
            self.next += 1;
        }
        Some(FadeSample {
            brightness: self.sample_at(index),
            wait: self.wait,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.done {
            0
        } else {
            usize::from(self.steps - self.next) + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Fade {}
