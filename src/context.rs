//! Explicit engine context
//!
//! [`LightContext`] bundles everything a pattern needs: the brightness mapper
//! (which owns the sink), the frame clock and the cancellation token. Patterns
//! receive it by mutable reference, so there is exactly one writer of channel
//! state at any time.

use core::num::NonZeroU16;

use embassy_time::Duration;

use crate::brightness::BrightnessMapper;
use crate::cancel::CancelToken;
use crate::clock::FrameClock;
use crate::config::CancelGranularity;
use crate::error::{HardwareError, PlayError};
use crate::fader::Fade;
use crate::ChannelSink;

pub struct LightContext<'a, S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize> {
    mapper: BrightnessMapper<S, MAX_CHANNELS>,
    clock: C,
    cancel: CancelToken<'a>,
    granularity: CancelGranularity,
}

impl<'a, S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize>
    LightContext<'a, S, C, MAX_CHANNELS>
{
    pub const fn new(
        mapper: BrightnessMapper<S, MAX_CHANNELS>,
        clock: C,
        cancel: CancelToken<'a>,
        granularity: CancelGranularity,
    ) -> Self {
        Self {
            mapper,
            clock,
            cancel,
            granularity,
        }
    }

    pub const fn channel_count(&self) -> u8 {
        self.mapper.channel_count()
    }

    pub const fn mapper(&self) -> &BrightnessMapper<S, MAX_CHANNELS> {
        &self.mapper
    }

    pub const fn mapper_mut(&mut self) -> &mut BrightnessMapper<S, MAX_CHANNELS> {
        &mut self.mapper
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub const fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn set_brightness(&mut self, channel: u8, percent: f32) -> Result<(), HardwareError> {
        self.mapper.set_brightness(channel, percent)
    }

    /// Drive every active channel to the same brightness, in channel order
    pub fn set_all(&mut self, percent: f32) -> Result<(), HardwareError> {
        for channel in 0..self.channel_count() {
            self.mapper.set_brightness(channel, percent)?;
        }
        Ok(())
    }

    /// Write a whole frame. `levels[i]` goes to channel `i`.
    pub fn apply_frame(&mut self, levels: &[f32]) -> Result<(), HardwareError> {
        for (channel, &percent) in (0..self.channel_count()).zip(levels) {
            self.mapper.set_brightness(channel, percent)?;
        }
        Ok(())
    }

    pub fn clear_all(&mut self) -> Result<(), HardwareError> {
        self.set_all(0.0)
    }

    /// Suspend until the next frame.
    ///
    /// With [`CancelGranularity::BetweenFrames`] a pending cancellation is
    /// reported after the wait.
    pub fn wait(&mut self, duration: Duration) -> Result<(), PlayError> {
        self.clock.wait(duration);
        if self.granularity == CancelGranularity::BetweenFrames && self.is_cancelled() {
            return Err(PlayError::Cancelled);
        }
        Ok(())
    }

    /// Ramp one channel from `from` to `to`
    pub fn fade(
        &mut self,
        channel: u8,
        from: f32,
        to: f32,
        duration: Duration,
        steps: NonZeroU16,
    ) -> Result<(), PlayError> {
        for sample in Fade::new(from, to, duration, steps) {
            self.set_brightness(channel, sample.brightness)?;
            self.wait(sample.wait)?;
        }
        Ok(())
    }

    /// Ramp every active channel together
    pub fn fade_all(
        &mut self,
        from: f32,
        to: f32,
        duration: Duration,
        steps: NonZeroU16,
    ) -> Result<(), PlayError> {
        for sample in Fade::new(from, to, duration, steps) {
            self.set_all(sample.brightness)?;
            self.wait(sample.wait)?;
        }
        Ok(())
    }
}
