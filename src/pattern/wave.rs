//! Wave pattern
//!
//! A pulse with a triangular profile travels from below the first floor to
//! above the last one and back. The pulse center moves in sub-channel steps,
//! so neighbouring floors cross-fade smoothly as it passes.

use super::Pattern;
use crate::brightness::{MAX_PERCENT, MIN_PERCENT};
use crate::clock::FrameClock;
use crate::config::WaveConfig;
use crate::context::LightContext;
use crate::error::PlayError;
use crate::ChannelSink;

/// Brightness of `channel` for a pulse centered at `center` with half-width
/// `width`: `max(0, (1 - |channel - center| / width) * 100)`.
///
/// Channels at or beyond `width` from the center are dark. A non-positive
/// width yields a dark channel.
pub fn pulse_brightness(channel: u8, center: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return MIN_PERCENT;
    }
    let distance = libm::fabsf(f32::from(channel) - center);
    ((1.0 - distance / width) * MAX_PERCENT).max(MIN_PERCENT)
}

#[derive(Debug, Clone)]
pub struct WavePattern {
    config: WaveConfig,
}

impl WavePattern {
    pub const fn new(config: WaveConfig) -> Self {
        Self { config }
    }

    /// Fill `levels` with the frame for a pulse centered at `center`
    pub fn frame(&self, center: f32, levels: &mut [f32]) {
        for (channel, level) in (0..=u8::MAX).zip(levels.iter_mut()) {
            *level = pulse_brightness(channel, center, self.config.width);
        }
    }

    /// Number of steps between the lowest and the highest pulse position
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sweep_len(&self, channel_count: u8) -> u32 {
        let span = f32::from(channel_count) + 2.0 * self.config.width;
        libm::ceilf(span / self.config.step).max(0.0) as u32
    }

    /// Pulse center at sweep step `index`, from `-width` up to `channel_count + width`
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, index: u32, channel_count: u8) -> f32 {
        let top = f32::from(channel_count) + self.config.width;
        (index as f32 * self.config.step - self.config.width).min(top)
    }

    fn show<S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize>(
        &self,
        ctx: &mut LightContext<'_, S, C, MAX_CHANNELS>,
        levels: &mut [f32; MAX_CHANNELS],
        index: u32,
    ) -> Result<(), PlayError> {
        let count = ctx.channel_count();
        let active = &mut levels[..usize::from(count)];
        self.frame(self.position(index, count), active);
        ctx.apply_frame(active)?;
        ctx.wait(self.config.delay)
    }
}

impl Pattern for WavePattern {
    fn play<S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize>(
        &self,
        ctx: &mut LightContext<'_, S, C, MAX_CHANNELS>,
    ) -> Result<(), PlayError> {
        let mut levels = [MIN_PERCENT; MAX_CHANNELS];
        let sweep = self.sweep_len(ctx.channel_count());

        for index in 0..=sweep {
            self.show(ctx, &mut levels, index)?;
        }
        // The turnaround frame was already shown at the top of the sweep
        for index in (0..sweep).rev() {
            self.show(ctx, &mut levels, index)?;
        }

        ctx.clear_all()?;
        Ok(())
    }
}
