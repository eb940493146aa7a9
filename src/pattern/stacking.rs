//! Stacking pattern
//!
//! Floors fade in one by one from the bottom until the whole building is lit,
//! then everything fades out together.

use super::Pattern;
use crate::brightness::{MAX_PERCENT, MIN_PERCENT};
use crate::clock::FrameClock;
use crate::config::StackingConfig;
use crate::context::LightContext;
use crate::error::PlayError;
use crate::ChannelSink;

#[derive(Debug, Clone)]
pub struct StackingPattern {
    config: StackingConfig,
}

impl StackingPattern {
    pub const fn new(config: StackingConfig) -> Self {
        Self { config }
    }
}

impl Pattern for StackingPattern {
    fn play<S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize>(
        &self,
        ctx: &mut LightContext<'_, S, C, MAX_CHANNELS>,
    ) -> Result<(), PlayError> {
        let config = &self.config;
        ctx.clear_all()?;

        for channel in 0..ctx.channel_count() {
            ctx.fade(channel, MIN_PERCENT, MAX_PERCENT, config.fade_in, config.steps)?;
            ctx.wait(config.delay)?;
        }

        ctx.wait(config.hold)?;
        ctx.fade_all(MAX_PERCENT, MIN_PERCENT, config.fade_out, config.steps)?;
        ctx.wait(config.rest)
    }
}
