//! All-floor blink pattern

use super::Pattern;
use crate::brightness::{MAX_PERCENT, MIN_PERCENT};
use crate::clock::FrameClock;
use crate::config::BlinkConfig;
use crate::context::LightContext;
use crate::error::PlayError;
use crate::ChannelSink;

/// Fades every floor in and out together, `count` times.
///
/// A count of zero is a valid no-op: nothing is written and no time passes.
#[derive(Debug, Clone)]
pub struct BlinkPattern {
    config: BlinkConfig,
}

impl BlinkPattern {
    pub const fn new(config: BlinkConfig) -> Self {
        Self { config }
    }
}

impl Pattern for BlinkPattern {
    fn play<S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize>(
        &self,
        ctx: &mut LightContext<'_, S, C, MAX_CHANNELS>,
    ) -> Result<(), PlayError> {
        let config = &self.config;
        for _ in 0..config.count {
            ctx.fade_all(MIN_PERCENT, MAX_PERCENT, config.fade_in, config.steps)?;
            ctx.wait(config.hold)?;
            ctx.fade_all(MAX_PERCENT, MIN_PERCENT, config.fade_out, config.steps)?;
            ctx.wait(config.rest)?;
        }
        Ok(())
    }
}
