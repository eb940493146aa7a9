//! Startup configuration
//!
//! Everything here is fixed for the lifetime of a session. Defaults describe the
//! nine-floor installation the engine was built for.

use core::num::NonZeroU16;

use embassy_time::Duration;

use crate::brightness::DutyPolarity;
use crate::error::ConfigError;
use crate::fader::DEFAULT_FADE_STEPS;

/// Number of floors in the default installation
pub const DEFAULT_CHANNEL_COUNT: u8 = 9;

/// Default pause between two patterns
pub const DEFAULT_PATTERN_PAUSE: Duration = Duration::from_millis(1000);

/// Where the engine observes cancellation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CancelGranularity {
    /// Only before a pattern starts; a running pattern always completes
    #[default]
    BetweenPatterns,
    /// At every frame wait; a running pattern is abandoned
    BetweenFrames,
}

/// Timing of the stacking pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackingConfig {
    /// Fade-in of each channel
    pub fade_in: Duration,
    /// Pause after each channel is lit
    pub delay: Duration,
    /// Pause once every channel is lit
    pub hold: Duration,
    /// Synchronized fade-out of all channels
    pub fade_out: Duration,
    /// Pause after the fade-out
    pub rest: Duration,
    /// Interpolation steps of every fade
    pub steps: NonZeroU16,
}

impl StackingConfig {
    pub const DEFAULT: Self = Self {
        fade_in: Duration::from_millis(500),
        delay: Duration::from_millis(300),
        hold: Duration::from_millis(500),
        fade_out: Duration::from_millis(500),
        rest: Duration::from_millis(500),
        steps: DEFAULT_FADE_STEPS,
    };
}

impl Default for StackingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Shape and speed of the wave pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveConfig {
    /// Pulse half-width in channels
    pub width: f32,
    /// Pulse advance per frame in channels
    pub step: f32,
    /// Frame interval
    pub delay: Duration,
}

impl WaveConfig {
    pub const DEFAULT: Self = Self {
        width: 1.5,
        step: 0.25,
        delay: Duration::from_millis(25),
    };
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Timing of the blink pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkConfig {
    /// Number of on/off cycles
    pub count: u16,
    pub fade_in: Duration,
    /// Pause while lit
    pub hold: Duration,
    pub fade_out: Duration,
    /// Pause while dark
    pub rest: Duration,
    /// Interpolation steps of every fade
    pub steps: NonZeroU16,
}

impl BlinkConfig {
    pub const DEFAULT: Self = Self {
        count: 5,
        fade_in: Duration::from_millis(150),
        hold: Duration::from_millis(300),
        fade_out: Duration::from_millis(150),
        rest: Duration::from_millis(300),
        steps: match NonZeroU16::new(10) {
            Some(steps) => steps,
            None => unreachable!(),
        },
    };
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration of the animation engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Number of active channels, counted from output 0
    pub channel_count: u8,
    pub polarity: DutyPolarity,
    pub granularity: CancelGranularity,
    /// Pause inserted between two patterns
    pub pattern_pause: Duration,
    pub stacking: StackingConfig,
    pub wave: WaveConfig,
    pub blink: BlinkConfig,
}

impl AnimationConfig {
    pub const DEFAULT: Self = Self {
        channel_count: DEFAULT_CHANNEL_COUNT,
        polarity: DutyPolarity::Inverted,
        granularity: CancelGranularity::BetweenPatterns,
        pattern_pause: DEFAULT_PATTERN_PAUSE,
        stacking: StackingConfig::DEFAULT,
        wave: WaveConfig::DEFAULT,
        blink: BlinkConfig::DEFAULT,
    };

    /// Default configuration for `channel_count` channels
    pub const fn with_channels(channel_count: u8) -> Self {
        let mut config = Self::DEFAULT;
        config.channel_count = channel_count;
        config
    }

    /// Check the configuration against an engine with `capacity` channels
    pub fn validate(&self, capacity: usize) -> Result<(), ConfigError> {
        if self.channel_count == 0 {
            return Err(ConfigError::NoChannels);
        }
        if usize::from(self.channel_count) > capacity {
            return Err(ConfigError::TooManyChannels {
                requested: self.channel_count,
                capacity,
            });
        }
        if !(self.wave.width.is_finite() && self.wave.width > 0.0) {
            return Err(ConfigError::InvalidWaveWidth);
        }
        if !(self.wave.step.is_finite() && self.wave.step > 0.0) {
            return Err(ConfigError::InvalidWaveStep);
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
