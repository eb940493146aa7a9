//! Brightness to duty mapping
//!
//! The mapper is the only component that talks to the [`ChannelSink`]. It keeps
//! the last applied percentage for every active channel so callers can observe
//! the light state without reading hardware back.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{ChannelSink, error::HardwareError};

/// Full-scale duty value of a 16-bit PWM output
pub const MAX_DUTY: u16 = u16::MAX;

/// Lowest brightness percentage
pub const MIN_PERCENT: f32 = 0.0;

/// Highest brightness percentage
pub const MAX_PERCENT: f32 = 100.0;

/// How a brightness percentage maps onto a duty value.
///
/// Both conventions are linear. Installations wired with the LED on the low
/// side of the output (sinking) need `Inverted`, where full brightness means
/// zero duty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DutyPolarity {
    /// `duty = percent / 100 * 65535`
    Direct,
    /// `duty = (1 - percent / 100) * 65535`
    #[default]
    Inverted,
}

impl DutyPolarity {
    /// Convert a brightness percentage to a duty value.
    ///
    /// The percentage is clamped first; the product is truncated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn duty(self, percent: f32) -> u16 {
        let fraction = clamp_percent(percent) / MAX_PERCENT;
        let level = match self {
            Self::Direct => fraction,
            Self::Inverted => 1.0 - fraction,
        };
        (level * f32::from(MAX_DUTY)) as u16
    }
}

/// Clamp a percentage into `[0, 100]`. NaN maps to 0.
pub fn clamp_percent(percent: f32) -> f32 {
    if percent.is_nan() {
        return MIN_PERCENT;
    }
    percent.clamp(MIN_PERCENT, MAX_PERCENT)
}

/// Converts percentages to duty values and forwards them to the sink
#[derive(Debug)]
pub struct BrightnessMapper<S: ChannelSink, const MAX_CHANNELS: usize> {
    sink: S,
    polarity: DutyPolarity,
    channel_count: u8,
    levels: [f32; MAX_CHANNELS],
}

impl<S: ChannelSink, const MAX_CHANNELS: usize> BrightnessMapper<S, MAX_CHANNELS> {
    /// Create a mapper over the first `channel_count` outputs of `sink`.
    ///
    /// The count is expected to be validated by
    /// [`AnimationConfig::validate`](crate::AnimationConfig::validate); larger
    /// values are capped to `MAX_CHANNELS`.
    pub fn new(sink: S, polarity: DutyPolarity, channel_count: u8) -> Self {
        let capacity = u8::try_from(MAX_CHANNELS).unwrap_or(u8::MAX);
        Self {
            sink,
            polarity,
            channel_count: channel_count.min(capacity),
            levels: [MIN_PERCENT; MAX_CHANNELS],
        }
    }

    /// Apply a brightness percentage to one channel.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is not below the configured channel count.
    pub fn set_brightness(&mut self, channel: u8, percent: f32) -> Result<(), HardwareError> {
        assert!(
            channel < self.channel_count,
            "channel {} out of range (0..{})",
            channel,
            self.channel_count
        );
        let percent = clamp_percent(percent);
        let duty = self.polarity.duty(percent);
        self.sink.write(channel, duty).inspect_err(|_error| {
            #[cfg(feature = "esp32-log")]
            println!(
                "[BrightnessMapper.set_brightness] write to channel {} failed: {}",
                channel, _error
            );
        })?;
        self.levels[usize::from(channel)] = percent;
        Ok(())
    }

    /// Last brightness applied to `channel`
    pub fn brightness(&self, channel: u8) -> f32 {
        self.levels()[usize::from(channel)]
    }

    /// Brightness of every active channel, in channel order
    pub fn levels(&self) -> &[f32] {
        &self.levels[..usize::from(self.channel_count)]
    }

    pub const fn channel_count(&self) -> u8 {
        self.channel_count
    }

    pub const fn polarity(&self) -> DutyPolarity {
        self.polarity
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
