//! Pattern system with compile-time known pattern variants
//!
//! All patterns are stored in an enum to avoid heap allocations.
//! Each pattern implements the `Pattern` trait.

mod blink;
mod stacking;
mod wave;

pub use blink::BlinkPattern;
pub use stacking::StackingPattern;
pub use wave::{WavePattern, pulse_brightness};

use crate::clock::FrameClock;
use crate::config::AnimationConfig;
use crate::context::LightContext;
use crate::error::PlayError;
use crate::ChannelSink;

const PATTERN_NAME_STACKING: &str = "stacking";
const PATTERN_NAME_WAVE: &str = "wave";
const PATTERN_NAME_BLINK: &str = "blink";

const PATTERN_ID_STACKING: u8 = 0;
const PATTERN_ID_WAVE: u8 = 1;
const PATTERN_ID_BLINK: u8 = 2;

pub trait Pattern {
    /// Play the whole animation, writing frames through `ctx`
    fn play<S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize>(
        &self,
        ctx: &mut LightContext<'_, S, C, MAX_CHANNELS>,
    ) -> Result<(), PlayError>;
}

/// Pattern slot - enum containing all possible patterns
#[derive(Debug, Clone)]
pub enum PatternSlot {
    /// Floors light up one after another
    Stacking(StackingPattern),
    /// A soft pulse travels up and down
    Wave(WavePattern),
    /// All floors blink together
    Blink(BlinkPattern),
}

/// Known pattern ids
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternId {
    Stacking = PATTERN_ID_STACKING,
    Wave = PATTERN_ID_WAVE,
    Blink = PATTERN_ID_BLINK,
}

impl PatternId {
    /// Default rotation order
    pub const ALL: [Self; 3] = [Self::Stacking, Self::Wave, Self::Blink];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_STACKING => Self::Stacking,
            PATTERN_ID_WAVE => Self::Wave,
            PATTERN_ID_BLINK => Self::Blink,
            _ => return None,
        })
    }

    pub fn to_slot(self, config: &AnimationConfig) -> PatternSlot {
        match self {
            Self::Stacking => PatternSlot::Stacking(StackingPattern::new(config.stacking)),
            Self::Wave => PatternSlot::Wave(WavePattern::new(config.wave)),
            Self::Blink => PatternSlot::Blink(BlinkPattern::new(config.blink)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stacking => PATTERN_NAME_STACKING,
            Self::Wave => PATTERN_NAME_WAVE,
            Self::Blink => PATTERN_NAME_BLINK,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PATTERN_NAME_STACKING => Some(Self::Stacking),
            PATTERN_NAME_WAVE => Some(Self::Wave),
            PATTERN_NAME_BLINK => Some(Self::Blink),
            _ => None,
        }
    }
}

impl PatternSlot {
    /// Play the pattern in this slot
    pub fn play<S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize>(
        &self,
        ctx: &mut LightContext<'_, S, C, MAX_CHANNELS>,
    ) -> Result<(), PlayError> {
        match self {
            Self::Stacking(pattern) => pattern.play(ctx),
            Self::Wave(pattern) => pattern.play(ctx),
            Self::Blink(pattern) => pattern.play(ctx),
        }
    }

    /// Get the pattern ID for external observation
    pub fn id(&self) -> PatternId {
        match self {
            Self::Stacking(_) => PatternId::Stacking,
            Self::Wave(_) => PatternId::Wave,
            Self::Blink(_) => PatternId::Blink,
        }
    }
}
