#![no_std]

pub mod brightness;
pub mod cancel;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod fader;
pub mod pattern;
pub mod playlist;
pub mod scheduler;

pub use brightness::{BrightnessMapper, DutyPolarity, MAX_DUTY};
pub use cancel::{CancelHandle, CancelSignal, CancelToken};
pub use clock::{BlockingClock, FrameClock};
pub use config::{AnimationConfig, BlinkConfig, CancelGranularity, StackingConfig, WaveConfig};
pub use context::LightContext;
pub use error::{ConfigError, HardwareError, PlayError};
pub use fader::{Fade, FadeSample};
pub use pattern::{Pattern, PatternId, PatternSlot};
pub use scheduler::{Scheduler, SessionState, SessionStats};

pub use embassy_time::{Duration, Instant};

/// Channel capacity of a 16-output PWM expander
pub const PWM_EXPANDER_CHANNELS: usize = 16;

/// Abstract PWM output trait
///
/// Implement this trait to support different hardware platforms.
/// The engine is generic over this trait. Lifecycle methods are called once at
/// session boundaries and must tolerate repeated calls.
pub trait ChannelSink {
    /// Write a raw duty value to one output
    fn write(&mut self, channel: u8, duty: u16) -> Result<(), HardwareError>;

    /// Prepare the device before the first write
    fn initialize(&mut self) -> Result<(), HardwareError> {
        Ok(())
    }

    /// Return the device to its power-on state
    fn reset(&mut self) -> Result<(), HardwareError> {
        Ok(())
    }

    /// Release the underlying bus
    fn release(&mut self) -> Result<(), HardwareError> {
        Ok(())
    }
}

impl<S: ChannelSink + ?Sized> ChannelSink for &mut S {
    fn write(&mut self, channel: u8, duty: u16) -> Result<(), HardwareError> {
        (**self).write(channel, duty)
    }

    fn initialize(&mut self) -> Result<(), HardwareError> {
        (**self).initialize()
    }

    fn reset(&mut self) -> Result<(), HardwareError> {
        (**self).reset()
    }

    fn release(&mut self) -> Result<(), HardwareError> {
        (**self).release()
    }
}

/// Scheduler sized for a 16-output PWM expander
pub type FloorScheduler<'a, S, C> = Scheduler<'a, S, C, PWM_EXPANDER_CHANNELS>;
