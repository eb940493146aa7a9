//! Error types shared by the engine

use core::fmt;

/// Failure reported by a [`ChannelSink`](crate::ChannelSink)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// The bus or transport to the PWM device failed
    Bus,
    /// The sink was already released
    Released,
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => f.write_str("PWM bus transfer failed"),
            Self::Released => f.write_str("channel sink already released"),
        }
    }
}

/// Invalid startup configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Channel count is zero
    NoChannels,
    /// Channel count exceeds the engine capacity
    TooManyChannels { requested: u8, capacity: usize },
    /// Wave half-width must be a positive finite number
    InvalidWaveWidth,
    /// Wave advance per frame must be a positive finite number
    InvalidWaveStep,
    /// The pattern rotation has no entries
    EmptyPlaylist,
    /// The pattern rotation has more entries than the scheduler holds
    PlaylistTooLong { capacity: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChannels => f.write_str("at least one channel is required"),
            Self::TooManyChannels {
                requested,
                capacity,
            } => write!(
                f,
                "{} channels requested, engine supports at most {}",
                requested, capacity
            ),
            Self::InvalidWaveWidth => f.write_str("wave width must be greater than zero"),
            Self::InvalidWaveStep => f.write_str("wave step must be greater than zero"),
            Self::EmptyPlaylist => f.write_str("pattern playlist is empty"),
            Self::PlaylistTooLong { capacity } => {
                write!(f, "pattern playlist holds at most {} entries", capacity)
            }
        }
    }
}

/// Reason a pattern stopped before completing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayError {
    /// A channel write failed
    Hardware(HardwareError),
    /// Cancellation was observed at a frame boundary
    Cancelled,
}

impl From<HardwareError> for PlayError {
    fn from(error: HardwareError) -> Self {
        Self::Hardware(error)
    }
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardware(error) => write!(f, "pattern aborted: {}", error),
            Self::Cancelled => f.write_str("pattern cancelled"),
        }
    }
}
