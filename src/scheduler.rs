//! Pattern scheduling and session teardown.
//!
//! The scheduler owns the [`LightContext`] for the whole session and plays the
//! playlist in a loop until cancellation is requested or the hardware fails.
//! Either way the session ends through [`Scheduler::teardown`], which forces
//! every channel dark and releases the sink exactly once.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::brightness::{BrightnessMapper, MIN_PERCENT};
use crate::cancel::CancelToken;
use crate::clock::FrameClock;
use crate::config::AnimationConfig;
use crate::context::LightContext;
use crate::error::{ConfigError, HardwareError, PlayError};
use crate::pattern::PatternId;
use crate::playlist::{MAX_PLAYLIST_LEN, Playlist};
use crate::ChannelSink;

/// Lifecycle of an animation session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, sink not initialized yet
    Idle,
    /// Sink initialized, patterns playing
    Running,
    /// Forcing channels dark and releasing the sink
    Cancelling,
    /// Sink released; terminal
    Stopped,
}

/// Counters for external observation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Patterns that ran to completion
    pub patterns_played: u32,
    /// Completed passes over the playlist
    pub cycles: u32,
}

/// Plays patterns in rotation until cancelled
pub struct Scheduler<'a, S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize> {
    // External dependencies and configuration
    ctx: LightContext<'a, S, C, MAX_CHANNELS>,
    config: AnimationConfig,

    // Internal state
    playlist: Playlist<MAX_PLAYLIST_LEN>,
    state: SessionState,
    current: Option<PatternId>,
    stats: SessionStats,
}

impl<'a, S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize>
    Scheduler<'a, S, C, MAX_CHANNELS>
{
    /// Create a scheduler playing the default rotation (stacking, wave, blink)
    pub fn new(
        sink: S,
        clock: C,
        cancel: CancelToken<'a>,
        config: &AnimationConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_playlist(sink, clock, cancel, config, &PatternId::ALL)
    }

    /// Create a scheduler playing `playlist` in order
    pub fn with_playlist(
        sink: S,
        clock: C,
        cancel: CancelToken<'a>,
        config: &AnimationConfig,
        playlist: &[PatternId],
    ) -> Result<Self, ConfigError> {
        config.validate(MAX_CHANNELS)?;
        if playlist.is_empty() {
            return Err(ConfigError::EmptyPlaylist);
        }
        let playlist = Playlist::from_slice(playlist).map_err(|_| {
            ConfigError::PlaylistTooLong {
                capacity: MAX_PLAYLIST_LEN,
            }
        })?;

        let mapper = BrightnessMapper::new(sink, config.polarity, config.channel_count);
        Ok(Self {
            ctx: LightContext::new(mapper, clock, cancel, config.granularity),
            config: *config,
            playlist,
            state: SessionState::Idle,
            current: None,
            stats: SessionStats::default(),
        })
    }

    /// Run the rotation until cancellation is observed.
    ///
    /// Cancellation is checked before every pattern (and, with frame
    /// granularity, at every frame). Returns `Ok(())` after a cancelled
    /// session was torn down. On a hardware failure the session is torn down
    /// best-effort and the original error is returned.
    pub fn run(&mut self) -> Result<(), HardwareError> {
        self.start()?;

        loop {
            if self.ctx.is_cancelled() {
                break;
            }
            let Some(id) = self.playlist.current() else {
                break;
            };

            match self.play_pattern(id) {
                Ok(()) => {}
                Err(PlayError::Cancelled) => break,
                // Already torn down by `play_pattern`
                Err(PlayError::Hardware(error)) => return Err(error),
            }

            if self.playlist.advance() {
                self.stats.cycles += 1;
            }
            if self.ctx.is_cancelled() || self.ctx.wait(self.config.pattern_pause).is_err() {
                break;
            }
        }

        #[cfg(feature = "esp32-log")]
        println!("[Scheduler.run] cancellation observed, stopping");
        self.teardown()
    }

    /// Play one pattern outside of the rotation.
    ///
    /// Initializes the sink first if the session has not started yet.
    pub fn play(&mut self, id: PatternId) -> Result<(), PlayError> {
        self.start()?;
        self.play_pattern(id)
    }

    /// Force every channel dark, then reset and release the sink.
    ///
    /// Every step is attempted even if an earlier one fails; the first error is
    /// returned. Calling this on a stopped session does nothing.
    pub fn teardown(&mut self) -> Result<(), HardwareError> {
        if self.state == SessionState::Stopped {
            return Ok(());
        }
        self.state = SessionState::Cancelling;

        let mut result = Ok(());
        for channel in 0..self.ctx.channel_count() {
            result = result.and(self.ctx.set_brightness(channel, MIN_PERCENT));
        }
        let sink = self.ctx.mapper_mut().sink_mut();
        result = result.and(sink.reset());
        result = result.and(sink.release());

        self.state = SessionState::Stopped;
        #[cfg(feature = "esp32-log")]
        println!("[Scheduler.teardown] sink released: {:?}", result);
        result
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Pattern that was cut short by a hardware failure or a frame-level
    /// cancellation, if any. Cleared whenever a pattern completes.
    pub const fn current_pattern(&self) -> Option<PatternId> {
        self.current
    }

    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    pub const fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn playlist(&self) -> &[PatternId] {
        self.playlist.as_slice()
    }

    pub const fn context(&self) -> &LightContext<'a, S, C, MAX_CHANNELS> {
        &self.ctx
    }

    /// Initialize the sink on the first call
    fn start(&mut self) -> Result<(), HardwareError> {
        match self.state {
            SessionState::Running => Ok(()),
            SessionState::Cancelling | SessionState::Stopped => Err(HardwareError::Released),
            SessionState::Idle => {
                if let Err(error) = self.ctx.mapper_mut().sink_mut().initialize() {
                    return Err(self.abort(error));
                }
                self.ctx.clock_mut().restart();
                self.state = SessionState::Running;
                Ok(())
            }
        }
    }

    fn play_pattern(&mut self, id: PatternId) -> Result<(), PlayError> {
        #[cfg(feature = "esp32-log")]
        println!("Mode: {}", id.as_str());

        self.current = Some(id);
        let result = id.to_slot(&self.config).play(&mut self.ctx);

        match result {
            Ok(()) => {
                self.current = None;
                self.stats.patterns_played += 1;
                Ok(())
            }
            Err(PlayError::Hardware(error)) => Err(PlayError::Hardware(self.abort(error))),
            Err(PlayError::Cancelled) => Err(PlayError::Cancelled),
        }
    }

    /// Tear down after a hardware failure, keeping the original error
    fn abort(&mut self, error: HardwareError) -> HardwareError {
        #[cfg(feature = "esp32-log")]
        println!("[Scheduler] hardware failure: {}, tearing down", error);
        let _ = self.teardown();
        error
    }
}

impl<S: ChannelSink, C: FrameClock, const MAX_CHANNELS: usize> Drop
    for Scheduler<'_, S, C, MAX_CHANNELS>
{
    fn drop(&mut self) {
        if matches!(
            self.state,
            SessionState::Running | SessionState::Cancelling
        ) {
            let _ = self.teardown();
        }
    }
}
