mod common;

mod tests {
    use core::num::NonZeroU16;

    use floor_light_composer::{
        AnimationConfig, CancelGranularity, CancelSignal, ConfigError, Duration, DutyPolarity,
        HardwareError, MAX_DUTY, PatternId, PlayError, Scheduler, SessionState, WaveConfig,
    };

    use crate::common::{RecordingSink, VirtualClock};

    fn steps(value: u16) -> NonZeroU16 {
        NonZeroU16::new(value).unwrap()
    }

    /// Small, fast configuration: stacking on 3 floors takes 17 waits
    fn test_config(channels: u8) -> AnimationConfig {
        let mut config = AnimationConfig::with_channels(channels);
        config.stacking.steps = steps(2);
        config.blink.count = 1;
        config.blink.steps = steps(2);
        config.wave = WaveConfig {
            width: 1.0,
            step: 1.0,
            delay: Duration::from_millis(10),
        };
        config
    }

    /// Frame waits of a single pattern played on its own
    fn pattern_waits(id: PatternId, config: &AnimationConfig) -> Vec<Duration> {
        let signal = CancelSignal::new();
        let mut clock = VirtualClock::new();
        let mut scheduler =
            Scheduler::<_, _, 16>::new(RecordingSink::new(), &mut clock, signal.token(), config)
                .unwrap();
        scheduler.play(id).unwrap();
        drop(scheduler);
        clock.waits
    }

    fn all_off(sink: &RecordingSink, channels: usize) -> bool {
        // Default polarity is inverted: dark means full duty
        sink.last_duties(channels)
            .iter()
            .all(|duty| *duty == Some(MAX_DUTY))
    }

    #[test]
    fn test_teardown_after_each_pattern_leaves_channels_dark() {
        for id in PatternId::ALL {
            let signal = CancelSignal::new();
            let mut sink = RecordingSink::new();
            let mut clock = VirtualClock::new();
            let config = test_config(4);
            let mut scheduler =
                Scheduler::<_, _, 16>::new(&mut sink, &mut clock, signal.token(), &config)
                    .unwrap();

            scheduler.play(id).unwrap();
            scheduler.teardown().unwrap();

            assert_eq!(scheduler.state(), SessionState::Stopped);
            assert!(
                scheduler
                    .context()
                    .mapper()
                    .levels()
                    .iter()
                    .all(|level| *level == 0.0)
            );
            drop(scheduler);
            assert!(all_off(&sink, 4), "{} left a channel lit", id.as_str());
            assert_eq!(sink.releases, 1);
        }
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let signal = CancelSignal::new();
        let mut sink = RecordingSink::new();
        let config = test_config(3);
        let mut scheduler =
            Scheduler::<_, _, 16>::new(&mut sink, VirtualClock::new(), signal.token(), &config)
                .unwrap();

        scheduler.play(PatternId::Blink).unwrap();
        assert_eq!(scheduler.teardown(), Ok(()));
        let writes = scheduler.context().mapper().sink().writes.len();
        assert_eq!(scheduler.teardown(), Ok(()));

        assert_eq!(scheduler.context().mapper().sink().writes.len(), writes);
        assert_eq!(scheduler.state(), SessionState::Stopped);
        drop(scheduler);
        assert_eq!(sink.resets, 1);
        assert_eq!(sink.releases, 1);
        assert!(all_off(&sink, 3));
    }

    #[test]
    fn test_cancellation_is_observed_before_next_pattern() {
        let signal = CancelSignal::new();
        let mut sink = RecordingSink::new();
        // Raised during the first frame of the stacking pattern
        let mut clock = VirtualClock::cancelling_at(1, &signal);
        let config = test_config(3);
        let mut scheduler =
            Scheduler::<_, _, 16>::new(&mut sink, &mut clock, signal.token(), &config).unwrap();

        assert_eq!(scheduler.run(), Ok(()));

        assert_eq!(scheduler.stats().patterns_played, 1);
        assert_eq!(scheduler.stats().cycles, 0);
        assert_eq!(scheduler.state(), SessionState::Stopped);
        assert_eq!(scheduler.current_pattern(), None);
        drop(scheduler);
        // Stacking ran to completion, no pause, no further pattern
        assert_eq!(clock.waits.len(), 3 * 4 + 2 + 3);
        assert_eq!(clock.restarts, 1);
        assert!(all_off(&sink, 3));
        assert_eq!(sink.initialized, 1);
        assert_eq!(sink.releases, 1);
    }

    #[test]
    fn test_frame_granularity_stops_mid_pattern() {
        let signal = CancelSignal::new();
        let mut sink = RecordingSink::new();
        let mut clock = VirtualClock::cancelling_at(2, &signal);
        let mut config = test_config(3);
        config.granularity = CancelGranularity::BetweenFrames;
        let mut scheduler =
            Scheduler::<_, _, 16>::new(&mut sink, &mut clock, signal.token(), &config).unwrap();

        assert_eq!(scheduler.run(), Ok(()));

        assert_eq!(scheduler.stats().patterns_played, 0);
        assert_eq!(scheduler.current_pattern(), Some(PatternId::Stacking));
        drop(scheduler);
        assert_eq!(clock.waits.len(), 2);
        assert!(all_off(&sink, 3));
        assert_eq!(sink.releases, 1);
    }

    #[test]
    fn test_rotation_counts_cycles() {
        let signal = CancelSignal::new();
        let mut clock = VirtualClock::cancelling_at(3, &signal);
        let mut config = test_config(2);
        config.blink.count = 0;
        let mut scheduler = Scheduler::<_, _, 16>::with_playlist(
            RecordingSink::new(),
            &mut clock,
            signal.token(),
            &config,
            &[PatternId::Blink],
        )
        .unwrap();

        assert_eq!(scheduler.run(), Ok(()));

        assert_eq!(scheduler.stats().patterns_played, 3);
        assert_eq!(scheduler.stats().cycles, 3);
        drop(scheduler);
        assert_eq!(clock.waits, vec![config.pattern_pause; 3]);
    }

    #[test]
    fn test_default_rotation_order_and_pauses() {
        let mut config = test_config(2);
        config.pattern_pause = Duration::from_millis(777);
        let stacking = pattern_waits(PatternId::Stacking, &config);
        let wave = pattern_waits(PatternId::Wave, &config);
        let blink = pattern_waits(PatternId::Blink, &config);
        assert!(
            [&stacking, &wave, &blink]
                .iter()
                .all(|waits| !waits.contains(&config.pattern_pause))
        );

        // Raised during the first frame of the second wave
        let cancel_at = stacking.len() + wave.len() + blink.len() + stacking.len() + 4 + 1;
        let signal = CancelSignal::new();
        let mut clock = VirtualClock::cancelling_at(cancel_at, &signal);
        let mut scheduler =
            Scheduler::<_, _, 16>::new(RecordingSink::new(), &mut clock, signal.token(), &config)
                .unwrap();

        assert_eq!(scheduler.run(), Ok(()));
        assert_eq!(scheduler.stats().patterns_played, 5);
        assert_eq!(scheduler.stats().cycles, 1);
        drop(scheduler);

        let segments: Vec<&[Duration]> = clock
            .waits
            .split(|wait| *wait == config.pattern_pause)
            .collect();
        assert_eq!(segments, vec![
            stacking.as_slice(),
            wave.as_slice(),
            blink.as_slice(),
            stacking.as_slice(),
            wave.as_slice(),
        ]);
        // Stacking starts with the first floor fading in, blink with all floors
        assert_eq!(stacking[0], config.stacking.fade_in / 2);
        assert_eq!(stacking[3], config.stacking.delay);
        assert!(wave.iter().all(|wait| *wait == config.wave.delay));
        assert_eq!(blink[0], config.blink.fade_in / 2);
        assert_eq!(blink[3], config.blink.hold);
    }

    #[test]
    fn test_cancel_before_run_plays_nothing() {
        let signal = CancelSignal::new();
        signal.handle().cancel();
        let mut sink = RecordingSink::new();
        let config = test_config(5);
        let mut scheduler =
            Scheduler::<_, _, 16>::new(&mut sink, VirtualClock::new(), signal.token(), &config)
                .unwrap();

        assert_eq!(scheduler.run(), Ok(()));
        assert_eq!(scheduler.stats().patterns_played, 0);
        drop(scheduler);
        // Only the teardown writes
        assert_eq!(sink.writes.len(), 5);
        assert!(all_off(&sink, 5));
        assert_eq!(sink.initialized, 1);
        assert_eq!(sink.releases, 1);
    }

    #[test]
    fn test_hardware_failure_tears_down() {
        let signal = CancelSignal::new();
        let mut sink = RecordingSink::failing_on(4);
        let config = test_config(3);
        let mut scheduler =
            Scheduler::<_, _, 16>::new(&mut sink, VirtualClock::new(), signal.token(), &config)
                .unwrap();

        assert_eq!(scheduler.run(), Err(HardwareError::Bus));
        assert_eq!(scheduler.state(), SessionState::Stopped);
        assert_eq!(scheduler.current_pattern(), Some(PatternId::Stacking));
        drop(scheduler);
        assert!(all_off(&sink, 3));
        assert_eq!(sink.resets, 1);
        assert_eq!(sink.releases, 1);
    }

    #[test]
    fn test_teardown_is_best_effort() {
        let signal = CancelSignal::new();
        let mut sink = RecordingSink::failing_from(4);
        let config = test_config(3);
        let mut scheduler =
            Scheduler::<_, _, 16>::new(&mut sink, VirtualClock::new(), signal.token(), &config)
                .unwrap();

        assert_eq!(scheduler.run(), Err(HardwareError::Bus));
        drop(scheduler);
        // Every channel was attempted even though each write failed
        assert_eq!(&sink.writes[sink.writes.len() - 3..], &[
            (0, MAX_DUTY),
            (1, MAX_DUTY),
            (2, MAX_DUTY)
        ]);
        assert_eq!(sink.resets, 1);
        assert_eq!(sink.releases, 1);
    }

    #[test]
    fn test_stopped_session_cannot_play() {
        let signal = CancelSignal::new();
        let config = test_config(3);
        let mut scheduler = Scheduler::<_, _, 16>::new(
            RecordingSink::new(),
            VirtualClock::new(),
            signal.token(),
            &config,
        )
        .unwrap();
        assert_eq!(scheduler.state(), SessionState::Idle);

        scheduler.teardown().unwrap();

        assert_eq!(
            scheduler.play(PatternId::Wave),
            Err(PlayError::Hardware(HardwareError::Released))
        );
        assert_eq!(scheduler.run(), Err(HardwareError::Released));
    }

    #[test]
    fn test_drop_releases_running_session() {
        let signal = CancelSignal::new();
        let mut sink = RecordingSink::new();
        let config = test_config(4);
        let mut scheduler =
            Scheduler::<_, _, 16>::new(&mut sink, VirtualClock::new(), signal.token(), &config)
                .unwrap();

        scheduler.play(PatternId::Stacking).unwrap();
        assert_eq!(scheduler.state(), SessionState::Running);
        drop(scheduler);

        assert!(all_off(&sink, 4));
        assert_eq!(sink.releases, 1);
    }

    #[test]
    fn test_drop_leaves_idle_session_untouched() {
        let signal = CancelSignal::new();
        let mut sink = RecordingSink::new();
        let config = test_config(4);
        let scheduler =
            Scheduler::<_, _, 16>::new(&mut sink, VirtualClock::new(), signal.token(), &config)
                .unwrap();
        drop(scheduler);

        assert!(sink.writes.is_empty());
        assert_eq!(sink.initialized, 0);
        assert_eq!(sink.releases, 0);
    }

    #[test]
    fn test_default_rotation() {
        let signal = CancelSignal::new();
        let scheduler = Scheduler::<_, _, 16>::new(
            RecordingSink::new(),
            VirtualClock::new(),
            signal.token(),
            &AnimationConfig::default(),
        )
        .unwrap();

        assert_eq!(scheduler.playlist(), &PatternId::ALL);
        assert_eq!(scheduler.context().channel_count(), 9);
        assert_eq!(
            scheduler.context().mapper().polarity(),
            DutyPolarity::Inverted
        );
    }

    #[test]
    fn test_invalid_configuration() {
        let signal = CancelSignal::new();
        let build = |config: AnimationConfig| {
            Scheduler::<_, _, 16>::new(
                RecordingSink::new(),
                VirtualClock::new(),
                signal.token(),
                &config,
            )
            .err()
        };

        assert_eq!(
            build(AnimationConfig::with_channels(0)),
            Some(ConfigError::NoChannels)
        );
        assert_eq!(
            build(AnimationConfig::with_channels(17)),
            Some(ConfigError::TooManyChannels {
                requested: 17,
                capacity: 16
            })
        );

        let mut config = AnimationConfig::default();
        config.wave.width = 0.0;
        assert_eq!(build(config), Some(ConfigError::InvalidWaveWidth));

        let mut config = AnimationConfig::default();
        config.wave.step = f32::NAN;
        assert_eq!(build(config), Some(ConfigError::InvalidWaveStep));
    }

    #[test]
    fn test_invalid_playlist() {
        let signal = CancelSignal::new();
        let config = AnimationConfig::default();

        let empty = Scheduler::<_, _, 16>::with_playlist(
            RecordingSink::new(),
            VirtualClock::new(),
            signal.token(),
            &config,
            &[],
        );
        assert_eq!(empty.err(), Some(ConfigError::EmptyPlaylist));

        let too_long = Scheduler::<_, _, 16>::with_playlist(
            RecordingSink::new(),
            VirtualClock::new(),
            signal.token(),
            &config,
            &[PatternId::Wave; 9],
        );
        assert_eq!(
            too_long.err(),
            Some(ConfigError::PlaylistTooLong { capacity: 8 })
        );
    }
}
