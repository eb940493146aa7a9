#![allow(dead_code)]

use floor_light_composer::{
    CancelSignal, ChannelSink, Duration, FrameClock, HardwareError,
};

/// In-memory sink that records every write and lifecycle call
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub duties: [Option<u16>; 16],
    pub writes: Vec<(u8, u16)>,
    pub initialized: u32,
    pub resets: u32,
    pub releases: u32,
    /// Fail only the write with this index
    pub fail_on: Option<usize>,
    /// Fail every write from this index on
    pub fail_from: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(index: usize) -> Self {
        Self {
            fail_on: Some(index),
            ..Self::default()
        }
    }

    pub fn failing_from(index: usize) -> Self {
        Self {
            fail_from: Some(index),
            ..Self::default()
        }
    }

    /// Last duty written to each of the first `count` channels
    pub fn last_duties(&self, count: usize) -> Vec<Option<u16>> {
        self.duties[..count].to_vec()
    }
}

impl ChannelSink for RecordingSink {
    fn write(&mut self, channel: u8, duty: u16) -> Result<(), HardwareError> {
        let index = self.writes.len();
        self.writes.push((channel, duty));
        if self.fail_on == Some(index) || self.fail_from.is_some_and(|from| index >= from) {
            return Err(HardwareError::Bus);
        }
        self.duties[usize::from(channel)] = Some(duty);
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), HardwareError> {
        self.initialized += 1;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), HardwareError> {
        self.resets += 1;
        Ok(())
    }

    fn release(&mut self) -> Result<(), HardwareError> {
        self.releases += 1;
        Ok(())
    }
}

/// Clock that records waits instead of sleeping.
///
/// Optionally raises a cancel signal when the n-th wait (1-based) happens.
#[derive(Default)]
pub struct VirtualClock<'a> {
    pub waits: Vec<Duration>,
    pub restarts: usize,
    cancel_at: Option<(usize, &'a CancelSignal)>,
}

impl<'a> VirtualClock<'a> {
    pub fn new() -> Self {
        Self {
            waits: Vec::new(),
            restarts: 0,
            cancel_at: None,
        }
    }

    pub fn cancelling_at(wait: usize, signal: &'a CancelSignal) -> Self {
        Self {
            waits: Vec::new(),
            restarts: 0,
            cancel_at: Some((wait, signal)),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.waits
            .iter()
            .fold(Duration::from_ticks(0), |total, wait| total + *wait)
    }
}

impl FrameClock for VirtualClock<'_> {
    fn wait(&mut self, duration: Duration) {
        self.waits.push(duration);
        if let Some((at, signal)) = self.cancel_at {
            if self.waits.len() == at {
                signal.cancel();
            }
        }
    }

    fn restart(&mut self) {
        self.restarts += 1;
    }
}
