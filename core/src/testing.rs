//! Fakes of the capability traits for host tests
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::vec::Vec;

use digiclock_hal::{
    Brightness, DateTime, NetworkLink, RealTimeClock, SegmentDisplay, TimeSource, Timestamp,
};
use embedded_hal::digital::{self, ErrorType, InputPin};
use embedded_hal_async::delay::DelayNs;

use crate::config::ClockConfig;
use crate::format::DisplayText;
use crate::mode::ModeSwitches;
use crate::resync::UpdateGate;
use crate::DigiClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError;

impl digital::Error for FakeError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Input pin whose level can be changed after it was handed over
#[derive(Clone)]
pub struct FakePin {
    /// `None` makes every read fail
    level_low: Rc<Cell<Option<bool>>>,
}

impl FakePin {
    pub fn low() -> Self {
        Self {
            level_low: Rc::new(Cell::new(Some(true))),
        }
    }

    pub fn high() -> Self {
        Self {
            level_low: Rc::new(Cell::new(Some(false))),
        }
    }

    pub fn broken() -> Self {
        Self {
            level_low: Rc::new(Cell::new(None)),
        }
    }

    pub fn set_low(&self, low: bool) {
        self.level_low.set(Some(low));
    }
}

impl ErrorType for FakePin {
    type Error = FakeError;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.level_low.get().ok_or(FakeError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Init,
    Text(DisplayText),
    Brightness(u8),
}

#[derive(Default)]
pub struct FakeDisplay {
    pub events: Vec<DisplayEvent>,
    pub fail_init: bool,
    pub fail_writes: bool,
}

impl FakeDisplay {
    pub fn texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.texts().last().copied()
    }
}

impl SegmentDisplay for FakeDisplay {
    type Error = FakeError;

    fn init(&mut self) -> Result<(), Self::Error> {
        if self.fail_init {
            return Err(FakeError);
        }
        self.events.push(DisplayEvent::Init);
        Ok(())
    }

    fn set_text(&mut self, text: &str) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(FakeError);
        }
        let mut t = DisplayText::new();
        t.push_str(text).map_err(|_| FakeError)?;
        self.events.push(DisplayEvent::Text(t));
        Ok(())
    }

    fn set_brightness(&mut self, brightness: Brightness) -> Result<(), Self::Error> {
        self.events.push(DisplayEvent::Brightness(brightness.level()));
        Ok(())
    }
}

/// Link that comes up after a number of failed polls, or never
pub struct FakeLink {
    pub connect_after_polls: Option<u32>,
    pub polls: u32,
    pub begun: bool,
}

impl FakeLink {
    pub fn up_after(polls: u32) -> Self {
        Self {
            connect_after_polls: Some(polls),
            polls: 0,
            begun: false,
        }
    }

    pub fn never_up() -> Self {
        Self {
            connect_after_polls: None,
            polls: 0,
            begun: false,
        }
    }
}

impl NetworkLink for FakeLink {
    fn begin(&mut self) {
        self.begun = true;
    }

    fn is_connected(&mut self) -> bool {
        self.polls += 1;
        self.connect_after_polls.is_some_and(|n| self.polls > n)
    }
}

pub struct FakeTimeSource {
    pub next: Result<Timestamp, FakeError>,
    /// All `update` and `force_update` calls
    pub fetches: u32,
    pub forced: u32,
    pub begun: bool,
    pub interval_ms: Option<u64>,
}

impl FakeTimeSource {
    pub fn returning(unix_secs: u64) -> Self {
        Self {
            next: Ok(Timestamp::new(unix_secs, 0)),
            fetches: 0,
            forced: 0,
            begun: false,
            interval_ms: None,
        }
    }
}

impl TimeSource for FakeTimeSource {
    type Error = FakeError;

    fn begin(&mut self) {
        self.begun = true;
    }

    async fn update(&mut self) -> Result<Timestamp, Self::Error> {
        self.fetches += 1;
        self.next
    }

    async fn force_update(&mut self) -> Result<Timestamp, Self::Error> {
        self.forced += 1;
        self.update().await
    }

    fn set_update_interval(&mut self, interval_ms: u64) {
        self.interval_ms = Some(interval_ms);
    }
}

/// Time source that goes through an [`UpdateGate`] like the SNTP client
///
/// Monotonic time and the network's answer are set from the test; only real
/// round trips are counted.
pub struct GatedTimeSource {
    pub gate: UpdateGate,
    pub now_ms: u64,
    pub network_unix: u64,
    pub round_trips: u32,
}

impl GatedTimeSource {
    pub fn new(network_unix: u64) -> Self {
        Self {
            gate: UpdateGate::default(),
            now_ms: 0,
            network_unix,
            round_trips: 0,
        }
    }
}

impl TimeSource for GatedTimeSource {
    type Error = FakeError;

    fn begin(&mut self) {}

    async fn update(&mut self) -> Result<Timestamp, Self::Error> {
        match self.gate.cached(self.now_ms) {
            Some(timestamp) => Ok(timestamp),
            None => self.force_update().await,
        }
    }

    async fn force_update(&mut self) -> Result<Timestamp, Self::Error> {
        self.round_trips += 1;
        let timestamp = Timestamp::new(self.network_unix, 0);
        self.gate.record(self.now_ms, timestamp);
        Ok(timestamp)
    }

    fn set_update_interval(&mut self, interval_ms: u64) {
        self.gate.set_interval(interval_ms);
    }
}

/// RTC holding a settable UTC value; reads return it unchanged
pub struct FakeRtc {
    pub now: DateTime,
    pub writes: Vec<DateTime>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FakeRtc {
    pub fn at(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            now: utc(2024, 3, 10, hour, minute, second),
            writes: Vec::new(),
            fail_reads: false,
            fail_writes: false,
        }
    }
}

impl RealTimeClock for FakeRtc {
    type Error = FakeError;

    fn set_datetime(&mut self, datetime: DateTime) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(FakeError);
        }
        self.now = datetime;
        self.writes.push(datetime);
        Ok(())
    }

    fn now(&mut self) -> Result<DateTime, Self::Error> {
        if self.fail_reads {
            return Err(FakeError);
        }
        Ok(self.now)
    }
}

/// Delay that returns immediately and adds up what was requested
#[derive(Default)]
pub struct FakeDelay {
    pub total_ns: u64,
}

impl FakeDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
    }
}

pub type TestClock = DigiClock<FakeDisplay, FakeTimeSource, FakeRtc, FakePin, FakePin>;

pub fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> DateTime {
    DateTime::new(year, month, day, hour, minute, second).unwrap()
}

/// UTC config so RTC values and displayed values line up
pub fn utc_config() -> ClockConfig {
    ClockConfig {
        utc_offset_secs: 0,
        ..ClockConfig::default()
    }
}

/// Clock with the given switch positions; `true` = closed (LOW)
pub fn test_clock(flash_colon: bool, use_24_hour: bool, rtc: FakeRtc) -> TestClock {
    let pin = |closed: bool| if closed { FakePin::low() } else { FakePin::high() };
    DigiClock::new(
        utc_config(),
        FakeDisplay::default(),
        FakeTimeSource::returning(1_710_075_900), // 2024-03-10 13:05:00 UTC
        rtc,
        ModeSwitches::new(pin(flash_colon), pin(use_24_hour)),
    )
}
