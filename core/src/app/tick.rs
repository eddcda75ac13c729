//! Main loop body: one call per second

use digiclock_hal::{RealTimeClock, SegmentDisplay, TimeSource};
use embedded_hal::digital::InputPin;

use super::DigiClock;
use crate::error::TickError;
use crate::format::{format_time, ClockReading, DisplayText};
use crate::mode::ModeFlags;
use crate::resync::ResyncCheckpoint;

/// Mutable loop state, carried from one tick to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockContext {
    pub modes: ModeFlags,
    /// Colon state for the next tick when flashing
    pub show_colon: bool,
    pub checkpoint: ResyncCheckpoint,
}

impl ClockContext {
    pub const fn new(modes: ModeFlags, start_hour: u8) -> Self {
        Self {
            modes,
            show_colon: true,
            checkpoint: ResyncCheckpoint::new(start_hour),
        }
    }

    /// Colon visibility for this tick; flips the stored state when flashing
    pub fn next_colon(&mut self) -> bool {
        if !self.modes.flash_colon {
            return true;
        }
        let show = self.show_colon;
        self.show_colon = !show;
        show
    }
}

/// Result of an hourly resync attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResyncOutcome {
    /// RTC reset from network time
    Synced,
    /// Fetch failed, RTC left running untouched
    FetchFailed,
    /// Fetch succeeded but the RTC rejected the write
    ClockFailed,
}

/// What a tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Text written to the display
    pub text: DisplayText,
    /// `Some` on the tick that crossed into a new hour
    pub resync: Option<ResyncOutcome>,
}

impl<D, T, C, F, H> DigiClock<D, T, C, F, H>
where
    D: SegmentDisplay,
    T: TimeSource,
    C: RealTimeClock,
    F: InputPin,
    H: InputPin,
{
    /// Resync when the hour changed, then render the time
    pub async fn tick(&mut self, ctx: &mut ClockContext) -> Result<TickReport, TickError> {
        if self.config.reread_modes_each_tick {
            ctx.modes = self.switches.read();
        }

        let hour_now = self.local_now().map_err(|_| TickError::Clock)?.hour;
        let resync = if ctx.checkpoint.observe(hour_now) {
            Some(self.resync().await)
        } else {
            None
        };

        let now = self.local_now().map_err(|_| TickError::Clock)?;
        let reading = ClockReading::from(&now);
        let text = format_time(&reading, ctx.modes.hour_mode(), ctx.next_colon());
        self.display.set_text(&text).map_err(|_| TickError::Display)?;

        Ok(TickReport { text, resync })
    }

    async fn resync(&mut self) -> ResyncOutcome {
        info!("Hour changed, resyncing RTC with network time");
        // the checkpoint already limits this to once per hour
        let fetched = match self.time_source.force_update().await {
            Ok(ts) => ts,
            Err(_) => {
                warn!("Time fetch failed, RTC keeps running unsynced");
                return ResyncOutcome::FetchFailed;
            }
        };

        match self.set_clock(fetched) {
            Ok(()) => {
                info!("RTC resynced: {} UTC", fetched.unix_secs);
                ResyncOutcome::Synced
            }
            Err(_) => {
                warn!("RTC write failed during resync");
                ResyncOutcome::ClockFailed
            }
        }
    }
}
