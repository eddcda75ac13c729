//! The clock application
//!
//! [`DigiClock`] owns the display, time source, RTC and mode switches. The
//! network link and the delay are borrowed, since the board keeps servicing
//! them while the clock runs.
//!
//! ```ignore
//! let mut clock = DigiClock::new(config, display, sntp, rtc, switches);
//! let err = clock.run(&mut link, &mut delay).await; // only returns on fail-stop
//! ```

mod startup;
mod tick;

pub use tick::{ClockContext, ResyncOutcome, TickReport};

use digiclock_hal::{DateTime, NetworkLink, RealTimeClock, SegmentDisplay, TimeSource, Timestamp};
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::calendar;
use crate::config::ClockConfig;
use crate::error::StartupError;
use crate::mode::ModeSwitches;

pub struct DigiClock<D, T, C, F, H> {
    pub(crate) config: ClockConfig,
    pub(crate) display: D,
    pub(crate) time_source: T,
    pub(crate) rtc: C,
    pub(crate) switches: ModeSwitches<F, H>,
}

impl<D, T, C, F, H> DigiClock<D, T, C, F, H>
where
    D: SegmentDisplay,
    T: TimeSource,
    C: RealTimeClock,
    F: InputPin,
    H: InputPin,
{
    pub fn new(
        config: ClockConfig,
        display: D,
        time_source: T,
        rtc: C,
        switches: ModeSwitches<F, H>,
    ) -> Self {
        Self {
            config,
            display,
            time_source,
            rtc,
            switches,
        }
    }

    /// Start up, then tick forever
    ///
    /// Returns only when startup fails; the caller decides whether to halt or
    /// reset. Tick failures are logged and the loop carries on.
    pub async fn run<L, Y>(&mut self, link: &mut L, delay: &mut Y) -> StartupError
    where
        L: NetworkLink,
        Y: DelayNs,
    {
        let mut ctx = match self.start(link, delay).await {
            Ok(ctx) => ctx,
            Err(err) => return err,
        };
        info!("Clock running, tick every {} ms", self.config.tick_period_ms);

        loop {
            if let Err(e) = self.tick(&mut ctx).await {
                warn!("Tick failed: {}", e);
            }
            delay.delay_ms(self.config.tick_period_ms).await;
        }
    }

    /// Write to the display, logging instead of failing
    fn show(&mut self, text: &str) {
        if self.display.set_text(text).is_err() {
            warn!("Display write failed for \"{}\"", text);
        }
    }

    /// Current local time from the RTC
    fn local_now(&mut self) -> Result<DateTime, C::Error> {
        let utc = self.rtc.now()?;
        Ok(calendar::to_local(&utc, self.config.utc_offset_secs))
    }

    /// Set the RTC (UTC) from a network timestamp, full date included
    fn set_clock(&mut self, timestamp: Timestamp) -> Result<(), C::Error> {
        let utc = calendar::unix_to_datetime(timestamp.unix_secs);
        self.rtc.set_datetime(utc)?;
        debug!(
            "RTC set to {}-{}-{} {}:{}:{} UTC",
            utc.year, utc.month, utc.day, utc.hour, utc.minute, utc.second
        );
        Ok(())
    }
}
