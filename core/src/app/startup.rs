//! Startup sequence
//!
//! Brings the collaborators up in dependency order: switches, display,
//! network link, time source, RTC. Every failure is terminal and reported as a
//! [`StartupError`]; once the display is up, the failure is also shown as
//! `Err`.

use digiclock_hal::{NetworkLink, RealTimeClock, SegmentDisplay, TimeSource};
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use super::tick::ClockContext;
use super::DigiClock;
use crate::error::StartupError;
use crate::format::{format_count, format_time, ClockReading, BLANK_TEXT, ERROR_TEXT};

impl<D, T, C, F, H> DigiClock<D, T, C, F, H>
where
    D: SegmentDisplay,
    T: TimeSource,
    C: RealTimeClock,
    F: InputPin,
    H: InputPin,
{
    /// Run the startup sequence and return the loop state
    pub async fn start<L, Y>(
        &mut self,
        link: &mut L,
        delay: &mut Y,
    ) -> Result<ClockContext, StartupError>
    where
        L: NetworkLink,
        Y: DelayNs,
    {
        let modes = self.switches.read();
        info!(
            "Mode switches: flash_colon={}, 24-hour={}",
            modes.flash_colon, modes.use_24_hour
        );

        if self.display.init().is_err() {
            // display unusable, the log is the only channel left
            error!("Digital Clock Error!");
            return Err(StartupError::DisplayInit);
        }
        self.show(BLANK_TEXT);
        if self.display.set_brightness(self.config.brightness).is_err() {
            warn!("Failed to set display brightness");
        }

        info!("Connecting to network...");
        link.begin();
        let mut attempts: u16 = 0;
        while !link.is_connected() {
            attempts = attempts.saturating_add(1);
            delay.delay_ms(self.config.link_poll_interval_ms).await;
            self.show(&format_count(attempts));
            if attempts > self.config.max_link_polls {
                return Err(self.fail(StartupError::NetworkTimeout { attempts }));
            }
        }
        info!("Network connected after {} polls", attempts);

        self.time_source.begin();
        let fetched = match self.time_source.update().await {
            Ok(ts) => ts,
            Err(_) => return Err(self.fail(StartupError::TimeSync)),
        };
        info!("Network time: {} UTC", fetched.unix_secs);

        if self.set_clock(fetched).is_err() {
            return Err(self.fail(StartupError::Clock));
        }
        let reading = match self.local_now() {
            Ok(now) => ClockReading::from(&now),
            Err(_) => return Err(self.fail(StartupError::Clock)),
        };
        self.show(&format_time(&reading, modes.hour_mode(), true));

        // network round trips at most hourly from here on
        self.time_source
            .set_update_interval(self.config.resync_interval_ms);

        info!("Startup complete at {}:{}", reading.hour, reading.minute);
        Ok(ClockContext::new(modes, reading.hour))
    }

    fn fail(&mut self, err: StartupError) -> StartupError {
        self.show(ERROR_TEXT);
        error!("Startup failed: {}", err);
        err
    }
}
