#![deny(unsafe_code)]
#![deny(warnings)]
//! STM32 internal RTC, clocked from the 32.768 kHz LSE
//!
//! The RTC holds UTC. The hardware keeps a day-of-week register, so it is
//! filled in from the calendar on every write.

use defmt::Format;
use digiclock_core::calendar::{self, Weekday};
use digiclock_hal::{DateTime, RealTimeClock};
use embassy_stm32::rtc::{self, DayOfWeek, Rtc};

/// RTC operation errors
#[derive(Debug, Clone, Copy, Format)]
pub enum RtcError {
    /// Date rejected by the hardware calendar (e.g. Feb 30)
    InvalidDate,
    /// RTC hardware error
    HardwareError,
}

impl core::fmt::Display for RtcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDate => write!(f, "Invalid date"),
            Self::HardwareError => write!(f, "RTC hardware error"),
        }
    }
}

impl core::error::Error for RtcError {}

/// [`RealTimeClock`] over the embassy-stm32 RTC driver
pub struct StmRtc {
    rtc: Rtc,
}

impl StmRtc {
    pub fn new(rtc: Rtc) -> Self {
        Self { rtc }
    }
}

fn day_of_week(weekday: Weekday) -> DayOfWeek {
    match weekday {
        Weekday::Monday => DayOfWeek::Monday,
        Weekday::Tuesday => DayOfWeek::Tuesday,
        Weekday::Wednesday => DayOfWeek::Wednesday,
        Weekday::Thursday => DayOfWeek::Thursday,
        Weekday::Friday => DayOfWeek::Friday,
        Weekday::Saturday => DayOfWeek::Saturday,
        Weekday::Sunday => DayOfWeek::Sunday,
    }
}

impl RealTimeClock for StmRtc {
    type Error = RtcError;

    fn set_datetime(&mut self, dt: DateTime) -> Result<(), Self::Error> {
        if dt.day > calendar::days_in_month(dt.year, dt.month) {
            return Err(RtcError::InvalidDate);
        }
        let hw = rtc::DateTime::from(
            dt.year,
            dt.month,
            dt.day,
            day_of_week(calendar::weekday(&dt)),
            dt.hour,
            dt.minute,
            dt.second,
            0, // microsecond
        )
        .map_err(|_| RtcError::InvalidDate)?;
        self.rtc
            .set_datetime(hw)
            .map_err(|_| RtcError::HardwareError)
    }

    fn now(&mut self) -> Result<DateTime, Self::Error> {
        let hw = self.rtc.now().map_err(|_| RtcError::HardwareError)?;
        DateTime::new(
            hw.year(),
            hw.month(),
            hw.day(),
            hw.hour(),
            hw.minute(),
            hw.second(),
        )
        .map_err(|_| RtcError::HardwareError)
    }
}
