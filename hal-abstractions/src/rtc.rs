//! Real-time clock capability

/// Calendar date and time of day, no timezone
///
/// Fields are range-checked by [`DateTime::new`]; day-of-month is only checked
/// against 1..=31, calendar validity (Feb 30) is left to the RTC driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub year: u16,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

/// A `DateTime` field was out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidDateTime;

impl core::fmt::Display for InvalidDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "date/time field out of range")
    }
}

impl core::error::Error for InvalidDateTime {}

impl DateTime {
    pub const fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, InvalidDateTime> {
        if month == 0 || month > 12 || day == 0 || day > 31 {
            return Err(InvalidDateTime);
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(InvalidDateTime);
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }
}

/// A clock that keeps time on its own between network syncs
pub trait RealTimeClock {
    /// Driver error type
    type Error;

    /// Set the clock; the value is UTC
    fn set_datetime(&mut self, datetime: DateTime) -> Result<(), Self::Error>;

    /// Read the clock (UTC)
    fn now(&mut self) -> Result<DateTime, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_ranges() {
        assert!(DateTime::new(2024, 2, 29, 23, 59, 59).is_ok());
        assert_eq!(DateTime::new(2024, 13, 1, 0, 0, 0), Err(InvalidDateTime));
        assert_eq!(DateTime::new(2024, 1, 0, 0, 0, 0), Err(InvalidDateTime));
        assert_eq!(DateTime::new(2024, 1, 1, 24, 0, 0), Err(InvalidDateTime));
        assert_eq!(DateTime::new(2024, 1, 1, 0, 60, 0), Err(InvalidDateTime));
    }
}
