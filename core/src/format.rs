//! Time formatter
//!
//! Renders a clock reading the way the 4-digit unit shows it: `HH:MM` or
//! `HHMM`, with a leading `0` blanked. The unit has no AM/PM glyph, so 12-hour
//! mode carries no indicator.

use core::fmt::{self, Write};

use digiclock_hal::DateTime;

/// Capacity of the display text buffer
pub const DISPLAY_CAPACITY: usize = 8;

/// Text sent to the display, always within [`DISPLAY_CAPACITY`]
pub type DisplayText = heapless::String<DISPLAY_CAPACITY>;

/// Shown on fail-stop after the display came up
pub const ERROR_TEXT: &str = "Err";

/// Blank startup screen
pub const BLANK_TEXT: &str = "    ";

/// 12- or 24-hour rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourMode {
    /// 1-12, strftime `%I`
    TwelveHour,
    /// 0-23, strftime `%H`
    TwentyFourHour,
}

impl HourMode {
    pub const fn from_24_hour_flag(use_24_hour: bool) -> Self {
        if use_24_hour {
            Self::TwentyFourHour
        } else {
            Self::TwelveHour
        }
    }

    /// Hour as displayed; midnight and noon are 12 in 12-hour mode
    pub const fn display_hour(self, hour: u8) -> u8 {
        match self {
            Self::TwentyFourHour => hour,
            Self::TwelveHour => match hour % 12 {
                0 => 12,
                h => h,
            },
        }
    }
}

/// Local time of day read from the real-time clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockReading {
    /// 0-23
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockReading {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }
}

impl From<&DateTime> for ClockReading {
    fn from(dt: &DateTime) -> Self {
        Self::new(dt.hour, dt.minute, dt.second)
    }
}

/// Format a reading for the display
///
/// Only the first character is checked: a leading `0` becomes a space in
/// either mode, so `01:05` shows as ` 1:05`.
pub fn format_time(reading: &ClockReading, mode: HourMode, include_colon: bool) -> DisplayText {
    render_time(reading, mode, include_colon).unwrap_or_default()
}

fn render_time(
    reading: &ClockReading,
    mode: HourMode,
    include_colon: bool,
) -> Result<DisplayText, fmt::Error> {
    let hour = mode.display_hour(reading.hour);
    let mut raw = DisplayText::new();
    if include_colon {
        write!(raw, "{:02}:{:02}", hour, reading.minute)?;
    } else {
        write!(raw, "{:02}{:02}", hour, reading.minute)?;
    }

    match raw.strip_prefix('0') {
        Some(rest) => {
            let mut out = DisplayText::new();
            out.push(' ').map_err(|_| fmt::Error)?;
            out.push_str(rest).map_err(|_| fmt::Error)?;
            Ok(out)
        }
        None => Ok(raw),
    }
}

/// Bare decimal counter, as shown while waiting for the network
pub fn format_count(count: u16) -> DisplayText {
    render_count(count).unwrap_or_default()
}

fn render_count(count: u16) -> Result<DisplayText, fmt::Error> {
    // u16 is at most five digits
    let mut out = DisplayText::new();
    write!(out, "{}", count)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(hour: u8, minute: u8, mode: HourMode, colon: bool) -> DisplayText {
        format_time(&ClockReading::new(hour, minute, 0), mode, colon)
    }

    #[test]
    fn test_twenty_four_hour() {
        assert_eq!(show(13, 5, HourMode::TwentyFourHour, true), "13:05");
        assert_eq!(show(13, 5, HourMode::TwentyFourHour, false), "1305");
        assert_eq!(show(23, 59, HourMode::TwentyFourHour, true), "23:59");
    }

    #[test]
    fn test_twelve_hour() {
        assert_eq!(show(13, 5, HourMode::TwelveHour, true), " 1:05");
        assert_eq!(show(13, 5, HourMode::TwelveHour, false), " 105");
        assert_eq!(show(12, 0, HourMode::TwelveHour, true), "12:00");
        assert_eq!(show(22, 10, HourMode::TwelveHour, true), "10:10");
    }

    #[test]
    fn test_midnight_is_twelve_in_twelve_hour_mode() {
        assert_eq!(show(0, 30, HourMode::TwelveHour, true), "12:30");
        assert_eq!(show(0, 30, HourMode::TwelveHour, false), "1230");
    }

    #[test]
    fn test_leading_zero_blanked_in_twenty_four_hour_mode() {
        assert_eq!(show(9, 15, HourMode::TwentyFourHour, true), " 9:15");
        assert_eq!(show(0, 7, HourMode::TwentyFourHour, true), " 0:07");
    }

    #[test]
    fn test_only_first_character_blanked() {
        // minutes keep their zero
        assert_eq!(show(1, 0, HourMode::TwelveHour, false), " 100");
        assert_eq!(show(10, 0, HourMode::TwentyFourHour, true), "10:00");
    }

    #[test]
    fn test_every_hour_both_modes() {
        for hour in 0..24u8 {
            for mode in [HourMode::TwelveHour, HourMode::TwentyFourHour] {
                let first = show(hour, 42, mode, true);
                assert_eq!(first, show(hour, 42, mode, true));
                assert_eq!(first.len(), 5);
                assert!(!first.starts_with('0'));
                assert!(first.ends_with(":42"));

                let shown = mode.display_hour(hour);
                match mode {
                    HourMode::TwentyFourHour => assert_eq!(shown, hour),
                    HourMode::TwelveHour => {
                        assert!((1..=12).contains(&shown));
                        assert_eq!(shown % 12, hour % 12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1), "1");
        assert_eq!(format_count(31), "31");
        assert_eq!(format_count(u16::MAX), "65535");
    }
}
