//! Calendar date/time conversions using O(1) algorithms
//!
//! Implements Howard Hinnant's civil_from_days and days_from_civil algorithms.
//! Reference: http://howardhinnant.github.io/date_algorithms.html
//!
//! The RTC is kept in UTC. Everything shown on the display goes through
//! [`to_local`] with the compiled-in UTC offset first.
//!
//! **Limitations**
//! - Valid range: 1970-2105 (u16 year, u64 seconds)
//! - Fixed offset only, no daylight saving rules
//! - No leap seconds (NTP ignores them too)

use digiclock_hal::DateTime;

const SECONDS_PER_DAY: u64 = 86_400;

/// Days from 0000-03-01 to 1970-01-01
const EPOCH_SHIFT_DAYS: i32 = 719_468;

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    const fn from_days_since_epoch(days: i64) -> Self {
        // 1970-01-01 was a Thursday
        match (days + 3).rem_euclid(7) {
            0 => Self::Monday,
            1 => Self::Tuesday,
            2 => Self::Wednesday,
            3 => Self::Thursday,
            4 => Self::Friday,
            5 => Self::Saturday,
            _ => Self::Sunday,
        }
    }
}

/// Check if year is a leap year (Gregorian calendar)
///
/// - Divisible by 4: leap year
/// - EXCEPT divisible by 100: not a leap year
/// - EXCEPT divisible by 400: leap year
pub fn is_leap_year(year: u16) -> bool {
    (year.is_multiple_of(4) && !year.is_multiple_of(100)) || year.is_multiple_of(400)
}

/// Number of days in `month` (1-12) of `year`
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Convert Unix timestamp to a civil UTC `DateTime`
pub fn unix_to_datetime(unix_secs: u64) -> DateTime {
    let days_since_epoch = (unix_secs / SECONDS_PER_DAY) as i32;
    let secs_today = unix_secs % SECONDS_PER_DAY;

    let (year, month, day) = civil_from_days(days_since_epoch);

    DateTime {
        year,
        month,
        day,
        hour: (secs_today / 3600) as u8,
        minute: ((secs_today % 3600) / 60) as u8,
        second: (secs_today % 60) as u8,
    }
}

/// Convert a civil UTC `DateTime` to a Unix timestamp
///
/// Dates before the epoch clamp to 0.
pub fn datetime_to_unix(dt: &DateTime) -> u64 {
    let days_since_epoch = days_from_civil(dt.year, dt.month, dt.day);
    if days_since_epoch < 0 {
        return 0;
    }

    (days_since_epoch as u64) * SECONDS_PER_DAY
        + (dt.hour as u64) * 3600
        + (dt.minute as u64) * 60
        + (dt.second as u64)
}

/// Day of the week for a civil date
pub fn weekday(dt: &DateTime) -> Weekday {
    Weekday::from_days_since_epoch(days_from_civil(dt.year, dt.month, dt.day) as i64)
}

/// Shift a UTC `DateTime` by a fixed offset in seconds (west of UTC is negative)
///
/// Crosses day, month and year boundaries as needed. Results before the epoch
/// clamp to 1970-01-01 00:00:00.
pub fn to_local(utc: &DateTime, offset_secs: i32) -> DateTime {
    let unix = datetime_to_unix(utc) as i64 + offset_secs as i64;
    unix_to_datetime(unix.max(0) as u64)
}

/// Convert days since Unix epoch to civil date (year, month, day)
fn civil_from_days(days_since_epoch: i32) -> (u16, u8, u8) {
    // Shift epoch to 0000-03-01 so the leap day lands at the end of the year
    let z = days_since_epoch + EPOCH_SHIFT_DAYS;

    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // [0, 399]
    let y = (yoe as i32) + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // 0 = March, 11 = February

    let d = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = if m <= 2 { y + 1 } else { y };

    (year as u16, m, d)
}

/// Convert civil date (year, month, day) to days since Unix epoch
fn days_from_civil(year: u16, month: u8, day: u8) -> i32 {
    let y = year as i32;
    let m = month as i32;
    let d = day as i32;

    // March = month 0, February = month 11
    let (y, m) = if m <= 2 { (y - 1, m + 9) } else { (y, m - 3) };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32; // [0, 399]
    let doy = (153 * (m as u32) + 2) / 5 + (d as u32) - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]

    era * 146097 + (doe as i32) - EPOCH_SHIFT_DAYS
}
