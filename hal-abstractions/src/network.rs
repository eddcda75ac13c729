//! Network link and network time source capabilities

use core::future::Future;

/// Timestamp with microsecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// Unix timestamp in seconds since epoch (1970-01-01 00:00:00 UTC)
    pub unix_secs: u64,
    /// Microseconds component (0-999,999)
    pub micros: u32,
}

impl Timestamp {
    /// NTP epoch offset (1900-01-01 to 1970-01-01 in seconds)
    pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

    /// Create a new timestamp
    pub const fn new(unix_secs: u64, micros: u32) -> Self {
        Self { unix_secs, micros }
    }

    /// Convert from NTP timestamp (seconds since 1900-01-01)
    pub fn from_ntp(ntp_secs: u64, ntp_frac: u32) -> Self {
        let unix_secs = ntp_secs.saturating_sub(Self::NTP_UNIX_OFFSET);
        // NTP fraction is in units of 2^-32 seconds
        let micros = ((ntp_frac as u64 * 1_000_000) >> 32) as u32;
        Self::new(unix_secs, micros)
    }

    /// Advance by a number of milliseconds, carrying into seconds
    pub fn add_millis(self, millis: u64) -> Self {
        let total_micros = self.micros as u64 + (millis % 1000) * 1000;
        Self {
            unix_secs: self
                .unix_secs
                .saturating_add(millis / 1000 + total_micros / 1_000_000),
            micros: (total_micros % 1_000_000) as u32,
        }
    }
}

/// Network association (WiFi, Ethernet + DHCP, ...)
///
/// Association happens in the background once [`begin`](Self::begin) has been
/// called; the clock only polls [`is_connected`](Self::is_connected).
pub trait NetworkLink {
    /// Start associating with the network using the compiled-in settings
    fn begin(&mut self);

    /// `true` once the link is usable for a time fetch
    fn is_connected(&mut self) -> bool;
}

/// Source of current UTC time over the network
pub trait TimeSource {
    /// Fetch error type
    type Error;

    /// Prepare the client (sockets, server list); called once after the link is up
    fn begin(&mut self);

    /// Return current UTC time
    ///
    /// Implementations may answer from their last successful sync when it is
    /// younger than the configured update interval.
    fn update(&mut self) -> impl Future<Output = Result<Timestamp, Self::Error>>;

    /// Go to the network now, whatever the update interval says
    fn force_update(&mut self) -> impl Future<Output = Result<Timestamp, Self::Error>>;

    /// Minimum time between two network round trips, in milliseconds
    fn set_update_interval(&mut self, interval_ms: u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntp_to_unix_conversion() {
        let ts = Timestamp::from_ntp(Timestamp::NTP_UNIX_OFFSET, 0);
        assert_eq!(ts.unix_secs, 0);
        assert_eq!(ts.micros, 0);
    }

    #[test]
    fn test_ntp_fraction_half_second() {
        let ts = Timestamp::from_ntp(Timestamp::NTP_UNIX_OFFSET + 10, 0x8000_0000);
        assert_eq!(ts.unix_secs, 10);
        assert_eq!(ts.micros, 500_000);
    }

    #[test]
    fn test_timestamp_creation() {
        let ts = Timestamp::new(1704067200, 500000);
        assert_eq!(ts.unix_secs, 1704067200);
        assert_eq!(ts.micros, 500000);
    }

    #[test]
    fn test_add_millis_carries() {
        let ts = Timestamp::new(100, 900_000).add_millis(1_250);
        assert_eq!(ts, Timestamp::new(102, 150_000));
    }
}
