//! Resync cadence
//!
//! Two separate pieces of policy:
//! - [`ResyncCheckpoint`] decides *when the clock asks* for network time: once
//!   per observed change of the local hour.
//! - [`UpdateGate`] decides *when the time client actually goes to the
//!   network*: not more often than its update interval, answering from the
//!   last sync in between.

use digiclock_hal::Timestamp;

/// The hour at which network time was last requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResyncCheckpoint {
    hour: u8,
}

impl ResyncCheckpoint {
    pub const fn new(hour: u8) -> Self {
        Self { hour }
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Record the current hour; `true` when it differs from the checkpoint
    ///
    /// Fires once per transition, repeated calls within the same hour return
    /// `false`.
    pub fn observe(&mut self, hour_now: u8) -> bool {
        if hour_now == self.hour {
            return false;
        }
        self.hour = hour_now;
        true
    }
}

/// Minimum-interval policy for network time requests
///
/// Times are monotonic milliseconds supplied by the caller.
#[derive(Debug, Clone)]
pub struct UpdateGate {
    interval_ms: u64,
    last_sync: Option<(u64, Timestamp)>,
}

impl UpdateGate {
    /// Interval used until the clock finishes startup
    pub const DEFAULT_INTERVAL_MS: u64 = 60_000;

    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sync: None,
        }
    }

    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// `true` if a network round trip should be made now
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_sync {
            None => true,
            Some((synced_at, _)) => now_ms.saturating_sub(synced_at) >= self.interval_ms,
        }
    }

    /// Store a successful sync taken at `now_ms`
    pub fn record(&mut self, now_ms: u64, timestamp: Timestamp) {
        self.last_sync = Some((now_ms, timestamp));
    }

    /// Last sync advanced to `now_ms`, or `None` when a round trip is due
    pub fn cached(&self, now_ms: u64) -> Option<Timestamp> {
        if self.is_due(now_ms) {
            return None;
        }
        self.last_sync
            .map(|(synced_at, ts)| ts.add_millis(now_ms.saturating_sub(synced_at)))
    }
}

impl Default for UpdateGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_fires_once_per_transition() {
        let mut checkpoint = ResyncCheckpoint::new(13);
        assert!(!checkpoint.observe(13));
        assert!(checkpoint.observe(14));
        assert!(!checkpoint.observe(14));
        assert!(!checkpoint.observe(14));
        assert_eq!(checkpoint.hour(), 14);
    }

    #[test]
    fn test_checkpoint_midnight_wrap() {
        let mut checkpoint = ResyncCheckpoint::new(23);
        assert!(checkpoint.observe(0));
        assert!(!checkpoint.observe(0));
    }

    #[test]
    fn test_first_update_always_due() {
        let gate = UpdateGate::default();
        assert!(gate.is_due(0));
        assert_eq!(gate.cached(0), None);
    }

    #[test]
    fn test_interval_respected() {
        let mut gate = UpdateGate::new(3_600_000);
        gate.record(1_000, Timestamp::new(1_710_075_900, 0));
        assert!(!gate.is_due(1_000));
        assert!(!gate.is_due(3_600_999));
        assert!(gate.is_due(3_601_000));
    }

    #[test]
    fn test_cached_extrapolates() {
        let mut gate = UpdateGate::default();
        gate.record(10_000, Timestamp::new(1_000, 250_000));
        assert_eq!(gate.cached(12_500), Some(Timestamp::new(1_002, 750_000)));
    }

    #[test]
    fn test_shorter_interval_applies_to_existing_sync() {
        let mut gate = UpdateGate::new(3_600_000);
        gate.record(0, Timestamp::new(1_000, 0));
        gate.set_interval(1_000);
        assert!(gate.is_due(1_000));
        assert_eq!(gate.interval_ms(), 1_000);
    }
}
