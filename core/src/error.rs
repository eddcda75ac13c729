//! Clock error types

/// Terminal startup failures
///
/// Returned instead of spinning forever so the platform harness can decide
/// between halting and resetting. None of these are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// Display did not answer on its bus address
    DisplayInit,
    /// Network link not up after the configured number of polls
    NetworkTimeout {
        /// Polls made, including the last failing one
        attempts: u16,
    },
    /// Initial network time fetch failed
    TimeSync,
    /// Real-time clock could not be written or read back
    Clock,
}

impl core::fmt::Display for StartupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DisplayInit => write!(f, "Digital Clock Error!"),
            Self::NetworkTimeout { attempts } => {
                write!(f, "network not connected after {} polls", attempts)
            }
            Self::TimeSync => write!(f, "initial time sync failed"),
            Self::Clock => write!(f, "real-time clock error"),
        }
    }
}

impl core::error::Error for StartupError {}

/// Non-fatal failures of a single main-loop tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickError {
    /// Real-time clock read failed; nothing was displayed
    Clock,
    /// Display write failed
    Display,
}

impl core::fmt::Display for TickError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Clock => write!(f, "real-time clock read failed"),
            Self::Display => write!(f, "display write failed"),
        }
    }
}

impl core::error::Error for TickError {}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_display_init_message() {
        let mut s = heapless::String::<32>::new();
        write!(s, "{}", StartupError::DisplayInit).unwrap();
        assert_eq!(s.as_str(), "Digital Clock Error!");
    }
}
