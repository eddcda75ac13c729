//! Mode switches
//!
//! Two active-low inputs with pull-ups: a closed switch pulls the pin LOW and
//! enables the feature.

use embedded_hal::digital::InputPin;

use crate::format::HourMode;

/// User-selected display behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeFlags {
    /// Blink the colon once per second
    pub flash_colon: bool,
    /// Show 00-23 instead of 1-12
    pub use_24_hour: bool,
}

impl ModeFlags {
    pub const fn hour_mode(&self) -> HourMode {
        HourMode::from_24_hour_flag(self.use_24_hour)
    }
}

/// The two mode input pins
pub struct ModeSwitches<F, H> {
    flash_colon: F,
    hour_24: H,
}

impl<F: InputPin, H: InputPin> ModeSwitches<F, H> {
    /// Pins must already be configured as pulled-up inputs
    pub fn new(flash_colon: F, hour_24: H) -> Self {
        Self {
            flash_colon,
            hour_24,
        }
    }

    /// Sample both switches
    ///
    /// A pin that fails to read counts as open (feature off).
    pub fn read(&mut self) -> ModeFlags {
        ModeFlags {
            flash_colon: is_closed(&mut self.flash_colon, "flash-colon"),
            use_24_hour: is_closed(&mut self.hour_24, "24-hour"),
        }
    }
}

fn is_closed<P: InputPin>(pin: &mut P, name: &str) -> bool {
    match pin.is_low() {
        Ok(low) => low,
        Err(_) => {
            warn!("Failed to read {} switch, treating as open", name);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePin;

    #[test]
    fn test_low_enables_feature() {
        let mut switches = ModeSwitches::new(FakePin::low(), FakePin::high());
        let flags = switches.read();
        assert!(flags.flash_colon);
        assert!(!flags.use_24_hour);
        assert_eq!(flags.hour_mode(), HourMode::TwelveHour);
    }

    #[test]
    fn test_both_closed() {
        let mut switches = ModeSwitches::new(FakePin::low(), FakePin::low());
        assert_eq!(
            switches.read(),
            ModeFlags {
                flash_colon: true,
                use_24_hour: true
            }
        );
    }

    #[test]
    fn test_read_error_counts_as_open() {
        let mut switches = ModeSwitches::new(FakePin::broken(), FakePin::low());
        let flags = switches.read();
        assert!(!flags.flash_colon);
        assert!(flags.use_24_hour);
    }
}
