//! Seven-segment character display capability

/// Display brightness level
///
/// The digit unit accepts levels `0..=9`; anything larger is rejected at
/// construction so drivers never have to clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Brightness(u8);

impl Brightness {
    /// Dimmest level (segments still lit)
    pub const MIN: Self = Self(0);
    /// Brightest level
    pub const MAX: Self = Self(9);
    /// Level applied at startup
    pub const DEFAULT: Self = Self(6);

    /// Create a brightness level, `None` if `level > 9`
    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX.0 {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Raw level as sent to the display
    pub const fn level(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A fixed-width character display such as a 4-digit seven-segment unit
///
/// Text is written whole: every call to [`set_text`](Self::set_text) replaces
/// what is shown. A `:` in the text lights the colon between the second and
/// third digit instead of taking a digit position.
pub trait SegmentDisplay {
    /// Driver error type
    type Error;

    /// Probe and initialize the display hardware
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Replace the displayed text
    fn set_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Set the segment brightness
    fn set_brightness(&mut self, brightness: Brightness) -> Result<(), Self::Error>;
}
