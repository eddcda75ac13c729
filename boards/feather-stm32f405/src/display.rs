#![deny(unsafe_code)]
#![deny(warnings)]
//! M5Stack Digi-Clock unit on I2C
//!
//! Four seven-segment digits with a colon, driven by an on-board MCU. The unit
//! takes whole strings: the character register accepts up to eight bytes,
//! `:` lights the colon and unused bytes are NUL.

use defmt::{info, Format};
use digiclock_hal::{Brightness, SegmentDisplay};
use embassy_stm32::time::Hertz;
use embedded_hal::i2c::I2c;

const REG_CHARS: u8 = 0x20;
const REG_BRIGHTNESS: u8 = 0x30;
const REG_FIRMWARE_VERSION: u8 = 0xFE;

/// Bytes the character register takes per write
const CHAR_SLOTS: usize = 8;

/// Display bus configuration
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// 7-bit I2C address, set by the unit's DIP switch
    pub address: u8,
    /// Bus clock
    pub frequency: Hertz,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            address: 0x30,
            frequency: Hertz::khz(100),
        }
    }
}

/// Display driver errors
#[derive(Debug, Clone, Copy, Format)]
pub enum DisplayError {
    /// I2C transaction failed (NACK, arbitration loss, bus fault)
    Bus,
    /// Text longer than the character register
    UnsupportedText,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
            Self::UnsupportedText => write!(f, "Unsupported text"),
        }
    }
}

impl core::error::Error for DisplayError {}

/// Digi-Clock unit behind a blocking I2C bus
pub struct DigiClockUnit<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> DigiClockUnit<I> {
    pub fn new(i2c: I, config: &DisplayConfig) -> Self {
        Self {
            i2c,
            address: config.address,
        }
    }

    fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), DisplayError> {
        let mut frame: heapless::Vec<u8, { CHAR_SLOTS + 1 }> = heapless::Vec::new();
        frame.push(reg).map_err(|_| DisplayError::UnsupportedText)?;
        frame
            .extend_from_slice(data)
            .map_err(|_| DisplayError::UnsupportedText)?;
        self.i2c
            .write(self.address, &frame)
            .map_err(|_| DisplayError::Bus)
    }
}

impl<I: I2c> SegmentDisplay for DigiClockUnit<I> {
    type Error = DisplayError;

    /// Probe the unit by reading its firmware version
    fn init(&mut self) -> Result<(), Self::Error> {
        let mut version = [0u8; 1];
        self.i2c
            .write_read(self.address, &[REG_FIRMWARE_VERSION], &mut version)
            .map_err(|_| DisplayError::Bus)?;
        info!(
            "Digi-Clock unit at 0x{:02x}, firmware {}",
            self.address, version[0]
        );
        Ok(())
    }

    fn set_text(&mut self, text: &str) -> Result<(), Self::Error> {
        let bytes = text.as_bytes();
        if bytes.len() > CHAR_SLOTS || !text.is_ascii() {
            return Err(DisplayError::UnsupportedText);
        }
        let mut chars = [0u8; CHAR_SLOTS];
        chars[..bytes.len()].copy_from_slice(bytes);
        self.write_register(REG_CHARS, &chars)
    }

    fn set_brightness(&mut self, brightness: Brightness) -> Result<(), Self::Error> {
        self.write_register(REG_BRIGHTNESS, &[brightness.level()])
    }
}
