//! Platform-agnostic clock logic for the digi-clock firmware
//!
//! This crate contains everything the clock decides on its own: what string
//! to show for a given time and mode, when to resync against the network, and
//! the order in which startup brings the collaborators online. It has NO
//! hardware dependencies; the board supplies implementations of the
//! `digiclock-hal` traits and `embedded-hal` pins/delays.
//!
//! ## Layout
//! - **`calendar`**: Unix seconds <-> civil date, weekday, UTC offsets
//! - **`format`**: time formatter and display text helpers
//! - **`mode`**: active-low mode switches
//! - **`resync`**: hourly resync checkpoint and update-interval gate
//! - **`app`**: the `DigiClock` application, its startup sequence and per-second tick
//!
//! Logging goes through defmt when the `defmt` feature is enabled and is
//! compiled out otherwise, so host tests need no global logger.

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod log;

pub mod app;
pub mod calendar;
pub mod config;
pub mod error;
pub mod format;
pub mod mode;
pub mod resync;

#[cfg(test)]
mod testing;

pub use app::{ClockContext, DigiClock, ResyncOutcome, TickReport};
pub use config::ClockConfig;
pub use error::{StartupError, TickError};
pub use format::{format_time, ClockReading, DisplayText, HourMode};
pub use mode::{ModeFlags, ModeSwitches};
pub use resync::{ResyncCheckpoint, UpdateGate};
