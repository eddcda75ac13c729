//! Hardware abstraction traits for the digi-clock firmware
//!
//! This crate defines the narrow capabilities the clock logic needs from the
//! board: a character display, a real-time clock, a network link and a network
//! time source. BSPs implement these traits; `digiclock-core` is written
//! against them so it can be exercised on the host with fakes.
//!
//! Digital inputs and delays are not redefined here, the clock logic uses
//! `embedded_hal::digital::InputPin` and `embedded_hal_async::delay::DelayNs`.

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod display;
pub mod network;
pub mod rtc;

pub use display::{Brightness, SegmentDisplay};
pub use network::{NetworkLink, TimeSource, Timestamp};
pub use rtc::{DateTime, InvalidDateTime, RealTimeClock};
