#![deny(warnings)]
//! Network side of the clock
//!
//! - **`config`**: configuration structs with `Default` implementations
//! - **`error`**: simple error enum for time fetches
//! - **`link`**: DHCP-configured Ethernet link implementing `NetworkLink`
//! - **`sntp`**: SNTP client implementing `TimeSource`
//!
//! Both clients borrow the embassy-net `Stack`; the W5500 runner and the stack
//! runner are polled next to the clock by the task that owns them.

pub mod config;
pub mod error;
pub mod link;
pub mod sntp;

pub use config::NetworkConfig;
pub use link::EthLink;
pub use sntp::SntpClient;
