#![deny(unsafe_code)]
#![deny(warnings)]
//! Network configuration structures

/// SNTP client configuration
#[derive(Debug, Clone)]
pub struct SntpConfig {
    /// NTP servers to try (in order)
    pub servers: &'static [&'static str],
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Number of retry attempts per server
    pub retry_count: usize,
    /// Maximum accepted stratum level (1-15)
    pub max_stratum: u8,
    /// Pause between two failed attempts in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for SntpConfig {
    fn default() -> Self {
        Self {
            servers: &["pool.ntp.org", "time.google.com", "time.cloudflare.com"],
            timeout_ms: 5000,
            retry_count: 3,
            max_stratum: 3,
            retry_backoff_ms: 2000,
        }
    }
}

/// Network stack configuration
///
/// Compiled in. Two clocks on one LAN need different `mac_addr` values.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Locally administered MAC address for the W5500
    pub mac_addr: [u8; 6],
    /// Seed for embassy-net's ephemeral ports and DHCP transaction IDs
    ///
    /// The default is a constant, so every boot reuses the same sequence.
    /// For distinct values per boot, draw it from the STM32F405 `RNG`
    /// peripheral in `clock_task` before calling `embassy_net::new`.
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mac_addr: [0x02, 0x00, 0x00, 0x12, 0x34, 0x56],
            seed: 0x1234_5678_u64,
        }
    }
}
