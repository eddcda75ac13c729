//! Clock configuration
//!
//! Everything is compiled in; there is no runtime reconfiguration surface.

use digiclock_hal::Brightness;

/// Clock behaviour settings
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// Brightness applied after the display is blanked at startup
    pub brightness: Brightness,
    /// Delay between two network link polls during startup
    pub link_poll_interval_ms: u32,
    /// Startup gives up once this many polls have failed
    pub max_link_polls: u16,
    /// Main loop period
    pub tick_period_ms: u32,
    /// Minimum interval between network time round trips after startup
    pub resync_interval_ms: u64,
    /// Local time offset from UTC in seconds, negative west of Greenwich
    pub utc_offset_secs: i32,
    /// Sample the mode switches every tick instead of only at startup
    pub reread_modes_each_tick: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            brightness: Brightness::DEFAULT,
            link_poll_interval_ms: 500,
            max_link_polls: 30,
            tick_period_ms: 1000,
            resync_interval_ms: 3_600_000,
            utc_offset_secs: -7 * 3600, // MST
            reread_modes_each_tick: false,
        }
    }
}
