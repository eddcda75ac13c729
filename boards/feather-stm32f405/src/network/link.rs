#![deny(unsafe_code)]
#![deny(warnings)]
//! Ethernet link over the W5500, configured by DHCP

use defmt::info;
use digiclock_hal::NetworkLink;
use embassy_net::Stack;

/// DHCP-configured Ethernet link
///
/// DHCP runs inside the stack runner as soon as it is polled; the link only
/// reports whether an address has been leased.
pub struct EthLink<'a> {
    stack: Stack<'a>,
    reported: bool,
}

impl<'a> EthLink<'a> {
    pub fn new(stack: Stack<'a>) -> Self {
        Self {
            stack,
            reported: false,
        }
    }

    fn log_config(&self) {
        if let Some(config) = self.stack.config_v4() {
            let octets = config.address.address().octets();
            info!(
                "IP: {}.{}.{}.{}",
                octets[0], octets[1], octets[2], octets[3]
            );

            if let Some(gateway) = config.gateway {
                let gw_octets = gateway.octets();
                info!(
                    "Gateway: {}.{}.{}.{}",
                    gw_octets[0], gw_octets[1], gw_octets[2], gw_octets[3]
                );
            }
        }
    }
}

impl NetworkLink for EthLink<'_> {
    fn begin(&mut self) {
        info!("Waiting for DHCP...");
    }

    fn is_connected(&mut self) -> bool {
        let up = self.stack.is_config_up();
        if up && !self.reported {
            info!("Network is UP!");
            self.log_config();
            self.reported = true;
        }
        up
    }
}
