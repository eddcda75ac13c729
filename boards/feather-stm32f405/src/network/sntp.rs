#![deny(unsafe_code)]
#![deny(warnings)]
//! SNTP client implementing the clock's `TimeSource`

use defmt::{debug, error, info, warn, Debug2Format};
use digiclock_core::UpdateGate;
use digiclock_hal::{TimeSource, Timestamp};
use embassy_futures::select::{select, Either};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpEndpoint, Stack};
use embassy_time::{Duration, Instant, Timer};
use rtic_monotonics::fugit::ExtU64;
use rtic_monotonics::Monotonic;

use crate::Mono;

use super::config::SntpConfig;
use super::error::NetworkError;

const NTP_PORT: u16 = 123;
const NTP_PACKET_LEN: usize = 48;

/// SNTP client for time synchronization
///
/// Network round trips are rate limited by an [`UpdateGate`]: within the
/// update interval, `update` answers from the last sync advanced by the
/// monotonic time elapsed since.
pub struct SntpClient<'a> {
    stack: Stack<'a>,
    config: SntpConfig,
    gate: UpdateGate,
}

impl<'a> SntpClient<'a> {
    /// Create a new SNTP client with default configuration
    pub fn new(stack: Stack<'a>) -> Self {
        Self::with_config(stack, SntpConfig::default())
    }

    /// Create a new SNTP client with custom configuration
    pub fn with_config(stack: Stack<'a>, config: SntpConfig) -> Self {
        Self {
            stack,
            config,
            gate: UpdateGate::default(),
        }
    }

    /// Try every server `retry_count` times, first answer wins
    async fn sync(&self) -> Result<Timestamp, NetworkError> {
        info!("Starting SNTP synchronization");
        for server in self.config.servers {
            for attempt in 0..self.config.retry_count {
                info!(
                    "Attempting SNTP sync with {} (attempt {})",
                    server,
                    attempt + 1
                );
                match self.sntp_request(server).await {
                    Ok(timestamp) => {
                        info!(
                            "SNTP sync successful: {}.{:06} UTC",
                            timestamp.unix_secs, timestamp.micros
                        );
                        return Ok(timestamp);
                    }
                    Err(e) => {
                        warn!("SNTP sync failed: {:?}, retrying...", e);
                        Mono::delay(self.config.retry_backoff_ms.millis()).await;
                    }
                }
            }
        }
        error!("All SNTP sync attempts failed");
        Err(NetworkError::AllServersFailed)
    }

    async fn sntp_request(&self, server: &str) -> Result<Timestamp, NetworkError> {
        let server_ip = self
            .stack
            .dns_query(server, DnsQueryType::A)
            .await
            .map_err(|_| NetworkError::DnsError)?
            .first()
            .copied()
            .ok_or(NetworkError::DnsError)?;

        let server_endpoint = IpEndpoint::new(server_ip, NTP_PORT);
        info!("Resolved {} to {}", server, Debug2Format(&server_endpoint));

        let mut rx_meta = [PacketMetadata::EMPTY; 2];
        let mut rx_buffer = [0u8; 64];
        let mut tx_meta = [PacketMetadata::EMPTY; 2];
        let mut tx_buffer = [0u8; 64];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| NetworkError::SocketError)?;

        // NTP request: LI=0, VN=3, Mode=3 (Client)
        let mut ntp_packet = [0u8; NTP_PACKET_LEN];
        ntp_packet[0] = 0x1B;
        let transmit_time = Instant::now();
        socket
            .send_to(&ntp_packet, server_endpoint)
            .await
            .map_err(|_| NetworkError::SocketError)?;
        debug!("Sent NTP request to {}", Debug2Format(&server_endpoint));

        let mut response = [0u8; NTP_PACKET_LEN];
        let timeout = Timer::after(Duration::from_millis(self.config.timeout_ms));
        let (recv_len, from_addr) = match select(timeout, socket.recv_from(&mut response)).await {
            Either::First(_) => return Err(NetworkError::Timeout),
            Either::Second(result) => result.map_err(|_| NetworkError::SocketError)?,
        };
        let receive_time = Instant::now();

        if recv_len < NTP_PACKET_LEN || from_addr.endpoint.addr != server_ip {
            return Err(NetworkError::InvalidResponse);
        }

        let stratum = response[1];
        if stratum == 0 || stratum > self.config.max_stratum {
            warn!(
                "Invalid stratum {} (max {})",
                stratum, self.config.max_stratum
            );
            return Err(NetworkError::ServerError);
        }

        let tx_timestamp_secs =
            u32::from_be_bytes([response[40], response[41], response[42], response[43]]) as u64;
        let tx_timestamp_frac =
            u32::from_be_bytes([response[44], response[45], response[46], response[47]]);

        let rtt = receive_time.duration_since(transmit_time);
        let rtt_correction_micros = rtt.as_micros() / 2;

        let mut timestamp = Timestamp::from_ntp(tx_timestamp_secs, tx_timestamp_frac);
        timestamp.micros = timestamp
            .micros
            .saturating_add(rtt_correction_micros as u32);
        if timestamp.micros >= 1_000_000 {
            timestamp.unix_secs = timestamp.unix_secs.saturating_add(1);
            timestamp.micros -= 1_000_000;
        }

        debug!(
            "NTP timestamp: {}.{:06} UTC (stratum {}, RTT correction: {} µs)",
            timestamp.unix_secs, timestamp.micros, stratum, rtt_correction_micros
        );
        Ok(timestamp)
    }
}

impl TimeSource for SntpClient<'_> {
    type Error = NetworkError;

    fn begin(&mut self) {
        info!(
            "SNTP client ready: {} servers, update interval {} ms",
            self.config.servers.len(),
            self.gate.interval_ms()
        );
    }

    async fn update(&mut self) -> Result<Timestamp, Self::Error> {
        if let Some(timestamp) = self.gate.cached(Instant::now().as_millis()) {
            debug!("SNTP answer from last sync: {} UTC", timestamp.unix_secs);
            return Ok(timestamp);
        }
        self.force_update().await
    }

    async fn force_update(&mut self) -> Result<Timestamp, Self::Error> {
        let timestamp = self.sync().await?;
        self.gate.record(Instant::now().as_millis(), timestamp);
        Ok(timestamp)
    }

    fn set_update_interval(&mut self, interval_ms: u64) {
        info!("SNTP update interval set to {} ms", interval_ms);
        self.gate.set_interval(interval_ms);
    }
}
