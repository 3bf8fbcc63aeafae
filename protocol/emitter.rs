use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use log::{debug, info, warn};
use tokio::net::{lookup_host, UdpSocket};

use crate::config::EmitterConfig;
use crate::error::{App, StdResult};
use crate::packet::{Envelope, Packet};

/// Largest payload a single IPv4 UDP datagram can carry.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// The sampler reads each datagram into a buffer of this size and drops the
/// rest.
pub const RECEIVER_BUFFER_SIZE: usize = 1024;

/// What a successful [`Emitter::emit`] put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub endpoint: SocketAddr,
    pub bytes: usize,
}

pub async fn resolve(host: &str, port: u16) -> StdResult<SocketAddr> {
    if host.trim().is_empty() {
        return Err(App::Address("empty host".to_string()));
    }
    if port == 0 {
        return Err(App::Address(format!("{host}:0 has no destination port")));
    }
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|e| App::Address(format!("{host}:{port}: {e}")))?;
    let endpoint = addrs
        .next()
        .ok_or_else(|| App::Address(format!("{host}:{port} resolved to no address")))?;
    debug!("Resolved {host}:{port} to {endpoint}");
    Ok(endpoint)
}

pub async fn connect(endpoint: SocketAddr) -> StdResult<UdpSocket> {
    let unspecified: IpAddr = if endpoint.is_ipv4() {
        Ipv4Addr::UNSPECIFIED.into()
    } else {
        Ipv6Addr::UNSPECIFIED.into()
    };
    let local = SocketAddr::new(unspecified, 0);
    let socket = UdpSocket::bind(local)
        .await
        .map_err(|e| App::Socket(format!("bind {local}: {e}")))?;
    socket
        .connect(endpoint)
        .await
        .map_err(|e| App::Socket(format!("connect {endpoint}: {e}")))?;
    Ok(socket)
}

pub fn encode(packet: &Packet) -> StdResult<Vec<u8>> {
    let bytes = packet.to_datagram()?;
    if bytes.len() > MAX_DATAGRAM_SIZE {
        return Err(App::Send(format!(
            "{} byte datagram exceeds the UDP limit of {MAX_DATAGRAM_SIZE} bytes",
            bytes.len()
        )));
    }
    if bytes.len() > RECEIVER_BUFFER_SIZE {
        warn!(
            "Datagram is {} bytes, the sampler only reads the first {RECEIVER_BUFFER_SIZE}",
            bytes.len()
        );
    }
    Ok(bytes)
}

pub async fn send(socket: &UdpSocket, bytes: &[u8]) -> StdResult<usize> {
    let written = socket
        .send(bytes)
        .await
        .map_err(|e| App::Send(e.to_string()))?;
    if written != bytes.len() {
        return Err(App::Send(format!(
            "wrote {written} of {} bytes",
            bytes.len()
        )));
    }
    Ok(written)
}

/// Sends one envelope per call to the configured destination.
pub struct Emitter {
    config: EmitterConfig,
}

impl Emitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub async fn emit(&self, envelope: Envelope) -> StdResult<Delivery> {
        let endpoint = resolve(&self.config.address, self.config.port).await?;
        let socket = connect(endpoint).await?;
        let kind = envelope.kind();
        let bytes = encode(&Packet::new(envelope))?;
        let written = send(&socket, &bytes).await?;
        info!("Sent {kind} message to {endpoint} ({written} bytes)");
        Ok(Delivery {
            endpoint,
            bytes: written,
        })
    }
}
