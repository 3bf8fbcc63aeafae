//! Receiving side of the protocol, used to check what the emitter sends
//! without a running sampler.
//!
//! Like the sampler, every datagram is decoded on its own. Datagrams that are
//! not a packet, or a packet with no message, are logged and skipped.

use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::timeout;

use crate::config::ListenerConfig;
use crate::error::{App, StdResult};
use crate::packet::{decode_envelope, Envelope};

pub struct Received {
    pub peer: SocketAddr,
    pub size: usize,
    pub content: StdResult<Envelope>,
}

pub struct Listener {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl Listener {
    /// Port `0` binds an ephemeral port, see [`Listener::local_addr`].
    pub async fn bind(address: &str, port: u16) -> StdResult<Self> {
        let local = lookup_host((address, port))
            .await
            .map_err(|e| App::Address(format!("{address}:{port}: {e}")))?
            .next()
            .ok_or_else(|| App::Address(format!("{address}:{port} resolved to no address")))?;
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| App::Socket(format!("bind {local}: {e}")))?;
        Ok(Self {
            socket,
            buf: vec![0u8; u16::MAX as usize],
        })
    }

    pub async fn from_config(config: &ListenerConfig) -> StdResult<Self> {
        Self::bind(&config.address, config.port).await
    }

    pub fn local_addr(&self) -> StdResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub async fn recv(&mut self) -> StdResult<Received> {
        let (size, peer) = self.socket.recv_from(&mut self.buf).await?;
        debug!("Received {size} bytes from {peer}");
        Ok(Received {
            peer,
            size,
            content: decode_envelope(&self.buf[..size]),
        })
    }

    /// Hands every decoded envelope to `handler` and returns how many there
    /// were. Stops after `count` envelopes, or once `idle_timeout` passes
    /// without a datagram.
    pub async fn serve<F>(
        &mut self,
        count: Option<u64>,
        idle_timeout: Option<Duration>,
        mut handler: F,
    ) -> StdResult<u64>
    where
        F: FnMut(SocketAddr, &Envelope) -> StdResult<()>,
    {
        let mut decoded = 0;
        while count.map_or(true, |limit| decoded < limit) {
            let received = match idle_timeout {
                Some(idle) => {
                    if let Ok(received) = timeout(idle, self.recv()).await {
                        received?
                    } else {
                        info!("No datagram for {idle:?}, stopping");
                        break;
                    }
                }
                None => self.recv().await?,
            };
            match received.content {
                Ok(envelope) => {
                    handler(received.peer, &envelope)?;
                    decoded += 1;
                }
                Err(e) => warn!(
                    "Dropped {} byte datagram from {}: {e}",
                    received.size, received.peer
                ),
            }
        }
        Ok(decoded)
    }
}

/// One line of operator output for a decoded envelope.
pub fn report(peer: SocketAddr, envelope: &Envelope, json: bool) -> StdResult<String> {
    if json {
        Ok(serde_json::to_string(envelope)?)
    } else {
        Ok(format!("{peer} {envelope}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Packet;

    async fn loopback() -> (Listener, UdpSocket) {
        let listener = Listener::bind("127.0.0.1", 0).await.unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender
            .connect(listener.local_addr().unwrap())
            .await
            .unwrap();
        (listener, sender)
    }

    #[tokio::test]
    async fn recv_decodes_a_play_message() {
        let (mut listener, sender) = loopback().await;
        let bytes = Packet::new(Envelope::play("pew.wav", 1))
            .to_datagram()
            .unwrap();
        sender.send(&bytes).await.unwrap();

        let received = listener.recv().await.unwrap();
        assert_eq!(received.peer, sender.local_addr().unwrap());
        assert_eq!(received.size, bytes.len());
        assert_eq!(received.content.unwrap(), Envelope::play("pew.wav", 1));
    }

    #[tokio::test]
    async fn serve_skips_malformed_datagrams() {
        let (mut listener, sender) = loopback().await;
        sender.send(&[0xff, 0xff, 0xff]).await.unwrap();
        sender.send(&[]).await.unwrap();
        let bytes = Packet::new(Envelope::cache(["a.wav", "b.wav"]))
            .to_datagram()
            .unwrap();
        sender.send(&bytes).await.unwrap();

        let mut seen = Vec::new();
        let decoded = listener
            .serve(Some(1), None, |_, envelope| {
                seen.push(envelope.clone());
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(decoded, 1);
        assert_eq!(seen, vec![Envelope::cache(["a.wav", "b.wav"])]);
    }

    #[tokio::test]
    async fn serve_stops_when_idle() {
        let (mut listener, _sender) = loopback().await;
        let decoded = listener
            .serve(None, Some(Duration::from_millis(50)), |_, _| Ok(()))
            .await
            .unwrap();
        assert_eq!(decoded, 0);
    }

    #[tokio::test]
    async fn handler_error_ends_serve() {
        let (mut listener, sender) = loopback().await;
        let bytes = Packet::new(Envelope::play("pew.wav", 1))
            .to_datagram()
            .unwrap();
        sender.send(&bytes).await.unwrap();
        let result = listener
            .serve(None, None, |_, _| Err(App::Send("stop".to_string())))
            .await;
        assert!(matches!(result, Err(App::Send(_))));
    }

    #[test]
    fn report_formats() {
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let envelope = Envelope::play("pew.wav", 1);
        assert_eq!(
            report(peer, &envelope, false).unwrap(),
            "127.0.0.1:5000 play pew.wav on channel 1"
        );
        assert_eq!(
            report(peer, &envelope, true).unwrap(),
            r#"{"play":{"resource_locator":"pew.wav","channel":1}}"#
        );
    }
}
