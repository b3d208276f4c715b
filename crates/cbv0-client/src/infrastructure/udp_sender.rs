//! Fire-and-forget UDP transport towards a bridge.
//!
//! The bridge never answers, so a sender only ever writes.  The socket is
//! connected to the bridge address so that `send` needs no destination and
//! ICMP errors from a closed port surface on the next send.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::application::ClientEncoder;

/// Error type for the client transport.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The local socket could not be bound or connected.
    #[error("failed to open UDP socket towards {bridge}: {source}")]
    BindFailed {
        bridge: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// A datagram could not be handed to the OS.
    #[error("failed to send {len}-byte frame: {source}")]
    SendFailed {
        len: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Sends CBv0 frames to one bridge.
pub struct FrameSender {
    socket: UdpSocket,
    encoder: ClientEncoder,
    bridge: SocketAddr,
}

impl FrameSender {
    /// Opens an ephemeral local socket connected to `bridge`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BindFailed`] if no local socket can be opened
    /// for the bridge's address family.
    pub async fn connect(bridge: SocketAddr) -> Result<Self, NetworkError> {
        let local: SocketAddr = if bridge.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let bind_err = |source| NetworkError::BindFailed { bridge, source };
        let socket = UdpSocket::bind(local).await.map_err(bind_err)?;
        socket.connect(bridge).await.map_err(bind_err)?;
        info!("sending CBv0 frames to {bridge}");
        Ok(Self {
            socket,
            encoder: ClientEncoder::new(),
            bridge,
        })
    }

    pub fn bridge(&self) -> SocketAddr {
        self.bridge
    }

    /// Sends one already-encoded frame.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::SendFailed`] if the OS rejects the datagram.
    pub async fn send_frame(&self, frame: &[u8]) -> Result<(), NetworkError> {
        self.socket
            .send(frame)
            .await
            .map_err(|source| NetworkError::SendFailed {
                len: frame.len(),
                source,
            })?;
        debug!(len = frame.len(), "frame sent");
        Ok(())
    }

    /// Encodes `line` and sends its frames in order.  Returns how many frames
    /// were sent.
    pub async fn send_line(&self, line: &str) -> Result<usize, NetworkError> {
        let frames = self.encoder.encode_line(line);
        for frame in &frames {
            self.send_frame(frame).await?;
        }
        Ok(frames.len())
    }

    /// Sends `line` as a single legacy-text frame without trying typed
    /// encoding.
    pub async fn send_raw_line(&self, line: &str) -> Result<(), NetworkError> {
        let frame = self.encoder.encode_raw_line(line);
        self.send_frame(&frame).await
    }
}
