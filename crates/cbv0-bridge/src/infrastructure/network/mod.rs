//! UDP receive loop of the bridge.
//!
//! One task owns the socket and the [`Dispatcher`] and interleaves three
//! event sources with `tokio::select!`:
//!
//! - an inbound datagram → [`Dispatcher::handle_datagram`]
//! - the pacing tick → [`Dispatcher::poll`]
//! - the stats tick → one `info!` line with the dispatch counters
//!
//! Because everything runs on this one task, the HID state needs no lock.
//!
//! # Why no acknowledgments? (for beginners)
//!
//! Clients fire datagrams and forget them.  A lost "button down" is repaired
//! by the next one the client sends, and a lost "button up" by the client
//! re-sending its held state, so the bridge never replies and never retries.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{info, trace, warn};

use crate::application::dispatcher::{DispatchStats, Dispatcher};

/// Largest datagram the bridge reads.  Longer datagrams are truncated by the
/// OS and then fail the checksum.
pub const MAX_DATAGRAM_SIZE: usize = 2048;

/// Error type for the bridge network layer.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The UDP socket could not be bound.
    #[error("failed to bind UDP socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Why [`run_receive_loop`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The running flag was cleared (Ctrl+C).
    Shutdown,
    /// A hard reset was received; the process should exit and be restarted.
    RestartRequested,
}

/// Binds the bridge's UDP socket.
///
/// # Errors
///
/// Returns [`NetworkError::BindFailed`] if the address is in use or not
/// available on this host.
pub async fn bind(addr: SocketAddr) -> Result<UdpSocket, NetworkError> {
    let socket = UdpSocket::bind(addr)
        .await
        .map_err(|source| NetworkError::BindFailed { addr, source })?;
    info!("listening for CBv0 datagrams on UDP {addr}");
    Ok(socket)
}

/// Receives and dispatches datagrams until shutdown or a hard reset.
///
/// Pacing ticks use the interval configured on the dispatcher's synthesizer.
/// Before returning, all inputs are released so the host is not left with a
/// stuck key.
pub async fn run_receive_loop(
    socket: &UdpSocket,
    dispatcher: &mut Dispatcher,
    stats_interval: Option<Duration>,
    running: Arc<AtomicBool>,
) -> StopReason {
    let mut ticker = time::interval(dispatcher.synthesizer().config().tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats_ticker = stats_interval.map(|period| {
        let mut t = time::interval_at(time::Instant::now() + period, period);
        t.set_missed_tick_behavior(MissedTickBehavior::Delay);
        t
    });
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

    let reason = loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, src)) => {
                    trace!(%src, len, "datagram received");
                    dispatcher.handle_datagram(&buf[..len], Instant::now());
                }
                // ICMP port-unreachable and similar surface here; none of them
                // affect the socket.
                Err(e) => warn!("recv error: {e}"),
            },
            at = ticker.tick() => dispatcher.poll(at.into_std()),
            _ = next_tick(&mut stats_ticker) => log_stats(dispatcher.stats()),
        }

        if dispatcher.restart_requested() {
            break StopReason::RestartRequested;
        }
        if !running.load(Ordering::Relaxed) {
            break StopReason::Shutdown;
        }
    };

    info!(?reason, "receive loop stopping; releasing all inputs");
    dispatcher.synthesizer_mut().soft_reset();
    log_stats(dispatcher.stats());
    reason
}

/// Waits for the next tick, or forever when there is no interval.
async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn log_stats(stats: &DispatchStats) {
    info!(
        datagrams = stats.datagrams,
        applied = stats.applied,
        legacy_lines = stats.legacy_lines,
        heuristic_deltas = stats.heuristic_deltas,
        heuristic_buttons = stats.heuristic_buttons,
        dropped_checksum = stats.dropped_checksum,
        dropped_malformed = stats.dropped_malformed,
        dropped_unclassified = stats.dropped_unclassified,
        "dispatch stats"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use cbv0_core::{ActionOp, Command, FrameEncoder};

    use crate::application::synthesizer::ReportSynthesizer;
    use crate::domain::config::SynthesizerConfig;
    use crate::infrastructure::hid_output::mock::RecordingSink;

    fn dispatcher() -> (Dispatcher, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let synth = ReportSynthesizer::new(SynthesizerConfig::default(), sink.clone());
        (Dispatcher::new(synth), sink)
    }

    async fn loopback() -> (UdpSocket, UdpSocket, SocketAddr) {
        let server = tokio_test::assert_ok!(bind("127.0.0.1:0".parse().unwrap()).await);
        let addr = server.local_addr().unwrap();
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        (server, client, addr)
    }

    fn stop_after(running: &Arc<AtomicBool>, delay: Duration) {
        let flag = Arc::clone(running);
        tokio::spawn(async move {
            time::sleep(delay).await;
            flag.store(false, Ordering::Relaxed);
        });
    }

    #[tokio::test]
    async fn test_loop_applies_datagrams_until_shutdown() {
        // Arrange
        let (server, client, addr) = loopback().await;
        let (mut dispatcher, sink) = dispatcher();
        let running = Arc::new(AtomicBool::new(true));
        let frame = FrameEncoder::new()
            .encode(&Command::KeyEvent { op: ActionOp::Hold, key: "a".into() })
            .unwrap();
        client.send_to(&frame, addr).await.unwrap();
        stop_after(&running, Duration::from_millis(100));

        // Act
        let reason = run_receive_loop(&server, &mut dispatcher, None, running).await;

        // Assert – the held key, then the release on the way out
        assert_eq!(reason, StopReason::Shutdown);
        assert_eq!(dispatcher.stats().applied, 1);
        let keys = sink.keyboard_reports();
        assert_eq!(keys.first().map(|r| r.keys[0]), Some(0x04));
        assert_eq!(keys.last().map(|r| r.keys[0]), Some(0));
    }

    #[tokio::test]
    async fn test_hard_reset_stops_the_loop() {
        // Arrange
        let (server, client, addr) = loopback().await;
        let (mut dispatcher, _sink) = dispatcher();
        let running = Arc::new(AtomicBool::new(true));
        client.send_to(b"HARD_RESET", addr).await.unwrap();
        stop_after(&running, Duration::from_secs(5));

        // Act
        let reason = run_receive_loop(&server, &mut dispatcher, None, running).await;

        // Assert
        assert_eq!(reason, StopReason::RestartRequested);
    }

    #[tokio::test]
    async fn test_deferred_release_fires_from_tick() {
        // Arrange
        let (server, client, addr) = loopback().await;
        let (mut dispatcher, sink) = dispatcher();
        let running = Arc::new(AtomicBool::new(true));
        client.send_to(b"MOUSE_LEFT", addr).await.unwrap();
        stop_after(&running, Duration::from_millis(200));

        // Act
        run_receive_loop(&server, &mut dispatcher, Some(Duration::from_millis(50)), running).await;

        // Assert – click: down, up (40 ms later), then the neutral report on exit
        let bytes: Vec<_> = sink.mouse_reports().iter().map(|r| r.as_bytes()).collect();
        assert_eq!(bytes[..2], [[1, 0, 0], [0, 0, 0]]);
    }

    #[tokio::test]
    async fn test_bind_reports_address_in_use() {
        let first = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = first.local_addr().unwrap();

        let err = tokio_test::assert_err!(bind(addr).await);

        assert!(matches!(err, NetworkError::BindFailed { addr: a, .. } if a == addr));
    }
}
