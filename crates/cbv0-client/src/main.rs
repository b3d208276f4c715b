//! cbv0-send: send one command line to a CBv0 bridge.
//!
//! # Usage
//!
//! ```text
//! cbv0-send [OPTIONS] <TOKENS>...
//!
//! Options:
//!   -b, --bridge <ADDR>   Bridge UDP address [default: 127.0.0.1:9001]
//!       --raw             Send the line as one legacy-text frame
//!
//! Examples:
//!   cbv0-send MOUSE_LEFT_DOWN WAIT_50 MOUSE_LEFT_UP
//!   cbv0-send --bridge 192.168.7.2:9001 LS:0.5,-1
//! ```
//!
//! The tokens are joined with `,` into one line, exactly as a touch client
//! would send it.
//!
//! # Environment variable overrides
//!
//! | Variable       | Flag        |
//! |----------------|-------------|
//! | `CBV0_BRIDGE`  | `--bridge`  |

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cbv0_client::infrastructure::udp_sender::FrameSender;

/// Sends a legacy command line to a CBv0 bridge.
#[derive(Debug, Parser)]
#[command(
    name = "cbv0-send",
    about = "Encodes a touch command line as CBv0 frames and sends it to a bridge",
    version
)]
struct Cli {
    /// UDP address of the bridge.
    #[arg(short, long, default_value = "127.0.0.1:9001", env = "CBV0_BRIDGE")]
    bridge: SocketAddr,

    /// Send the line as one legacy-text frame instead of typed frames.
    #[arg(long)]
    raw: bool,

    /// Command tokens, e.g. `MOUSE_LEFT_DOWN WAIT_50 MOUSE_LEFT_UP`.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

impl Cli {
    fn line(&self) -> String {
        self.tokens.join(",")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let line = cli.line();
    let sender = FrameSender::connect(cli.bridge)
        .await
        .with_context(|| format!("cannot reach bridge at {}", cli.bridge))?;

    if cli.raw {
        sender.send_raw_line(&line).await?;
        info!("sent 1 raw frame");
    } else {
        let frames = sender.send_line(&line).await?;
        info!("sent {frames} frame(s)");
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_joined_into_one_line() {
        let cli = Cli::parse_from(["cbv0-send", "MOUSE_LEFT_DOWN", "WAIT_50", "MOUSE_LEFT_UP"]);
        assert_eq!(cli.line(), "MOUSE_LEFT_DOWN,WAIT_50,MOUSE_LEFT_UP");
        assert_eq!(cli.bridge, "127.0.0.1:9001".parse().unwrap());
        assert!(!cli.raw);
    }

    #[test]
    fn test_negative_stick_values_are_not_flags() {
        let cli = Cli::parse_from(["cbv0-send", "--raw", "LS:-0.5,-1"]);
        assert!(cli.raw);
        assert_eq!(cli.line(), "LS:-0.5,-1");
    }

    #[test]
    fn test_bridge_address_override() {
        let cli = Cli::parse_from(["cbv0-send", "--bridge", "10.0.0.2:7000", "PING"]);
        assert_eq!(cli.bridge, "10.0.0.2:7000".parse().unwrap());
    }

    #[test]
    fn test_tokens_are_required() {
        assert!(Cli::try_parse_from(["cbv0-send"]).is_err());
    }
}
