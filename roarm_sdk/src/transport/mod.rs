//! Interchangeable transports for the command/telemetry protocol.
//!
//! A transport is chosen once at connect time and never mixed with
//! another within a call. Every transport offers the same per-attempt
//! contract: write one frame, then either await telemetry (one parsed
//! frame / HTTP body / socket message) or report the outbound frame
//! itself as the result. `Ok(None)` means the attempt produced no data
//! and the retry engine should try again.

mod http;
mod serial;
mod socket;

pub use http::HttpLink;
pub use serial::SerialLink;
pub use socket::SocketLink;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::RoarmError;

pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Transport selection, decided at configuration time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum TransportConfig {
    /// Local serial link to the arm's UART.
    Serial { port: String, baud: u32 },
    /// Poll the arm's built-in HTTP endpoint with the frame as a query
    /// parameter.
    Http { host: String },
    /// Persistent WebSocket; telemetry arrives asynchronously and is
    /// matched to the single in-flight request.
    Socket { url: String },
}

/// One live connection. Closed set: a driver owns exactly one of these.
pub enum Link {
    Serial(SerialLink),
    Http(HttpLink),
    Socket(SocketLink),
}

impl Link {
    pub async fn connect(config: &TransportConfig) -> Result<Self, RoarmError> {
        match config {
            TransportConfig::Serial { port, baud } => {
                Ok(Link::Serial(SerialLink::open(port, *baud)?))
            }
            TransportConfig::Http { host } => Ok(Link::Http(HttpLink::new(host))),
            TransportConfig::Socket { url } => Ok(Link::Socket(SocketLink::connect(url).await?)),
        }
    }

    /// One attempt of the request/response cycle. `frame` is the full
    /// wire line including its trailing newline.
    pub async fn request(
        &mut self,
        frame: &str,
        telemetry: bool,
        read_timeout: Duration,
    ) -> Result<Option<String>, RoarmError> {
        match self {
            Link::Serial(link) => link.request(frame, telemetry, read_timeout).await,
            Link::Http(link) => link.request(frame, telemetry).await,
            Link::Socket(link) => link.request(frame, telemetry, read_timeout).await,
        }
    }

    pub async fn close(&mut self) {
        match self {
            Link::Serial(_) | Link::Http(_) => {}
            Link::Socket(link) => link.close().await,
        }
    }
}
