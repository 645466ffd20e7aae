use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, StreamExt};
use futures_util::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::RoarmError;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type InFlight = Arc<Mutex<Option<oneshot::Sender<String>>>>;

/// Persistent WebSocket link. Commands are fire-and-forget messages;
/// telemetry responses arrive asynchronously on the read half and are
/// handed to the single in-flight resolver. At most one telemetry
/// request may be outstanding per link; a new request replaces the
/// previous resolver rather than queueing behind it.
pub struct SocketLink {
    sink: WsSink,
    in_flight: InFlight,
    reader: JoinHandle<()>,
}

impl SocketLink {
    pub async fn connect(url: &str) -> Result<Self, RoarmError> {
        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| RoarmError::FailedToSend(format!("could not open {}: {}", url, e)))?;
        let (sink, mut stream) = ws.split();

        let in_flight: InFlight = Arc::new(Mutex::new(None));
        let slot = in_flight.clone();
        let reader = tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if let Some(resolver) = slot.lock().await.take() {
                            let _ = resolver.send(text);
                        } else {
                            tracing::debug!("unsolicited socket frame: {}", text);
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        });

        Ok(Self {
            sink,
            in_flight,
            reader,
        })
    }

    pub async fn request(
        &mut self,
        frame: &str,
        telemetry: bool,
        read_timeout: Duration,
    ) -> Result<Option<String>, RoarmError> {
        let line = frame.trim_end().to_string();
        if telemetry {
            let (tx, rx) = oneshot::channel();
            *self.in_flight.lock().await = Some(tx);
            self.sink
                .send(Message::Text(line))
                .await
                .map_err(|e| RoarmError::FailedToSend(e.to_string()))?;
            match timeout(read_timeout, rx).await {
                Ok(Ok(text)) => Ok(Some(text)),
                // Resolver dropped (replaced or reader gone) or deadline
                // passed: no data this attempt.
                Ok(Err(_)) | Err(_) => Ok(None),
            }
        } else {
            self.sink
                .send(Message::Text(line))
                .await
                .map_err(|e| RoarmError::FailedToSend(e.to_string()))?;
            Ok(Some(frame.to_string()))
        }
    }

    pub async fn close(&mut self) {
        let _ = self.sink.close().await;
        self.reader.abort();
    }
}
