use std::io::{Read, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serialport::SerialPort;
use tokio::task;
use tokio::time::sleep;

use crate::framing::FrameBuf;
use crate::RoarmError;

/// Pause between empty reads while waiting for more bytes.
const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Blocking read timeout on the port itself; keeps each blocking hop
/// short so the async caller stays responsive.
const PORT_READ_TIMEOUT: Duration = Duration::from_millis(10);

type SharedPort = Arc<Mutex<Box<dyn SerialPort>>>;

/// Raw UART link to the arm. The port is shared with short-lived blocking
/// tasks; the frame buffer is owned here and never shared.
pub struct SerialLink {
    port: SharedPort,
    frames: FrameBuf,
}

fn lock_port(port: &SharedPort) -> std::sync::MutexGuard<'_, Box<dyn SerialPort>> {
    match port.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl SerialLink {
    pub fn open(port: &str, baud: u32) -> Result<Self, RoarmError> {
        let port = serialport::new(port, baud)
            .timeout(PORT_READ_TIMEOUT)
            .open()
            .map_err(|e| RoarmError::FailedToSend(format!("could not open {}: {}", port, e)))?;
        Ok(Self {
            port: Arc::new(Mutex::new(port)),
            frames: FrameBuf::new(),
        })
    }

    pub async fn request(
        &mut self,
        frame: &str,
        telemetry: bool,
        read_timeout: Duration,
    ) -> Result<Option<String>, RoarmError> {
        self.write_frame(frame).await?;
        if telemetry {
            self.read_frame(read_timeout).await
        } else {
            // A plain command is confirmed by nothing; the outbound frame
            // stands in as the result.
            Ok(Some(frame.to_string()))
        }
    }

    async fn write_frame(&mut self, frame: &str) -> Result<(), RoarmError> {
        let port = self.port.clone();
        let bytes = frame.as_bytes().to_vec();
        task::spawn_blocking(move || {
            let mut port = lock_port(&port);
            port.write_all(&bytes)
        })
        .await
        .map_err(|e| RoarmError::FailedToSend(e.to_string()))?
        .map_err(|e| RoarmError::FailedToSend(e.to_string()))
    }

    /// Read until one complete frame is available or the deadline passes.
    /// Zero bytes within a poll window mean wait-and-retry; a hard port
    /// error ends the read.
    async fn read_frame(&mut self, read_timeout: Duration) -> Result<Option<String>, RoarmError> {
        let start = Instant::now();
        loop {
            if let Some(frame) = self.frames.next_frame() {
                return Ok(Some(frame));
            }
            if start.elapsed() >= read_timeout {
                return Ok(None);
            }

            let port = self.port.clone();
            let chunk = task::spawn_blocking(move || {
                let mut port = lock_port(&port);
                let mut buf = [0u8; 256];
                match port.read(&mut buf) {
                    Ok(n) => Ok(buf[..n].to_vec()),
                    Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Vec::new()),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(|e| RoarmError::FailedToReceive(e.to_string()))?;

            match chunk {
                Ok(bytes) if bytes.is_empty() => sleep(POLL_INTERVAL).await,
                Ok(bytes) => self.frames.push(&String::from_utf8_lossy(&bytes)),
                Err(e) => return Err(RoarmError::FailedToReceive(e.to_string())),
            }
        }
    }
}
