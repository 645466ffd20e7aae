use serde::{Deserialize, Serialize};

use crate::transport::{TransportConfig, DEFAULT_BAUDRATE};
use crate::ArmType;

/// ```rust,ignore
/// // Drive a 6-DOF arm over its UART
/// let config = RoarmDriverConfig::new(
///     ArmType::M3,
///     TransportConfig::Serial { port: "/dev/ttyUSB0".to_string(), baud: 115200 },
/// );
///
/// // Or over the arm's WiFi HTTP endpoint
/// let config = RoarmDriverConfig::new(
///     ArmType::M2,
///     TransportConfig::Http { host: "192.168.4.1".to_string() },
/// );
///
/// if let Err(e) = config.validate() {
///     println!("Configuration error: {}", e);
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoarmDriverConfig {
    pub arm: ArmType,
    pub transport: TransportConfig,
    /// Per-attempt telemetry read deadline, milliseconds.
    pub timeout_ms: u64,
}

impl RoarmDriverConfig {
    pub fn new(arm: ArmType, transport: TransportConfig) -> Self {
        Self {
            arm,
            transport,
            timeout_ms: 2000,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match &self.transport {
            TransportConfig::Serial { port, baud } => {
                if port.is_empty() {
                    return Err("Serial port cannot be empty.".to_string());
                }
                if *baud == 0 {
                    return Err("Baudrate must be greater than 0.".to_string());
                }
            }
            TransportConfig::Http { host } => {
                if host.is_empty() {
                    return Err("Host cannot be empty.".to_string());
                }
            }
            TransportConfig::Socket { url } => {
                if url.is_empty() {
                    return Err("Socket url cannot be empty.".to_string());
                }
            }
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0.".to_string());
        }
        Ok(())
    }
}

impl Default for RoarmDriverConfig {
    fn default() -> Self {
        Self {
            arm: ArmType::M2,
            transport: TransportConfig::Serial {
                port: "/dev/ttyUSB0".to_string(),
                baud: DEFAULT_BAUDRATE,
            },
            timeout_ms: 2000,
        }
    }
}
