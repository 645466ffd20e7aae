use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum RoarmError {
    /// Malformed or out-of-range command arguments, raised at encode time
    /// before anything touches the wire.
    Validation(String),
    Serialization(String),
    FailedToSend(String),
    FailedToReceive(String),
    Http(String),
    Disconnected,
    /// The bounded retry loop ran out of attempts. The operation is
    /// unconfirmed, not necessarily undelivered.
    RetriesExhausted,
}

impl Error for RoarmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for RoarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RoarmError::Validation(ref msg) => write!(f, "Validation error: {}", msg),
            RoarmError::Serialization(ref msg) => write!(f, "Serialization error: {}", msg),
            RoarmError::FailedToSend(ref msg) => write!(f, "SendError: {}", msg),
            RoarmError::FailedToReceive(ref msg) => write!(f, "ReceiveError: {}", msg),
            RoarmError::Http(ref msg) => write!(f, "HttpError: {}", msg),
            RoarmError::Disconnected => write!(f, "Arm appears to be disconnected"),
            RoarmError::RetriesExhausted => {
                write!(f, "Gave up after exhausting all send attempts")
            }
        }
    }
}
