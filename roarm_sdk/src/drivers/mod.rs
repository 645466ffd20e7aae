mod driver;
mod driver_config;

pub use driver::*;
pub use driver_config::*;

pub use crate::packets::*;
pub use crate::transport::{TransportConfig, DEFAULT_BAUDRATE};
pub use crate::{ArmType, RoarmError};
