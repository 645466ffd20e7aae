mod roarm_error;

pub use roarm_error::*;
