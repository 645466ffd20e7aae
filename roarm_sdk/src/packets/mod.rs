mod command;
mod feedback;

pub use command::*;
pub use feedback::*;
