mod command;
mod ids;
mod notice;
mod types;

pub use crate::command::*;
pub use crate::ids::*;
pub use crate::notice::*;
pub use crate::types::*;
