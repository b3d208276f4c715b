//! Application layer of the client: deciding which frames carry a command
//! line.

pub mod encode_line;

pub use encode_line::{plan_line, ClientEncoder, LinePlan};
