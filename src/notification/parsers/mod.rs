//! 具体 parser 实现

pub mod irssi;
pub mod passthrough;

pub use irssi::{IrssiFormat, IrssiParser, IRSSI_PARSER};
pub use passthrough::{PassthroughParser, PASSTHROUGH_PARSER};
