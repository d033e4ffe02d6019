//! CLI command handling

pub mod bootstrap;
pub mod parse;
pub mod run;
pub mod send;

pub use bootstrap::*;
pub use parse::*;
pub use run::*;
pub use send::*;
