//! 具体 runner 实现

pub mod desktop;

pub use desktop::{NotifyRunner, DEFAULT_RENDER_TIMEOUT};

/// Runner every bundled parser targets.
pub const NOTIFY_RUNNER: &str = "notify";
