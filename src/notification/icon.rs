//! Notification icons: a file path or a themed icon name.
//!
//! The bundled plugin icons are compiled into the binary and written to
//! `<cache_dir>/mqtt-notify/icons/` on first use, so an installed binary does
//! not depend on the source tree it was built from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::APP_NAME;

const BUNDLED_ICONS: [(&str, &[u8]); 2] = [
    ("irssi", include_bytes!("../../assets/icons/irssi.svg")),
    ("notify", include_bytes!("../../assets/icons/notify.svg")),
];

/// Used only when the cache directory is unusable.
const SOURCE_ICON_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/icons");

static ICON_DIR: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Icon {
    /// Image file on disk
    Path(PathBuf),
    /// Icon theme name such as `dialog-information`
    Named(String),
}

impl Icon {
    pub fn named(name: impl Into<String>) -> Self {
        Icon::Named(name.into())
    }

    /// Interpret a user supplied value: anything that looks like a path is a
    /// path, bare words are theme names.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.contains('/') || value.starts_with('~') {
            Icon::Path(expand_home(value))
        } else {
            Icon::Named(value.to_string())
        }
    }

    /// The plugin's bundled `<name>.svg`; unknown names are treated as theme names.
    pub fn bundled(name: &str) -> Self {
        if BUNDLED_ICONS.iter().any(|(bundled, _)| *bundled == name) {
            Icon::Path(icon_dir().join(format!("{}.svg", name)))
        } else {
            Icon::Named(name.to_string())
        }
    }

    /// Argument form for `notify-send --icon`
    pub fn as_arg(&self) -> String {
        match self {
            Icon::Path(path) => path.to_string_lossy().to_string(),
            Icon::Named(name) => name.clone(),
        }
    }
}

fn icon_dir() -> &'static Path {
    ICON_DIR.get_or_init(|| {
        let Some(cache) = dirs::cache_dir() else {
            return PathBuf::from(SOURCE_ICON_DIR);
        };
        let dir = cache.join(APP_NAME).join("icons");
        match install_icons(&dir) {
            Ok(()) => {
                debug!(dir = %dir.display(), "Bundled icons installed");
                dir
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Cannot install bundled icons");
                PathBuf::from(SOURCE_ICON_DIR)
            }
        }
    })
}

/// Write every bundled icon into `dir`, skipping files that are already current.
fn install_icons(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    for (name, bytes) in BUNDLED_ICONS {
        let path = dir.join(format!("{}.svg", name));
        if fs::read(&path).ok().as_deref() != Some(bytes) {
            fs::write(&path, bytes)?;
        }
    }
    Ok(())
}

fn expand_home(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(value)
}
