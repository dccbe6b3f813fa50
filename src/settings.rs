//! Functions for loading settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::window::WindowParams;

/// A structure containing configuration data, used to create the window and
/// set up the frame loop. Every field is optional in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowParams,
    /// Color the framebuffer is cleared to every frame.
    pub clear_color: [f32; 4],
    /// Shows the debug UI.
    pub ui: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            window: WindowParams::default(),
            clear_color: [0.1, 0.1, 0.1, 1.0],
            ui: true,
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self> {
        let settings = serde_json::from_str(text)?;
        Ok(settings)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|_| format!("failed to read settings {:?}", path))?;

        let settings = serde_json::from_str(&text)
            .with_context(|_| format!("failed to parse settings {:?}", path))?;

        info!("Loaded settings from {:?}.", path);
        Ok(settings)
    }

    /// Loads `path` if it exists, falls back to the defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No settings at {:?}, using defaults.", path);
            Ok(Settings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial() {
        let settings = Settings::from_json(r#"{ "window": { "title": "quad", "vsync": false } }"#).unwrap();
        assert_eq!(settings.window.title, "quad");
        assert!(!settings.window.vsync);
        assert_eq!(settings.window.size, WindowParams::default().size);
        assert_eq!(settings.clear_color, Settings::default().clear_color);
        assert!(settings.ui);
    }

    #[test]
    fn empty() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
        assert!(Settings::from_json("[]").is_err());
    }

    #[test]
    fn missing_file() {
        let settings = Settings::load_or_default("tests/resources/_missing_.json").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(Settings::load("tests/resources/_missing_.json").is_err());
    }
}
