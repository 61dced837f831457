//! Optional TOML configuration.
//!
//! ```toml
//! data_dir = "data"
//! log_level = "debug"
//!
//! [window]
//! title = "Font Examples"
//! width = 1024
//! height = 768
//!
//! [fonts]
//! text_size = 16.0
//! embedded_size = 10.0
//! extended_latin = true
//! merge_icons = true
//! big_icons = true
//! ```
//!
//! Every field is optional.

use crate::ShowcaseResult;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "font-showcase.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory font files are loaded from.
    pub data_dir: PathBuf,
    pub log_level: LevelFilter,
    pub window: WindowSettings,
    pub fonts: FontSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_level: LevelFilter::Debug,
            window: WindowSettings::default(),
            fonts: FontSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Font Examples".to_owned(),
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// Size of the text font, in pixels.
    pub text_size: f32,
    /// Size of the font compiled into the binary, in pixels.
    pub embedded_size: f32,
    /// Load Latin Extended glyphs in the text font. Without them Polish text is not rendered.
    pub extended_latin: bool,
    /// Merge icons into the text font instead of loading them as a separate font.
    pub merge_icons: bool,
    pub big_icons: bool,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            text_size: 16.0,
            embedded_size: 10.0,
            extended_latin: true,
            merge_icons: true,
            big_icons: true,
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> ShowcaseResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> ShowcaseResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Loads `path` or, when not given, [`DEFAULT_SETTINGS_FILE`] if it exists.
    pub fn load_or_default(path: Option<&Path>) -> ShowcaseResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_SETTINGS_FILE))
            }
            None => Ok(Self::default()),
        }
    }
}
