//! Sub-configuration structs with defaults matching the original catalog tool.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::LabelMode;

/// Photo library settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory tree to catalog
    pub root: PathBuf,

    /// Supported input extensions (compared case-insensitively)
    pub supported_formats: Vec<String>,

    /// Filename prefix of platform sidecar files to skip
    pub sidecar_prefix: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("~/Pictures"),
            supported_formats: vec![
                "nef".to_string(),
                "dng".to_string(),
                "tiff".to_string(),
                "png".to_string(),
                "jpeg".to_string(),
                "jpg".to_string(),
                "cr2".to_string(),
                "bmp".to_string(),
                "gif".to_string(),
            ],
            sidecar_prefix: "._".to_string(),
        }
    }
}

/// Catalog backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite catalog file
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("~/.photocat/catalog.db"),
        }
    }
}

/// One `(trigger, category)` pair of the tagging vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBinding {
    /// Single key that picks the category
    pub trigger: char,

    /// Category token written into `labels`
    pub category: String,
}

impl CategoryBinding {
    pub fn new(trigger: char, category: impl Into<String>) -> Self {
        Self {
            trigger,
            category: category.into(),
        }
    }
}

/// Tagging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Single-select or multi-select labels
    pub mode: LabelMode,

    /// Ordered category vocabulary with key triggers
    pub categories: Vec<CategoryBinding>,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            mode: LabelMode::Multi,
            categories: vec![
                CategoryBinding::new('p', "people"),
                CategoryBinding::new('c', "city"),
                CategoryBinding::new('l', "landscape"),
                CategoryBinding::new('w', "water"),
                CategoryBinding::new('g', "gf"),
                CategoryBinding::new('f', "family"),
                CategoryBinding::new('[', "portfolio"),
                CategoryBinding::new('o', "objects"),
                CategoryBinding::new('a', "animals"),
                CategoryBinding::new('t', "trees"),
                CategoryBinding::new('s', "seasonal"),
                CategoryBinding::new('n', "nature"),
                CategoryBinding::new('x', "abstract"),
            ],
        }
    }
}

/// Display fitting for the materialized photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum display width in pixels
    pub max_width: u32,

    /// Maximum display height in pixels
    pub max_height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_width: 1400,
            max_height: 1000,
        }
    }
}

/// Export output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
