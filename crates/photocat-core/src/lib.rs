//! Photocat Core - photo cataloging pipeline and tagging session.
//!
//! Walks a photo library, decodes each photo (standard formats and camera
//! RAW), reads its fingerprint and EXIF fields, and lets an operator attach
//! categories, a rating and deletion flags. Records land in a catalog keyed
//! by content fingerprint, so a moved or renamed file keeps its tags.
//!
//! # Architecture
//!
//! ```text
//! Discover → Decode → Orient → Fit ─┐
//!                                   ├→ TaggingSession → CatalogStore
//! Hash + File attributes + EXIF ────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use photocat_core::{Config, SqliteCatalog, TaggingSession};
//!
//! let config = Config::load()?;
//! let store = SqliteCatalog::open(&config.catalog_path())?;
//! let mut session = TaggingSession::start(&config, &config.library_root(), store)?;
//!
//! session.load_current()?;
//! session.toggle_category("landscape")?;
//! session.set_rating(3)?;
//! session.save()?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod tagging;
pub mod types;

pub use catalog::{CatalogStore, SqliteCatalog};
pub use config::Config;
pub use error::{
    ConfigError, PhotocatError, PipelineError, PipelineResult, Result, SessionError,
    SessionResult, StoreError, StoreResult,
};
pub use output::{ExportFormat, ExportSummary, RecordExporter};
pub use pipeline::{ImageProcessor, MaterializedPhoto};
pub use tagging::{
    CategoryMap, Labels, NavOutcome, PendingTags, SessionPhase, SessionState, TagMutation,
    TaggingSession,
};
pub use types::{ExifData, LabelMode, PhotoRecord, UNREADABLE_LABEL};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
