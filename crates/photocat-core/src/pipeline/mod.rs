//! Photo pipeline stages.
//!
//! - **discovery**: Find catalogable files under a library root
//! - **hash**: SHA-256 content fingerprints
//! - **metadata**: File attributes and EXIF fields
//! - **decode**: Standard codecs plus the RAW path
//! - **orientation**: Rotate upright from EXIF orientation
//! - **display**: Fit to display bounds
//! - **processor**: Orchestrates the stages per file

pub mod decode;
pub mod discovery;
pub mod display;
pub mod hash;
pub mod metadata;
pub mod orientation;
pub mod processor;
pub mod raw;

pub use decode::{DecodePath, DecodedImage, ImageDecoder};
pub use discovery::FileDiscovery;
pub use display::DisplayFitter;
pub use hash::ContentHasher;
pub use metadata::MetadataExtractor;
pub use orientation::Rotation;
pub use processor::{ImageProcessor, MaterializedPhoto};
