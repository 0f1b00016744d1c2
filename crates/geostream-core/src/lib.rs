// crates/geostream-core/src/lib.rs

//! # geostream-core
//!
//! Streams and incrementally parses GeoJSON `FeatureCollection` documents
//! whose size exceeds what a single in-memory allocation can comfortably
//! hold. The document is loaded once into fixed-size segments, scanned in a
//! single pass for structural markers, and each top-level `Feature` is then
//! parsed lazily from its byte span — the whole document is never fed through
//! a general JSON parser.
//!
//! ```no_run
//! use geostream_core::{FeatureCollection, Result};
//!
//! fn main() -> Result<()> {
//!     let mut collection = FeatureCollection::with_defaults();
//!     collection.load("features.geojson")?;
//!
//!     for feature in collection.features()? {
//!         println!("{}", feature?);
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod buffer;
pub mod collection;
pub mod error;
pub mod numbers;
pub mod resolver;
pub mod scanner;
pub mod sequence;

// Re-exports
pub use crate::buffer::{ChunkedByteBuffer, Span};
pub use crate::collection::{CollectionStats, FeatureCollection, Features, StreamConfig};
pub use crate::error::{GeoStreamError, Result};
pub use crate::resolver::FeatureBoundary;
pub use crate::sequence::ChunkedSequence;
