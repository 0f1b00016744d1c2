// crates/geostream-core/src/collection.rs

//! # Feature collection
//!
//! Owns the chunked buffer and the resolved feature boundaries, and hands out
//! parsed features one at a time. Per feature it picks between a whole-slice
//! serde_json parse and the split path (skeleton via serde_json, coordinates
//! via the iterative number parser) based on the configured byte threshold.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::buffer::{ChunkedByteBuffer, Span};
use crate::error::{GeoStreamError, Result};
use crate::numbers;
use crate::resolver::{self, FeatureBoundary, MarkerOccurrences};
use crate::scanner;

/// Construction-time configuration, resolved once and validated before use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Bytes per buffer segment.
    pub segment_size: usize,
    /// Features at or above this byte length are split-parsed: skeleton via
    /// serde_json, coordinates via the iterative number parser.
    pub max_direct_parse_bytes: usize,
    /// Elements per segment of the scanner's occurrence streams.
    pub sequence_segment_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            segment_size: 250_000_000,
            max_direct_parse_bytes: 250_000_000,
            sequence_segment_capacity: 10_000_000,
        }
    }
}

impl StreamConfig {
    fn validate(&self) -> Result<()> {
        if self.segment_size == 0 {
            return Err(GeoStreamError::InvalidConfig(
                "segment_size must be positive".into(),
            ));
        }
        if self.max_direct_parse_bytes == 0 {
            return Err(GeoStreamError::InvalidConfig(
                "max_direct_parse_bytes must be positive".into(),
            ));
        }
        if self.sequence_segment_capacity == 0 {
            return Err(GeoStreamError::InvalidConfig(
                "sequence_segment_capacity must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Simple aggregate statistics for a loaded collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CollectionStats {
    pub bytes: usize,
    pub segments: usize,
    pub features: usize,
}

/// A GeoJSON `FeatureCollection` held in segmented memory.
///
/// `load` runs the three sequential stages (fill buffer, scan, resolve) to
/// completion; afterwards the buffer is read-only and [`features`](Self::features)
/// may be called any number of times, each call yielding an independent
/// forward-only pass.
#[derive(Debug)]
pub struct FeatureCollection {
    buffer: ChunkedByteBuffer,
    boundaries: Vec<FeatureBoundary>,
    config: StreamConfig,
    loaded: bool,
}

impl FeatureCollection {
    /// Creates an empty collection with the given configuration.
    pub fn new(config: StreamConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            buffer: ChunkedByteBuffer::with_segment_size(config.segment_size),
            boundaries: Vec::new(),
            config,
            loaded: false,
        })
    }

    pub fn with_defaults() -> Self {
        let config = StreamConfig::default();
        Self {
            buffer: ChunkedByteBuffer::with_segment_size(config.segment_size),
            boundaries: Vec::new(),
            config,
            loaded: false,
        }
    }

    /// Loads the file at `path`, scans it, and resolves feature boundaries.
    ///
    /// Propagates I/O errors from the fill stage and structural errors from
    /// the resolver; on failure no partial state is exposed and
    /// [`features`](Self::features) keeps failing with
    /// [`GeoStreamError::NotLoaded`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.loaded = false;
        self.boundaries.clear();
        self.buffer = ChunkedByteBuffer::with_segment_size(self.config.segment_size);

        self.buffer.load(path.as_ref())?;

        let streams = scanner::scan(
            &self.buffer,
            &scanner::MARKERS,
            self.config.sequence_segment_capacity,
        );
        let occurrences = MarkerOccurrences::from_streams(streams);
        self.boundaries = resolver::resolve(&occurrences)?;

        self.loaded = true;
        debug!(
            bytes = self.buffer.len(),
            features = self.boundaries.len(),
            "feature collection loaded"
        );
        Ok(())
    }

    pub fn stats(&self) -> CollectionStats {
        CollectionStats {
            bytes: self.buffer.len(),
            segments: self.buffer.segment_count(),
            features: self.boundaries.len(),
        }
    }

    pub fn feature_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Resolved feature boundaries, in file order.
    pub fn boundaries(&self) -> &[FeatureBoundary] {
        &self.boundaries
    }

    /// Lazy, forward-only sequence of parsed feature values in file order.
    ///
    /// Each pull parses exactly one feature; a parse failure is yielded for
    /// that feature without affecting later pulls. Fails with
    /// [`GeoStreamError::NotLoaded`] before a successful [`load`](Self::load).
    pub fn features(&self) -> Result<Features<'_>> {
        if !self.loaded {
            return Err(GeoStreamError::NotLoaded);
        }
        Ok(Features {
            collection: self,
            cursor: 0,
        })
    }

    fn parse_feature(&self, boundary: &FeatureBoundary) -> Result<Value> {
        let byte_count = boundary.end - boundary.start;

        // Features below the threshold, and features without a recorded
        // coordinates span, are parsed whole.
        let coords = match boundary.coordinates {
            Some(span) if byte_count >= self.config.max_direct_parse_bytes => span,
            _ => return self.buffer.slice_to_value(boundary.start, boundary.end),
        };

        // Split path: the skeleton spans keep the `[` and `]` of the
        // coordinate array, so the excised feature still parses as a complete
        // object with "coordinates":[].
        let skeleton_spans = [
            Span::new(boundary.start, coords.start),
            Span::new(coords.end, boundary.end),
        ];
        let mut feature = self.buffer.multi_slice_to_value(&skeleton_spans)?;

        // The recorded span is only a coordinate payload if the feature has a
        // geometry.coordinates slot to put it back into. Otherwise the array
        // lives elsewhere (e.g. under properties, with geometry null) and the
        // feature must be re-parsed whole.
        let Some(slot) = feature.pointer_mut("/geometry/coordinates") else {
            return self.buffer.slice_to_value(boundary.start, boundary.end);
        };
        *slot = numbers::parse(&self.buffer, coords.start, coords.end)?;
        Ok(feature)
    }
}

/// Pull-driven iterator over parsed features. Each `next` performs bounded
/// work (one slice/parse); abandoning it mid-iteration is safe.
pub struct Features<'a> {
    collection: &'a FeatureCollection,
    cursor: usize,
}

impl Iterator for Features<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let boundary = self.collection.boundaries.get(self.cursor)?;
        self.cursor += 1;
        Some(self.collection.parse_feature(boundary))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.collection.boundaries.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Features<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sizes_are_rejected() {
        for config in [
            StreamConfig {
                segment_size: 0,
                ..Default::default()
            },
            StreamConfig {
                max_direct_parse_bytes: 0,
                ..Default::default()
            },
            StreamConfig {
                sequence_segment_capacity: 0,
                ..Default::default()
            },
        ] {
            let err = FeatureCollection::new(config).unwrap_err();
            assert!(matches!(err, GeoStreamError::InvalidConfig(_)));
        }
    }

    #[test]
    fn features_before_load_fails() {
        let collection = FeatureCollection::with_defaults();
        let err = collection.features().err().expect("must fail before load");
        assert!(matches!(err, GeoStreamError::NotLoaded));
    }
}
