// crates/geostream-core/src/buffer.rs

//! # Chunked byte buffer
//!
//! Holds a whole GeoJSON document in memory as an ordered list of fixed-size
//! segments instead of one contiguous allocation. A global byte offset `g`
//! maps to segment `g / segment_size`, index `g % segment_size`; every
//! operation that crosses a segment boundary goes through that arithmetic so
//! callers never see the segmentation.
//!
//! The only place a contiguous copy is ever made is [`ChunkedByteBuffer::slice_to_text`],
//! and only for the requested span.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{GeoStreamError, Result};

/// Byte range with inclusive endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered, endpoints included.
    pub fn byte_len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// An ordered list of fixed-size byte segments loaded from one file.
///
/// Immutable once [`load`](Self::load) completes; the collection reads it for
/// the rest of its lifetime without copying the file again.
#[derive(Debug)]
pub struct ChunkedByteBuffer {
    segment_size: usize,
    segments: Vec<Vec<u8>>,
    len: usize,
}

impl ChunkedByteBuffer {
    pub fn with_segment_size(segment_size: usize) -> Self {
        debug_assert!(segment_size > 0);
        Self {
            segment_size,
            segments: Vec::new(),
            len: 0,
        }
    }

    /// Reads the file at `path` into segments of at most `segment_size`
    /// bytes. The fill loop is reader-agnostic (it reads until EOF rather
    /// than pre-statting the file) so gzip sources decode through the same
    /// path.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut reader = open_stream(path)?;

        // Replace, never append: a short segment mid-list would break the
        // divide/modulo addressing.
        self.segments.clear();
        self.len = 0;

        loop {
            let mut segment = vec![0u8; self.segment_size];
            let mut filled = 0;
            while filled < segment.len() {
                let n = reader.read(&mut segment[filled..])?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            if filled == 0 {
                break;
            }
            segment.truncate(filled);
            self.len += filled;
            let at_eof = filled < self.segment_size;
            self.segments.push(segment);
            if at_eof {
                break;
            }
        }

        debug!(
            bytes = self.len,
            segments = self.segments.len(),
            "loaded document into chunked buffer"
        );
        Ok(())
    }

    /// Total byte length of the loaded document.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Byte at global `offset`. O(1). Callers must stay below
    /// [`len`](Self::len); the scanner and resolver do so by construction.
    #[inline]
    pub fn byte_at(&self, offset: usize) -> u8 {
        debug_assert!(offset < self.len);
        self.segments[offset / self.segment_size][offset % self.segment_size]
    }

    /// Byte-for-byte comparison of `pattern` against `[offset, offset + pattern.len())`.
    ///
    /// Reads through the addressing function, so the match may straddle
    /// segment boundaries without allocating. Returns `false` when the range
    /// would run past the end of the buffer.
    pub fn matches_at(&self, pattern: &[u8], offset: usize) -> bool {
        if offset + pattern.len() > self.len {
            return false;
        }
        pattern
            .iter()
            .enumerate()
            .all(|(i, &expected)| self.byte_at(offset + i) == expected)
    }

    /// Materializes `[start, end]` (end inclusive) as one owned string.
    pub fn slice_to_text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.slice_to_bytes(start, end)).into_owned()
    }

    fn slice_to_bytes(&self, start: usize, end: usize) -> Vec<u8> {
        debug_assert!(start <= end && end < self.len);
        let first = start / self.segment_size;
        let last = end / self.segment_size;
        let start_in_first = start % self.segment_size;
        let end_in_last = end % self.segment_size;

        if first == last {
            // both endpoints in one segment
            self.segments[first][start_in_first..=end_in_last].to_vec()
        } else if last - first == 1 {
            // endpoints in adjacent segments
            let mut out = Vec::with_capacity(end - start + 1);
            out.extend_from_slice(&self.segments[first][start_in_first..]);
            out.extend_from_slice(&self.segments[last][..=end_in_last]);
            out
        } else {
            // the span covers whole segments in the middle
            let mut out = Vec::with_capacity(end - start + 1);
            out.extend_from_slice(&self.segments[first][start_in_first..]);
            for segment in &self.segments[first + 1..last] {
                out.extend_from_slice(segment);
            }
            out.extend_from_slice(&self.segments[last][..=end_in_last]);
            out
        }
    }

    /// Slices `[start, end]` and parses it as one JSON document.
    pub fn slice_to_value(&self, start: usize, end: usize) -> Result<Value> {
        let text = self.slice_to_text(start, end);
        serde_json::from_str(&text).map_err(|source| GeoStreamError::Json { text, source })
    }

    /// Concatenates the given spans in order and parses the result as one
    /// JSON document.
    ///
    /// The caller must pick spans whose concatenation is itself valid JSON.
    /// The collection uses this to parse a feature with the contents of its
    /// coordinates array cut out: the spans keep the array's `[` and `]`
    /// bytes, so the skeleton still reads `"coordinates":[]`.
    pub fn multi_slice_to_value(&self, spans: &[Span]) -> Result<Value> {
        let mut text = String::new();
        for span in spans {
            text.push_str(&self.slice_to_text(span.start, span.end));
        }
        serde_json::from_str(&text).map_err(|source| GeoStreamError::Json { text, source })
    }
}

/// Opens a file, buffers it, and (with the `compact` feature) transparently
/// decodes `.gz` sources. Returns a generic reader so the segment fill loop
/// doesn't care about compression.
fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GeoStreamError::NotFound(format!("GeoJSON not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    if path.extension().is_some_and(|ext| ext == "gz") {
        use flate2::read::GzDecoder;
        return Ok(Box::new(GzDecoder::new(reader)));
    }

    Ok(Box::new(reader))
}
