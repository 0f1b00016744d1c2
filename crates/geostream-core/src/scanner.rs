// crates/geostream-core/src/scanner.rs

//! # Structural scanner
//!
//! One linear pass over the chunked buffer that records, for a fixed set of
//! markers, every byte offset where the marker occurs. This replaces a
//! general JSON tokenizer: the boundary resolver only needs to know where
//! `{`, `}`, `[`, `]` and the `Feature"` literal sit.
//!
//! Markers are checked in the order given, single-byte markers before
//! multi-byte literals; the first match wins and a literal match advances the
//! cursor past the whole literal. The marker set is chosen so no marker is a
//! prefix of another.

use tracing::debug;

use crate::buffer::ChunkedByteBuffer;
use crate::sequence::ChunkedSequence;

pub const BRACE_OPEN: &[u8] = b"{";
pub const BRACE_CLOSE: &[u8] = b"}";
pub const BRACKET_OPEN: &[u8] = b"[";
pub const BRACKET_CLOSE: &[u8] = b"]";
/// Tail of `"type":"Feature"`; long enough to never match the
/// `"FeatureCollection"` type tag or a `"features"` key.
pub const FEATURE_LITERAL: &[u8] = b"Feature\"";

/// The marker set the boundary resolver consumes, in stream order.
pub const MARKERS: [&[u8]; 5] = [
    BRACE_OPEN,
    BRACE_CLOSE,
    BRACKET_OPEN,
    BRACKET_CLOSE,
    FEATURE_LITERAL,
];

/// Scans `buffer` once and returns one occurrence stream per marker, indexed
/// like `markers`. Each stream is strictly increasing because the scan is a
/// single forward pass.
///
/// `sequence_segment_capacity` sizes the segments of the produced streams.
pub fn scan(
    buffer: &ChunkedByteBuffer,
    markers: &[&[u8]],
    sequence_segment_capacity: usize,
) -> Vec<ChunkedSequence<usize>> {
    let mut occurrences: Vec<ChunkedSequence<usize>> = markers
        .iter()
        .map(|_| ChunkedSequence::with_segment_capacity(sequence_segment_capacity))
        .collect();

    // Partition by literal length, keeping each marker's original stream index.
    let single: Vec<(usize, u8)> = markers
        .iter()
        .enumerate()
        .filter(|(_, m)| m.len() == 1)
        .map(|(j, m)| (j, m[0]))
        .collect();
    let multi: Vec<(usize, &[u8])> = markers
        .iter()
        .enumerate()
        .filter(|(_, m)| m.len() > 1)
        .map(|(j, m)| (j, *m))
        .collect();

    let len = buffer.len();
    let mut i = 0;
    'bytes: while i < len {
        let byte = buffer.byte_at(i);

        for &(j, marker) in &single {
            if byte == marker {
                occurrences[j].push(i);
                i += 1;
                continue 'bytes;
            }
        }

        for &(j, literal) in &multi {
            if byte == literal[0] && buffer.matches_at(literal, i) {
                occurrences[j].push(i);
                i += literal.len();
                continue 'bytes;
            }
        }

        i += 1;
    }

    debug!(
        bytes = len,
        occurrences = occurrences.iter().map(ChunkedSequence::len).sum::<usize>(),
        "structural scan complete"
    );
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn buffer_from(content: &[u8], segment_size: usize) -> ChunkedByteBuffer {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();

        let mut buffer = ChunkedByteBuffer::with_segment_size(segment_size);
        buffer.load(file.path()).unwrap();
        buffer
    }

    fn offsets(seq: &ChunkedSequence<usize>) -> Vec<usize> {
        seq.iter().copied().collect()
    }

    #[test]
    fn records_single_byte_markers() {
        let buffer = buffer_from(b"{\"a\":[1,2]}", 4);
        let occ = scan(&buffer, &MARKERS, 8);

        assert_eq!(offsets(&occ[0]), vec![0]); // {
        assert_eq!(offsets(&occ[1]), vec![10]); // }
        assert_eq!(offsets(&occ[2]), vec![5]); // [
        assert_eq!(offsets(&occ[3]), vec![9]); // ]
        assert!(occ[4].is_empty());
    }

    #[test]
    fn records_feature_literal_once_per_match() {
        let text = br#"{"type":"Feature","x":"Feature"}"#;
        let buffer = buffer_from(text, 5);
        let occ = scan(&buffer, &MARKERS, 8);

        // offsets of the two `Feature"` literals
        assert_eq!(offsets(&occ[4]), vec![9, 23]);
    }

    #[test]
    fn feature_collection_tag_is_not_a_feature_marker() {
        let text = br#"{"type":"FeatureCollection","features":[]}"#;
        let buffer = buffer_from(text, 7);
        let occ = scan(&buffer, &MARKERS, 8);

        assert!(occ[4].is_empty());
    }

    #[test]
    fn literal_match_straddling_a_segment_boundary() {
        let text = br#"{"type":"Feature"}"#;
        // segment size 3 forces the literal across several segments
        let buffer = buffer_from(text, 3);
        let occ = scan(&buffer, &MARKERS, 8);

        assert_eq!(offsets(&occ[4]), vec![9]);
    }

    #[test]
    fn streams_are_strictly_increasing() {
        let text = br#"{"a":{"b":[[1],[2]]},"c":{}}"#;
        let buffer = buffer_from(text, 6);
        let occ = scan(&buffer, &MARKERS, 4);

        for stream in &occ {
            let offs = offsets(stream);
            assert!(offs.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
