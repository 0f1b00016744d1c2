// crates/geostream-core/src/resolver.rs

//! # Feature boundary resolver
//!
//! A k-way merge over the five marker occurrence streams drives a small
//! bracket/object automaton. The automaton keeps an explicit stack of open
//! frames and emits one [`FeatureBoundary`] per top-level `Feature` object,
//! together with the byte span of its `geometry.coordinates` array when one
//! was seen.
//!
//! Nested `[` inside an already-tracked coordinate array is paired eagerly
//! with the next unconsumed `]`, so nesting depth inside coordinates never
//! touches the frame stack; only the outer span of the array is needed.

use tracing::debug;

use crate::buffer::Span;
use crate::error::{GeoStreamError, Result};
use crate::sequence::ChunkedSequence;

/// Resolved byte span of one top-level `Feature` object.
///
/// `coordinates`, when present, is strictly nested inside `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureBoundary {
    pub start: usize,
    pub end: usize,
    pub coordinates: Option<Span>,
}

impl FeatureBoundary {
    /// Number of bytes the feature covers, endpoints included.
    pub fn byte_len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// The five occurrence streams, in the order the scanner produced them.
pub struct MarkerOccurrences {
    pub brace_open: ChunkedSequence<usize>,
    pub brace_close: ChunkedSequence<usize>,
    pub bracket_open: ChunkedSequence<usize>,
    pub bracket_close: ChunkedSequence<usize>,
    pub feature: ChunkedSequence<usize>,
}

impl MarkerOccurrences {
    /// Rebinds the scanner's output (ordered like [`crate::scanner::MARKERS`])
    /// to named streams. Missing streams become empty.
    pub fn from_streams(streams: Vec<ChunkedSequence<usize>>) -> Self {
        let mut streams = streams.into_iter();
        Self {
            brace_open: streams.next().unwrap_or_default(),
            brace_close: streams.next().unwrap_or_default(),
            bracket_open: streams.next().unwrap_or_default(),
            bracket_close: streams.next().unwrap_or_default(),
            feature: streams.next().unwrap_or_default(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FrameKind {
    Object,
    Array,
}

/// Transient automaton state for one open `{` or `[`.
struct Frame {
    kind: FrameKind,
    start: usize,
    is_feature: bool,
    coordinates: Option<Span>,
}

// Stream indices in the merge.
const BRACE_OPEN: usize = 0;
const BRACE_CLOSE: usize = 1;
const BRACKET_OPEN: usize = 2;
const BRACKET_CLOSE: usize = 3;
const FEATURE: usize = 4;

/// Runs the automaton over the occurrence streams and returns the feature
/// boundaries in file order.
pub fn resolve(occ: &MarkerOccurrences) -> Result<Vec<FeatureBoundary>> {
    let streams = [
        &occ.brace_open,
        &occ.brace_close,
        &occ.bracket_open,
        &occ.bracket_close,
        &occ.feature,
    ];
    let mut cursors = [0usize; 5];

    let mut stack: Vec<Frame> = Vec::new();
    let mut boundaries = Vec::new();

    loop {
        // Smallest unconsumed offset across the five streams; exhausted
        // streams drop out of the minimum.
        let mut min = usize::MAX;
        let mut which = None;
        for k in 0..streams.len() {
            if let Some(&offset) = streams[k].get(cursors[k]) {
                if offset < min {
                    min = offset;
                    which = Some(k);
                }
            }
        }
        let Some(which) = which else { break };

        match which {
            BRACE_OPEN => {
                cursors[BRACE_OPEN] += 1;
                stack.push(Frame {
                    kind: FrameKind::Object,
                    start: min,
                    is_feature: false,
                    coordinates: None,
                });
            }
            BRACE_CLOSE => {
                let frame = match stack.pop() {
                    Some(frame) if frame.kind == FrameKind::Object => frame,
                    _ => return Err(GeoStreamError::UnbalancedBrace(min)),
                };
                cursors[BRACE_CLOSE] += 1;
                if frame.is_feature {
                    boundaries.push(FeatureBoundary {
                        start: frame.start,
                        end: min,
                        coordinates: frame.coordinates,
                    });
                }
            }
            BRACKET_OPEN => {
                cursors[BRACKET_OPEN] += 1;
                if stack.last().is_some_and(|f| f.kind == FrameKind::Array) {
                    // Nested open inside a tracked coordinate array: pair it
                    // eagerly with the next unconsumed `]`. Coordinate arrays
                    // contain no object braces, so only the outer span matters.
                    cursors[BRACKET_CLOSE] += 1;
                } else {
                    stack.push(Frame {
                        kind: FrameKind::Array,
                        start: min,
                        is_feature: false,
                        coordinates: None,
                    });
                }
            }
            BRACKET_CLOSE => {
                let frame = match stack.pop() {
                    Some(frame) if frame.kind == FrameKind::Array => frame,
                    _ => return Err(GeoStreamError::UnbalancedBracket(min)),
                };
                cursors[BRACKET_CLOSE] += 1;
                // Record the closed array on the innermost enclosing Feature.
                let span = Span::new(frame.start, min);
                for enclosing in stack.iter_mut().rev() {
                    if enclosing.is_feature {
                        enclosing.coordinates = Some(span);
                        break;
                    }
                }
            }
            FEATURE => match stack.last_mut() {
                Some(frame) if frame.kind == FrameKind::Object => {
                    cursors[FEATURE] += 1;
                    frame.is_feature = true;
                }
                _ => return Err(GeoStreamError::FeatureOutsideObject(min)),
            },
            _ => unreachable!("merge only selects one of the five streams"),
        }
    }

    if !stack.is_empty() {
        return Err(GeoStreamError::UnterminatedStructure);
    }

    debug!(features = boundaries.len(), "feature boundaries resolved");
    Ok(boundaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ChunkedByteBuffer;
    use crate::scanner::{self, MARKERS};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn occurrences_for(text: &str) -> MarkerOccurrences {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file.flush().unwrap();

        let mut buffer = ChunkedByteBuffer::with_segment_size(16);
        buffer.load(file.path()).unwrap();
        MarkerOccurrences::from_streams(scanner::scan(&buffer, &MARKERS, 8))
    }

    const TWO_POINTS: &str = concat!(
        r#"{"type":"FeatureCollection","features":["#,
        r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1,2]}},"#,
        r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[3,4]}}"#,
        r#"]}"#
    );

    #[test]
    fn resolves_two_features_with_coordinate_spans() {
        let boundaries = resolve(&occurrences_for(TWO_POINTS)).unwrap();
        assert_eq!(boundaries.len(), 2);

        for boundary in &boundaries {
            let span = boundary.coordinates.expect("point features have coordinates");
            assert!(boundary.start < span.start);
            assert!(span.end < boundary.end);
        }
        assert!(boundaries[0].end < boundaries[1].start);

        // spans point at the bracketed coordinate arrays
        let first = boundaries[0].coordinates.unwrap();
        assert_eq!(
            &TWO_POINTS[first.start..=first.end],
            "[1,2]"
        );
        let second = boundaries[1].coordinates.unwrap();
        assert_eq!(
            &TWO_POINTS[second.start..=second.end],
            "[3,4]"
        );
    }

    #[test]
    fn nested_rings_collapse_to_the_outer_span() {
        let text = concat!(
            r#"{"type":"FeatureCollection","features":["#,
            r#"{"type":"Feature","properties":{},"geometry":"#,
            r#"{"type":"Polygon","coordinates":[[[1,2],[3,4]],[[5,6],[7,8]]]}}"#,
            r#"]}"#
        );
        let boundaries = resolve(&occurrences_for(text)).unwrap();
        assert_eq!(boundaries.len(), 1);

        let span = boundaries[0].coordinates.unwrap();
        assert_eq!(&text[span.start..=span.end], "[[[1,2],[3,4]],[[5,6],[7,8]]]");
    }

    #[test]
    fn feature_without_coordinates_has_no_span() {
        let text = r#"{"features":[{"type":"Feature","properties":{}}]}"#;
        let boundaries = resolve(&occurrences_for(text)).unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].coordinates, None);
    }

    #[test]
    fn unbalanced_close_brace() {
        let err = resolve(&occurrences_for(r#"{"a":1}}"#)).unwrap_err();
        assert!(matches!(err, GeoStreamError::UnbalancedBrace(7)));
    }

    #[test]
    fn unbalanced_close_bracket() {
        let err = resolve(&occurrences_for(r#"{"a":1}]"#)).unwrap_err();
        assert!(matches!(err, GeoStreamError::UnbalancedBracket(7)));
    }

    #[test]
    fn feature_marker_outside_an_object() {
        // the literal lands while an array frame is on top of the stack
        let err = resolve(&occurrences_for(r#"{"a":["Feature"]}"#)).unwrap_err();
        assert!(matches!(err, GeoStreamError::FeatureOutsideObject(7)));
    }

    #[test]
    fn unterminated_structure() {
        let err = resolve(&occurrences_for(r#"{"a":{"b":1}"#)).unwrap_err();
        assert!(matches!(err, GeoStreamError::UnterminatedStructure));
    }

    #[test]
    fn empty_input_resolves_to_nothing() {
        let boundaries = resolve(&occurrences_for("")).unwrap();
        assert!(boundaries.is_empty());
    }
}
