// crates/geostream-core/src/sequence.rs

//! A growable sequence stored in fixed-capacity segments.
//!
//! Occurrence streams produced by the scanner can hold hundreds of millions
//! of offsets; storing them in one `Vec` would force a single giant
//! reallocation-heavy buffer. [`ChunkedSequence`] keeps the elements in
//! segments and addresses them with the same `(index / capacity,
//! index % capacity)` arithmetic the byte buffer uses.

/// Growable sequence of `T` composed of fixed-capacity segments.
///
/// `push` is amortized O(1) and `get` is O(1). There is no removal.
#[derive(Debug, Clone)]
pub struct ChunkedSequence<T> {
    segment_capacity: usize,
    segments: Vec<Vec<T>>,
    len: usize,
}

impl<T> ChunkedSequence<T> {
    /// Elements per segment when none is specified. Matches the default
    /// occurrence-stream sizing of [`StreamConfig`](crate::StreamConfig).
    pub const DEFAULT_SEGMENT_CAPACITY: usize = 10_000_000;

    pub fn new() -> Self {
        Self::with_segment_capacity(Self::DEFAULT_SEGMENT_CAPACITY)
    }

    /// Creates an empty sequence whose segments hold `segment_capacity`
    /// elements each. `segment_capacity` must be non-zero; the collection
    /// validates this before any sequence is built.
    pub fn with_segment_capacity(segment_capacity: usize) -> Self {
        debug_assert!(segment_capacity > 0);
        Self {
            segment_capacity,
            segments: Vec::new(),
            len: 0,
        }
    }

    /// Appends `value`, opening a fresh segment only when the tail is full.
    pub fn push(&mut self, value: T) {
        let tail_full = self
            .segments
            .last()
            .map_or(true, |tail| tail.len() == self.segment_capacity);
        if tail_full {
            self.segments.push(Vec::new());
        }
        if let Some(tail) = self.segments.last_mut() {
            tail.push(value);
        }
        self.len += 1;
    }

    /// Returns the element at `index`, or `None` past the end. The resolver
    /// leans on the `None` case to treat exhausted streams as +infinity.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let segment = index / self.segment_capacity;
        let within = index % self.segment_capacity;
        self.segments.get(segment).and_then(|s| s.get(within))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.segments.iter().flatten()
    }
}

impl<T> Default for ChunkedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for ChunkedSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}
