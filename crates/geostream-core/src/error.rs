// crates/geostream-core/src/error.rs

//! Error taxonomy for the crate.
//!
//! Everything is fatal and carries the offending offset/byte/text where one
//! exists; nothing is retried or swallowed. Callers decide whether to abort
//! the whole collection or skip the feature that failed.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GeoStreamError>;

#[derive(Debug, Error)]
pub enum GeoStreamError {
    /// The source file could not be opened.
    #[error("{0}")]
    NotFound(String),

    /// Reading the source file failed mid-load.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A slice handed to serde_json was not valid JSON. The full offending
    /// text is kept so the failure can be diagnosed without re-reading the
    /// source file.
    #[error("failed to parse slice as JSON: {source}; offending text: {text}")]
    Json {
        text: String,
        #[source]
        source: serde_json::Error,
    },

    // --- Structural errors from boundary resolution ---
    #[error("unbalanced '}}' at byte {0}")]
    UnbalancedBrace(usize),

    #[error("unbalanced ']' at byte {0}")]
    UnbalancedBracket(usize),

    #[error("feature marker outside an object at byte {0}")]
    FeatureOutsideObject(usize),

    #[error("unterminated structure at end of input")]
    UnterminatedStructure,

    // --- Structural errors from the number-array parser ---
    #[error("unexpected array close at byte {0}")]
    UnexpectedArrayClose(usize),

    #[error("number outside array context at byte {0}")]
    NumberOutsideArray(usize),

    #[error("unexpected byte 0x{byte:02x} in number array at offset {offset}")]
    UnexpectedByte { byte: u8, offset: usize },

    #[error("invalid numeric token {text:?} at byte {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("number array did not terminate by byte {0}")]
    UnterminatedNumberArray(usize),

    // --- Usage errors ---
    #[error("no GeoJSON document was loaded")]
    NotLoaded,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
