//! Workspace wrapper crate. The library lives in [`geostream_core`]; this
//! crate re-exports it so the root demos can depend on one package.

pub use geostream_core::*;
