//! geostream-cli — Command-line interface for geostream-core
//!
//! This binary streams top-level features out of GeoJSON `FeatureCollection`
//! files that are too large to parse in one piece. It supports printing
//! document statistics and emitting the parsed features one per line.
//!
//! Usage examples
//! --------------
//!
//! - Show document stats
//!   $ geostream-cli stats world.geojson
//!
//! - Print the first ten features
//!   $ geostream-cli features world.geojson --limit 10
//!
//! - Force the split parse path with a tiny threshold
//!   $ geostream-cli --max-direct-parse-bytes 1 features world.geojson
//!
//! Set RUST_LOG=geostream_core=debug to see the load/scan/resolve phases.
mod args;

use crate::args::{CliArgs, Commands};
use clap::Parser;
use geostream_core::{FeatureCollection, StreamConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();

    let mut config = StreamConfig::default();
    if let Some(segment_size) = args.segment_size {
        config.segment_size = segment_size;
    }
    if let Some(threshold) = args.max_direct_parse_bytes {
        config.max_direct_parse_bytes = threshold;
    }

    match args.command {
        Commands::Stats { file } => {
            let mut collection = FeatureCollection::new(config)?;
            collection.load(&file)?;

            let stats = collection.stats();
            println!("Document statistics:");
            println!("  Bytes: {}", stats.bytes);
            println!("  Segments: {}", stats.segments);
            println!("  Features: {}", stats.features);
        }

        Commands::Features { file, limit, pretty } => {
            let mut collection = FeatureCollection::new(config)?;
            collection.load(&file)?;

            let limit = limit.unwrap_or(usize::MAX);
            for feature in collection.features()?.take(limit) {
                let feature = feature?;
                if pretty {
                    println!("{}", serde_json::to_string_pretty(&feature)?);
                } else {
                    println!("{feature}");
                }
            }
        }
    }

    Ok(())
}
