//! Basic usage example for geostream-rs
//!
//! This example demonstrates how to:
//! - Load a GeoJSON FeatureCollection into segmented memory
//! - Inspect the resolved feature boundaries
//! - Pull parsed features lazily
//! - Force the split parse path with a tiny threshold

use geostream_core::{FeatureCollection, Result, StreamConfig};

fn main() -> Result<()> {
    println!("=== geostream-rs Basic Usage Example ===\n");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/data/sample.geojson".to_string());

    // Load the document
    println!("Loading {path}...");
    let mut collection = FeatureCollection::with_defaults();
    collection.load(&path)?;
    let stats = collection.stats();
    println!(
        "✓ Loaded {} bytes in {} segment(s), {} feature(s)\n",
        stats.bytes, stats.segments, stats.features
    );

    // Example 1: Resolved boundaries
    println!("--- Example 1: Feature boundaries ---");
    for (i, boundary) in collection.boundaries().iter().enumerate() {
        match boundary.coordinates {
            Some(span) => println!(
                "{}. bytes {}..={} (coordinates {}..={})",
                i + 1,
                boundary.start,
                boundary.end,
                span.start,
                span.end
            ),
            None => println!(
                "{}. bytes {}..={} (no coordinates array)",
                i + 1,
                boundary.start,
                boundary.end
            ),
        }
    }
    println!();

    // Example 2: Pull features lazily
    println!("--- Example 2: Parsed features ---");
    for feature in collection.features()? {
        let feature = feature?;
        let name = feature
            .pointer("/properties/name")
            .and_then(|v| v.as_str())
            .unwrap_or("<unnamed>");
        let geometry = feature
            .pointer("/geometry/type")
            .and_then(|v| v.as_str())
            .unwrap_or("<none>");
        println!("- {name} ({geometry})");
    }
    println!();

    // Example 3: Force the split path; the result is identical
    println!("--- Example 3: Split parse path ---");
    let mut split = FeatureCollection::new(StreamConfig {
        max_direct_parse_bytes: 1,
        ..Default::default()
    })?;
    split.load(&path)?;

    let direct: Vec<_> = collection.features()?.collect::<Result<_>>()?;
    let forced: Vec<_> = split.features()?.collect::<Result<_>>()?;
    println!(
        "Direct and split parse agree: {}",
        if direct == forced { "yes" } else { "no" }
    );

    println!("\n=== Example completed successfully ===");
    Ok(())
}
