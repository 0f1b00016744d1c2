//! Error handling example for geostream-rs
//!
//! This example demonstrates the error taxonomy and edge cases

use std::fs;

use geostream_core::{FeatureCollection, GeoStreamError, Result};

fn main() -> Result<()> {
    println!("=== geostream-rs Error Handling Example ===\n");

    // Example 1: Pulling features before loading anything
    println!("--- Example 1: features() before load ---");
    let collection = FeatureCollection::with_defaults();
    match collection.features() {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  ✗ {e}"),
    }
    println!();

    // Example 2: Missing file
    println!("--- Example 2: Missing file ---");
    let mut collection = FeatureCollection::with_defaults();
    match collection.load("/no/such/path.geojson") {
        Ok(()) => println!("  unexpected success"),
        Err(e) => println!("  ✗ {e}"),
    }
    println!();

    // Example 3: Structurally broken document
    println!("--- Example 3: Unbalanced close brace ---");
    let broken = std::env::temp_dir().join("geostream_broken.geojson");
    fs::write(&broken, r#"{"type":"FeatureCollection","features":[]}}"#)?;

    let mut collection = FeatureCollection::with_defaults();
    match collection.load(&broken) {
        Ok(()) => println!("  unexpected success"),
        Err(GeoStreamError::UnbalancedBrace(offset)) => {
            println!("  ✗ unbalanced '}}' at byte {offset}");
        }
        Err(e) => println!("  ✗ {e}"),
    }
    fs::remove_file(&broken).ok();
    println!();

    // Example 4: A good document loads after a failed attempt
    println!("--- Example 4: Recovery after failure ---");
    let good = std::env::temp_dir().join("geostream_good.geojson");
    fs::write(
        &good,
        r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1,2]}}]}"#,
    )?;

    collection.load(&good)?;
    println!("  ✓ loaded {} feature(s)", collection.feature_count());
    for feature in collection.features()? {
        println!("  {}", feature?);
    }
    fs::remove_file(&good).ok();

    Ok(())
}
