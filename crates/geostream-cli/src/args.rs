use clap::{Parser, Subcommand};

/// CLI arguments for geostream-cli
#[derive(Debug, Parser)]
#[command(
    name = "geostream",
    version,
    about = "CLI for inspecting large GeoJSON FeatureCollections without parsing them whole"
)]
pub struct CliArgs {
    /// Bytes per buffer segment (default: 250000000)
    #[arg(long = "segment-size", global = true)]
    pub segment_size: Option<usize>,

    /// Byte threshold above which a feature's coordinates are parsed
    /// iteratively instead of through serde_json (default: 250000000)
    #[arg(long = "max-direct-parse-bytes", global = true)]
    pub max_direct_parse_bytes: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show byte length, segment count, and feature count of a document
    Stats {
        /// Path to a .geojson (or .geojson.gz) file
        file: String,
    },

    /// Print parsed features, one JSON document per line
    Features {
        /// Path to a .geojson (or .geojson.gz) file
        file: String,

        /// Stop after this many features
        #[arg(short = 'l', long = "limit")]
        limit: Option<usize>,

        /// Pretty-print each feature
        #[arg(short = 'p', long = "pretty")]
        pretty: bool,
    },
}
