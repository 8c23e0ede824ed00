//! Command line configuration for the map viewer.

use clap::Parser;

use metalmap_core::loader::{DEFAULT_BANDS, DEFAULT_WORLD};
use metalmap_core::{DataSource, SourceConfig};

/// Command line arguments.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "metalmap-viewer")]
#[command(about = "Interactive world map of where metal bands come from")]
pub struct Args {
    /// Band table: a CSV file path or an http(s) URL
    #[arg(short, long, env = "METALMAP_DATA", default_value = DEFAULT_BANDS)]
    pub data: String,

    /// Country boundaries: TopoJSON or GeoJSON, as a path or URL
    #[arg(short, long, env = "METALMAP_WORLD", default_value = DEFAULT_WORLD)]
    pub world: String,

    /// Name of the topology object holding the countries
    #[arg(long)]
    pub topology_object: Option<String>,

    /// Start with the bubble layer shown (default)
    #[arg(long, overrides_with = "no_bubbles")]
    pub bubbles: bool,

    /// Start with the bubble layer hidden
    #[arg(long, overrides_with = "bubbles")]
    pub no_bubbles: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Settings the running viewer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub source: SourceConfig,
    pub show_bubbles: bool,
}

impl Args {
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            source: SourceConfig {
                bands: DataSource::parse(&self.data),
                world: DataSource::parse(&self.world),
                topology_object: self.topology_object.clone(),
                ..Default::default()
            },
            show_bubbles: !self.no_bubbles,
        }
    }
}
