//! Data pipeline for the metal band origins map.
//!
//! Turns a table of bands and a world boundary dataset into everything the
//! viewer draws: per-country counts under the live filters, region colours,
//! bubble sizes and the rows shown in the country drill-down.
//!
//! The pipeline is pure apart from [`loader::load`], which reads both inputs
//! in parallel once at startup.

pub mod aggregate;
pub mod bubbles;
pub mod error;
pub mod filter;
pub mod geography;
pub mod interaction;
pub mod loader;
pub mod projection;
pub mod record;
pub mod resolver;
pub mod scale;
pub mod zoom;

pub use aggregate::{aggregate, roster, subgenre_breakdown, unmatched_origins, CountryCounts, SubgenreCount};
pub use bubbles::{bubble_layout, Bubble, BubbleFrame, BubbleTransitions};
pub use error::{LoadError, LoadResult};
pub use filter::{DecadeFilter, FilterEvent, FilterOptions, FilterState, StatusFilter, SubgenreFilter};
pub use geography::{Feature, WorldAtlas};
pub use interaction::{ModalState, ModalView, RosterRow, Tooltip};
pub use loader::{load, DataSource, Dataset, SourceConfig};
pub use projection::{project_atlas, NaturalEarth, ProjectedFeature};
pub use record::{parse_bands, Band, RawBand, ACTIVE_SENTINEL};
pub use resolver::canonical_country;
pub use scale::{ColorRamp, Rgb, SqrtScale, DISABLED_FILL};
pub use zoom::{WheelMode, ZoomTransform};
