//! Startup loading of the band table and boundary data.
//!
//! Both sources are read concurrently; nothing is normalised until both
//! have arrived. A failure of either aborts the whole load.

use std::fmt;
use std::path::PathBuf;

use crate::aggregate::unmatched_origins;
use crate::error::{LoadError, LoadResult};
use crate::filter::FilterOptions;
use crate::geography::WorldAtlas;
use crate::projection::{project_atlas, NaturalEarth, ProjectedFeature, MAP_HEIGHT, MAP_WIDTH};
use crate::record::{parse_bands, Band};

/// Default band table location.
pub const DEFAULT_BANDS: &str = "metal_bands_2017.csv";

/// Default boundary data: world-atlas 1:110m countries topology.
pub const DEFAULT_WORLD: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// Where an input is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs; anything else is a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::Path(PathBuf::from(location))
        }
    }

    async fn read(&self, client: &reqwest::Client) -> LoadResult<Vec<u8>> {
        match self {
            Self::Path(path) => tokio::fs::read(path).await.map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            }),
            Self::Url(url) => {
                let http_err = |source: reqwest::Error| LoadError::Http {
                    url: url.clone(),
                    source,
                };
                let response = client.get(url).send().await.map_err(http_err)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                let body = response.bytes().await.map_err(http_err)?;
                Ok(body.to_vec())
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Inputs and viewport for one load.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub bands: DataSource,
    pub world: DataSource,
    /// Topology object holding the countries; `None` picks the default.
    pub topology_object: Option<String>,
    pub width: f64,
    pub height: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            bands: DataSource::parse(DEFAULT_BANDS),
            world: DataSource::parse(DEFAULT_WORLD),
            topology_object: None,
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
        }
    }
}

/// Everything loaded once at startup. Immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub bands: Vec<Band>,
    pub atlas: WorldAtlas,
    pub projected: Vec<ProjectedFeature>,
    pub options: FilterOptions,
    /// Rows dropped for lacking a usable formation year.
    pub dropped: usize,
}

impl Dataset {
    /// Normalises raw bytes into a dataset.
    pub fn from_bytes(bands: &[u8], world: &[u8], config: &SourceConfig) -> LoadResult<Self> {
        let (bands, dropped) = parse_bands(bands)?;
        let atlas = WorldAtlas::from_json(world, config.topology_object.as_deref())?;
        if atlas.is_empty() {
            return Err(LoadError::Geography("boundary data has no named countries".to_string()));
        }
        let projection = NaturalEarth::fit_size(&atlas, config.width, config.height);
        let projected = project_atlas(&atlas, &projection);
        let options = FilterOptions::from_bands(&bands);

        Ok(Self {
            bands,
            atlas,
            projected,
            options,
            dropped,
        })
    }
}

/// Reads both inputs in parallel and builds the dataset.
pub async fn load(config: &SourceConfig) -> LoadResult<Dataset> {
    let client = reqwest::Client::new();
    tracing::info!("Loading bands from {} and boundaries from {}", config.bands, config.world);

    let (band_bytes, world_bytes) =
        tokio::try_join!(config.bands.read(&client), config.world.read(&client))?;

    let dataset = Dataset::from_bytes(&band_bytes, &world_bytes, config)?;
    tracing::info!(
        "Loaded {} bands ({} dropped without a formation year), {} countries",
        dataset.bands.len(),
        dataset.dropped,
        dataset.atlas.len()
    );

    let unmatched = unmatched_origins(&dataset.bands, &dataset.atlas);
    if !unmatched.is_empty() {
        let bands: usize = unmatched.values().sum();
        tracing::warn!(
            "{} bands from {} origins match no country on the map",
            bands,
            unmatched.len()
        );
        for (origin, count) in &unmatched {
            tracing::debug!("Unmatched origin {:?}: {} bands", origin, count);
        }
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const BANDS: &str = "\
,band_name,fans,formed,origin,split,style
0,Alpha,10,1987,USA,-,\"Black,Death\"
1,Beta,5,-,Norway,-,Black
";

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "United States of America" },
            "geometry": { "type": "Polygon", "coordinates": [[[-120, 30], [-70, 30], [-70, 48], [-120, 48], [-120, 30]]] }
        }]
    }"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.org/world.json"),
            DataSource::Url("https://example.org/world.json".to_string())
        );
        assert_eq!(DataSource::parse("data/bands.csv"), DataSource::Path(PathBuf::from("data/bands.csv")));
    }

    #[tokio::test]
    async fn test_load_from_files() {
        let bands = write_temp(BANDS);
        let world = write_temp(WORLD);
        let config = SourceConfig {
            bands: DataSource::Path(bands.path().to_path_buf()),
            world: DataSource::Path(world.path().to_path_buf()),
            ..Default::default()
        };

        let dataset = load(&config).await.unwrap();

        assert_eq!(dataset.bands.len(), 1);
        assert_eq!(dataset.dropped, 1);
        assert_eq!(dataset.projected.len(), 1);
        assert!(dataset.projected[0].centroid.is_some());
        assert_eq!(dataset.options.decades, vec![1980]);
        assert_eq!(dataset.options.subgenres, vec!["Black", "Death"]);
    }

    #[tokio::test]
    async fn test_missing_file_fails_whole_load() {
        let world = write_temp(WORLD);
        let config = SourceConfig {
            bands: DataSource::Path(PathBuf::from("/nonexistent/bands.csv")),
            world: DataSource::Path(world.path().to_path_buf()),
            ..Default::default()
        };

        let err = load(&config).await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_world_fails_whole_load() {
        let bands = write_temp(BANDS);
        let world = write_temp("not json");
        let config = SourceConfig {
            bands: DataSource::Path(bands.path().to_path_buf()),
            world: DataSource::Path(world.path().to_path_buf()),
            ..Default::default()
        };

        let err = load(&config).await.unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[tokio::test]
    async fn test_boundaries_without_countries_fail_load() {
        let bands = write_temp(BANDS);
        let world = write_temp(r#"{"type": "FeatureCollection", "features": []}"#);
        let config = SourceConfig {
            bands: DataSource::Path(bands.path().to_path_buf()),
            world: DataSource::Path(world.path().to_path_buf()),
            ..Default::default()
        };

        let err = load(&config).await.unwrap_err();
        assert!(matches!(err, LoadError::Geography(_)));
    }

    #[tokio::test]
    async fn test_http_error_status_fails_load() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await
                .unwrap();
        });

        let bands = write_temp(BANDS);
        let url = format!("http://{addr}/countries-110m.json");
        let config = SourceConfig {
            bands: DataSource::Path(bands.path().to_path_buf()),
            world: DataSource::parse(&url),
            ..Default::default()
        };

        let err = load(&config).await.unwrap_err();
        match err {
            LoadError::Status { url: failed, status } => {
                assert_eq!(failed, url);
                assert_eq!(status, 404);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
