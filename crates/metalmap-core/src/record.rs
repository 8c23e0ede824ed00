//! Band records and their normalisation.
//!
//! A [`RawBand`] is one CSV row as it appears in the dataset. [`Band`] is the
//! normalised form the rest of the pipeline works on, with the decade bucket,
//! canonical country and style list already derived.

use serde::Deserialize;

use crate::error::LoadResult;
use crate::resolver::canonical_country;

/// Value of the `split` column meaning the band is still active.
pub const ACTIVE_SENTINEL: &str = "-";

/// One row of the band table, exactly as read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBand {
    pub band_name: String,
    pub fans: String,
    pub formed: String,
    pub origin: String,
    pub split: String,
    pub style: String,
}

/// A normalised band record.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub name: String,
    pub fans: Option<u32>,
    /// Origin string as written in the dataset.
    pub origin: String,
    /// First comma-separated token of the origin.
    pub origin_main: String,
    /// Canonical country name used to join against the boundary features.
    pub origin_world: String,
    pub formed_year: i32,
    pub decade: i32,
    pub styles: Vec<String>,
    /// Raw split marker, kept for the "Inactive (<year>)" label.
    pub split: String,
    pub is_active: bool,
}

impl Band {
    /// Normalises a raw row.
    ///
    /// Returns `None` when the formation year is missing, non-numeric or zero;
    /// such rows are not part of the working set.
    pub fn from_raw(raw: RawBand) -> Option<Self> {
        let formed_year = parse_year(&raw.formed)?;
        let origin_main = raw
            .origin
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        let origin_world = canonical_country(&origin_main);
        let split = raw.split.trim().to_string();
        let is_active = split == ACTIVE_SENTINEL;

        Some(Self {
            name: raw.band_name.trim().to_string(),
            fans: raw.fans.trim().parse().ok(),
            origin: raw.origin,
            origin_main,
            origin_world,
            formed_year,
            decade: decade_of(formed_year),
            styles: split_styles(&raw.style),
            split,
            is_active,
        })
    }

    /// Label shown in the roster status column.
    pub fn status_label(&self) -> String {
        if self.is_active {
            "Active".to_string()
        } else {
            format!("Inactive ({})", self.split)
        }
    }

    /// Whether this band carries the given style tag.
    pub fn has_style(&self, style: &str) -> bool {
        self.styles.iter().any(|s| s == style)
    }
}

/// Largest absolute formation year accepted; anything beyond is a data error.
pub const MAX_YEAR: i32 = 9999;

/// Rounds a year down to its decade bucket.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10).saturating_mul(10)
}

fn parse_year(value: &str) -> Option<i32> {
    let year: f64 = value.trim().parse().ok()?;
    if !year.is_finite() || year == 0.0 || year.abs() > f64::from(MAX_YEAR) {
        return None;
    }
    Some(year.floor() as i32)
}

fn split_styles(style: &str) -> Vec<String> {
    style
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses the band table.
///
/// Returns the kept bands and the number of rows dropped for lacking a
/// usable formation year.
pub fn parse_bands(bytes: &[u8]) -> LoadResult<(Vec<Band>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let mut bands = Vec::new();
    let mut dropped = 0;
    for row in reader.deserialize::<RawBand>() {
        match Band::from_raw(row?) {
            Some(band) => bands.push(band),
            None => dropped += 1,
        }
    }

    Ok((bands, dropped))
}
