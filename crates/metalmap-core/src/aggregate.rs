//! Grouping and counting of filtered bands.
//!
//! Everything here is recomputed from scratch on each filter change; the
//! dataset is small enough that no incremental bookkeeping is kept.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::filter::FilterState;
use crate::geography::WorldAtlas;
use crate::record::Band;

/// Band counts per canonical country under one filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCounts {
    counts: BTreeMap<String, usize>,
    max: usize,
    total: usize,
}

impl Default for CountryCounts {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            max: 1,
            total: 0,
        }
    }
}

impl CountryCounts {
    pub fn count(&self, country: &str) -> usize {
        self.counts.get(country).copied().unwrap_or(0)
    }

    /// Largest count, or 1 when nothing matched.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Number of bands that passed the filters.
    pub fn total(&self) -> usize {
        self.total
    }

    /// `count / max`, always within [0, 1].
    pub fn normalized(&self, country: &str) -> f64 {
        self.count(country) as f64 / self.max as f64
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Countries with their counts, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, &count)| (name.as_str(), count))
    }
}

/// Filters the bands and counts them per canonical country.
pub fn aggregate(bands: &[Band], filter: &FilterState) -> CountryCounts {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total = 0;
    for band in bands.iter().filter(|b| filter.matches(b)) {
        *counts.entry(band.origin_world.clone()).or_default() += 1;
        total += 1;
    }
    let max = counts.values().copied().max().unwrap_or(1);

    CountryCounts { counts, max, total }
}

/// One row of the per-country subgenre breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgenreCount {
    pub subgenre: String,
    pub count: usize,
}

/// Style counts for one country's filtered bands, most common first.
pub fn subgenre_breakdown(bands: &[Band], filter: &FilterState, country: &str) -> Vec<SubgenreCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for band in country_bands(bands, filter, country) {
        for style in &band.styles {
            *counts.entry(style.as_str()).or_default() += 1;
        }
    }

    let mut rows: Vec<SubgenreCount> = counts
        .into_iter()
        .map(|(subgenre, count)| SubgenreCount {
            subgenre: subgenre.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.subgenre.cmp(&b.subgenre)));
    rows
}

/// One country's filtered bands, ordered alphabetically by name.
pub fn roster<'a>(bands: &'a [Band], filter: &FilterState, country: &str) -> Vec<&'a Band> {
    let mut rows: Vec<&Band> = country_bands(bands, filter, country).collect();
    rows.sort_by(|a, b| compare_names(&a.name, &b.name));
    rows
}

fn country_bands<'a, 'f>(
    bands: &'a [Band],
    filter: &'f FilterState,
    country: &'f str,
) -> impl Iterator<Item = &'a Band> + 'f
where
    'a: 'f,
{
    bands
        .iter()
        .filter(move |b| b.origin_world == country && filter.matches(b))
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Canonical names that match no boundary feature, with their record counts.
///
/// These bands never appear on the map.
pub fn unmatched_origins(bands: &[Band], atlas: &WorldAtlas) -> BTreeMap<String, usize> {
    let mut unmatched = BTreeMap::new();
    for band in bands.iter().filter(|b| !atlas.contains(&b.origin_world)) {
        *unmatched.entry(band.origin_world.clone()).or_default() += 1;
    }
    unmatched
}
