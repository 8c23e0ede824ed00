//! Hover tooltip and country drill-down modal.
//!
//! These are view models only. The viewer owns one optional [`ModalState`]
//! and drops it on close, so nothing carries over between openings.

use crate::aggregate::{roster, subgenre_breakdown, CountryCounts, SubgenreCount};
use crate::filter::{FilterState, StatusFilter};
use crate::record::Band;

/// Tooltip offset from the cursor, in pixels.
pub const TOOLTIP_OFFSET: (f64, f64) = (14.0, -28.0);

/// Content and placement of the hover tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub country: String,
    pub label: String,
    pub left: f64,
    pub top: f64,
}

impl Tooltip {
    /// Builds the tooltip for a hovered country at cursor `(x, y)`.
    ///
    /// Countries with no bands under the current filters get no tooltip.
    pub fn for_country(
        country: &str,
        counts: &CountryCounts,
        filter: &FilterState,
        x: f64,
        y: f64,
    ) -> Option<Self> {
        let count = counts.count(country);
        if count == 0 {
            return None;
        }
        let label = match filter.subgenre.style() {
            Some(style) => format!("{style} bands: {count}"),
            None => format!("Bands: {count}"),
        };
        Some(Self {
            country: country.to_string(),
            label,
            left: x + TOOLTIP_OFFSET.0,
            top: y + TOOLTIP_OFFSET.1,
        })
    }
}

/// One row of the band roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub name: String,
    pub formed: i32,
    pub styles: String,
    pub status: String,
    pub is_active: bool,
}

impl RosterRow {
    fn from_band(band: &Band) -> Self {
        Self {
            name: band.name.clone(),
            formed: band.formed_year,
            styles: band.styles.join(", "),
            status: band.status_label(),
            is_active: band.is_active,
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_folded(&self.name, needle) || contains_folded(&self.styles, needle)
    }
}

/// Which table the modal shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalView {
    /// Subgenre counts for the country; shown when no subgenre filter is set.
    Subgenres(Vec<SubgenreCount>),
    /// Bands of the country carrying the filtered subgenre.
    Roster {
        subgenre: String,
        rows: Vec<RosterRow>,
    },
}

/// An open country modal with its local search and status sub-filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub country: String,
    pub view: ModalView,
    pub search: String,
    pub status: StatusFilter,
}

impl ModalState {
    /// Opens the modal for a clicked country, or `None` when it has no bands
    /// under the current filters.
    pub fn open(bands: &[Band], filter: &FilterState, country: &str) -> Option<Self> {
        let view = match filter.subgenre.style() {
            None => {
                let rows = subgenre_breakdown(bands, filter, country);
                if rows.is_empty() && !bands.iter().any(|b| b.origin_world == country && filter.matches(b)) {
                    return None;
                }
                ModalView::Subgenres(rows)
            }
            Some(style) => {
                let rows: Vec<RosterRow> = roster(bands, filter, country)
                    .into_iter()
                    .map(RosterRow::from_band)
                    .collect();
                if rows.is_empty() {
                    return None;
                }
                ModalView::Roster {
                    subgenre: style.to_string(),
                    rows,
                }
            }
        };

        Some(Self {
            country: country.to_string(),
            view,
            search: String::new(),
            status: StatusFilter::All,
        })
    }

    pub fn title(&self) -> String {
        match &self.view {
            ModalView::Subgenres(_) => format!("{} - subgenres", self.country),
            ModalView::Roster { subgenre, .. } => format!("{} - {subgenre} bands", self.country),
        }
    }

    pub fn is_roster(&self) -> bool {
        matches!(self.view, ModalView::Roster { .. })
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
    }

    /// Breakdown rows passing the search; empty for the roster view.
    pub fn visible_subgenres(&self) -> Vec<&SubgenreCount> {
        let needle = self.needle();
        match &self.view {
            ModalView::Subgenres(rows) => rows
                .iter()
                .filter(|row| contains_folded(&row.subgenre, &needle))
                .collect(),
            ModalView::Roster { .. } => Vec::new(),
        }
    }

    /// Roster rows passing the search and status sub-filter; empty for the
    /// breakdown view.
    pub fn visible_roster(&self) -> Vec<&RosterRow> {
        let needle = self.needle();
        match &self.view {
            ModalView::Roster { rows, .. } => rows
                .iter()
                .filter(|row| match self.status {
                    StatusFilter::All => true,
                    StatusFilter::Active => row.is_active,
                    StatusFilter::Inactive => !row.is_active,
                })
                .filter(|row| row.matches_search(&needle))
                .collect(),
            ModalView::Subgenres(_) => Vec::new(),
        }
    }

    /// Number of rows before any local filtering.
    pub fn total_rows(&self) -> usize {
        match &self.view {
            ModalView::Subgenres(rows) => rows.len(),
            ModalView::Roster { rows, .. } => rows.len(),
        }
    }

    fn needle(&self) -> String {
        self.search.trim().to_lowercase()
    }
}

/// Case-insensitive substring test; `needle` must already be lowercase.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}
