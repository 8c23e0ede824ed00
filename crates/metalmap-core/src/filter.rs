//! Filter state for the map.
//!
//! [`FilterState`] is an immutable value. Controls never mutate it in place;
//! they produce a [`FilterEvent`] and the owner replaces the live state with
//! [`FilterState::with`].

use std::collections::BTreeSet;
use std::fmt;

use crate::record::Band;

/// Control value meaning "no restriction" for decade and subgenre.
pub const ALL: &str = "All";

/// Decade restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DecadeFilter {
    #[default]
    All,
    Decade(i32),
}

impl DecadeFilter {
    /// Parses a control value: `"All"` or a year such as `"1980"`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            ALL => Some(Self::All),
            year => year.parse().ok().map(Self::Decade),
        }
    }

    pub fn matches(&self, band: &Band) -> bool {
        match self {
            Self::All => true,
            Self::Decade(decade) => band.decade == *decade,
        }
    }
}

impl fmt::Display for DecadeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Decade(decade) => write!(f, "{decade}"),
        }
    }
}

/// Active/inactive restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub const OPTIONS: [StatusFilter; 3] = [Self::All, Self::Active, Self::Inactive];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Control value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Label shown next to the control.
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn matches(&self, band: &Band) -> bool {
        match self {
            Self::All => true,
            Self::Active => band.is_active,
            Self::Inactive => !band.is_active,
        }
    }
}

/// Subgenre restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SubgenreFilter {
    #[default]
    All,
    Style(String),
}

impl SubgenreFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            ALL | "" => Self::All,
            style => Self::Style(style.to_string()),
        }
    }

    pub fn style(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Style(style) => Some(style),
        }
    }

    pub fn matches(&self, band: &Band) -> bool {
        match self {
            Self::All => true,
            Self::Style(style) => band.has_style(style),
        }
    }
}

impl fmt::Display for SubgenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.style().unwrap_or(ALL))
    }
}

/// A change coming from one of the filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    Decade(DecadeFilter),
    Status(StatusFilter),
    Subgenre(SubgenreFilter),
    Reset,
}

/// The three independent filters applied before aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub decade: DecadeFilter,
    pub status: StatusFilter,
    pub subgenre: SubgenreFilter,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state after applying one control change.
    pub fn with(&self, event: FilterEvent) -> Self {
        match event {
            FilterEvent::Decade(decade) => Self {
                decade,
                ..self.clone()
            },
            FilterEvent::Status(status) => Self {
                status,
                ..self.clone()
            },
            FilterEvent::Subgenre(subgenre) => Self {
                subgenre,
                ..self.clone()
            },
            FilterEvent::Reset => Self::default(),
        }
    }

    pub fn matches(&self, band: &Band) -> bool {
        self.decade.matches(band) && self.status.matches(band) && self.subgenre.matches(band)
    }

    /// Bands passing all three filters, in dataset order.
    pub fn apply<'a>(&self, bands: &'a [Band]) -> Vec<&'a Band> {
        bands.iter().filter(|band| self.matches(band)).collect()
    }
}

/// Values offered by the decade and subgenre controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Distinct decades, ascending.
    pub decades: Vec<i32>,
    /// Distinct styles, ascending.
    pub subgenres: Vec<String>,
}

impl FilterOptions {
    pub fn from_bands(bands: &[Band]) -> Self {
        let decades: BTreeSet<i32> = bands.iter().map(|b| b.decade).collect();
        let subgenres: BTreeSet<&str> = bands
            .iter()
            .flat_map(|b| b.styles.iter().map(String::as_str))
            .collect();

        Self {
            decades: decades.into_iter().collect(),
            subgenres: subgenres.into_iter().map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawBand;

    fn band(name: &str, formed: &str, split: &str, style: &str) -> Band {
        Band::from_raw(RawBand {
            band_name: name.to_string(),
            formed: formed.to_string(),
            origin: "Norway".to_string(),
            split: split.to_string(),
            style: style.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn sample() -> Vec<Band> {
        vec![
            band("A", "1987", "-", "Black,Death"),
            band("B", "1983", "1990", "Thrash"),
            band("C", "1991", "-", "Black"),
            band("D", "1999", "2004", "Doom,Black"),
        ]
    }

    #[test]
    fn test_control_values_parse() {
        assert_eq!(DecadeFilter::parse("All"), Some(DecadeFilter::All));
        assert_eq!(DecadeFilter::parse("1980"), Some(DecadeFilter::Decade(1980)));
        assert_eq!(DecadeFilter::parse("eighties"), None);
        assert_eq!(StatusFilter::parse("inactive"), Some(StatusFilter::Inactive));
        assert_eq!(StatusFilter::parse("Active"), None);
        assert_eq!(SubgenreFilter::parse("All"), SubgenreFilter::All);
        assert_eq!(SubgenreFilter::parse("Doom"), SubgenreFilter::Style("Doom".to_string()));
    }

    #[test]
    fn test_control_values_format() {
        assert_eq!(DecadeFilter::Decade(1990).to_string(), "1990");
        assert_eq!(DecadeFilter::All.to_string(), "All");
        assert_eq!(SubgenreFilter::Style("Doom".to_string()).to_string(), "Doom");
        for status in StatusFilter::OPTIONS {
            assert_eq!(StatusFilter::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_each_filter() {
        let bands = sample();

        let decade = FilterState::new().with(FilterEvent::Decade(DecadeFilter::Decade(1980)));
        assert_eq!(names(&decade.apply(&bands)), vec!["A", "B"]);

        let active = FilterState::new().with(FilterEvent::Status(StatusFilter::Active));
        assert_eq!(names(&active.apply(&bands)), vec!["A", "C"]);

        let black = FilterState::new().with(FilterEvent::Subgenre(SubgenreFilter::parse("Black")));
        assert_eq!(names(&black.apply(&bands)), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_composition_matches_intersection() {
        let bands = sample();
        let state = FilterState {
            decade: DecadeFilter::Decade(1990),
            status: StatusFilter::Inactive,
            subgenre: SubgenreFilter::parse("Black"),
        };

        let combined = names(&state.apply(&bands));
        let intersection: Vec<&str> = bands
            .iter()
            .filter(|b| state.subgenre.matches(b))
            .filter(|b| state.status.matches(b))
            .filter(|b| state.decade.matches(b))
            .map(|b| b.name.as_str())
            .collect();

        assert_eq!(combined, intersection);
        assert_eq!(combined, vec!["D"]);
    }

    #[test]
    fn test_with_leaves_previous_state_untouched() {
        let state = FilterState::new();
        let next = state.with(FilterEvent::Status(StatusFilter::Inactive));

        assert_eq!(state.status, StatusFilter::All);
        assert_eq!(next.status, StatusFilter::Inactive);
        assert_eq!(next.with(FilterEvent::Reset), FilterState::default());
    }

    #[test]
    fn test_options_are_distinct_and_sorted() {
        let options = FilterOptions::from_bands(&sample());
        assert_eq!(options.decades, vec![1980, 1990]);
        assert_eq!(options.subgenres, vec!["Black", "Death", "Doom", "Thrash"]);
    }

    fn names<'a>(bands: &[&'a Band]) -> Vec<&'a str> {
        bands.iter().map(|b| b.name.as_str()).collect()
    }
}
