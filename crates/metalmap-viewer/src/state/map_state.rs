//! Interactive state of the map: filters, hover, modal and viewport.

use std::ops::Deref;
use std::sync::Arc;

use metalmap_core::projection::{MAP_HEIGHT, MAP_WIDTH};
use metalmap_core::{
    CountryCounts, Dataset, FilterEvent, FilterState, ModalState, Tooltip, WheelMode, ZoomTransform,
};

/// Drag distance, in screen pixels, after which a press no longer counts as a click.
const CLICK_SLOP: f64 = 3.0;

/// Loaded dataset shared between components.
///
/// Equality is identity: the dataset never changes after load.
#[derive(Debug, Clone)]
pub struct SharedDataset(Arc<Dataset>);

impl SharedDataset {
    pub fn new(dataset: Dataset) -> Self {
        Self(Arc::new(dataset))
    }
}

impl PartialEq for SharedDataset {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SharedDataset {
    type Target = Dataset;

    fn deref(&self) -> &Dataset {
        &self.0
    }
}

/// Screen rectangle the map SVG occupies, used to convert pointer positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
        }
    }
}

impl MapViewport {
    /// SVG units per screen pixel.
    pub fn units_per_pixel(&self) -> f64 {
        if self.width > 0.0 && self.height > 0.0 {
            (MAP_WIDTH / self.width).max(MAP_HEIGHT / self.height)
        } else {
            1.0
        }
    }

    /// Converts a client position to SVG coordinates.
    pub fn to_map(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let k = self.units_per_pixel();
        // preserveAspectRatio="xMidYMid meet" centres the drawing.
        let pad_x = (self.width - MAP_WIDTH / k) / 2.0;
        let pad_y = (self.height - MAP_HEIGHT / k) / 2.0;
        (
            (client_x - self.left - pad_x) * k,
            (client_y - self.top - pad_y) * k,
        )
    }
}

/// An in-progress drag of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub last: (f64, f64),
    pub travelled: f64,
}

/// Main interactive state.
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    /// Live filters. Replaced, never mutated, on each control change.
    pub filter: FilterState,

    /// Tooltip for the hovered country, if it has bands.
    pub tooltip: Option<Tooltip>,

    /// Open drill-down modal.
    pub modal: Option<ModalState>,

    /// Pan and zoom of the map group.
    pub zoom: ZoomTransform,

    /// Last measured screen rectangle of the map.
    pub viewport: MapViewport,

    pub drag: Option<DragState>,

    /// Set when the last press moved far enough to be a drag, so the click
    /// that follows it is ignored.
    pub suppress_click: bool,

    /// Whether the bubble layer is drawn.
    pub show_bubbles: bool,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MapState {
    pub fn new(show_bubbles: bool) -> Self {
        Self {
            filter: FilterState::new(),
            tooltip: None,
            modal: None,
            zoom: ZoomTransform::IDENTITY,
            viewport: MapViewport::default(),
            drag: None,
            suppress_click: false,
            show_bubbles,
        }
    }

    /// Single entry point for filter control changes.
    pub fn dispatch(&mut self, event: FilterEvent) {
        tracing::debug!("Filter change: {:?}", event);
        self.filter = self.filter.with(event);
        self.tooltip = None;
    }

    /// Updates the tooltip for a pointer over `country` at client `(x, y)`.
    pub fn hover(&mut self, country: &str, counts: &CountryCounts, x: f64, y: f64) {
        if self.drag.is_some() {
            self.tooltip = None;
            return;
        }
        self.tooltip = Tooltip::for_country(country, counts, &self.filter, x, y);
    }

    pub fn clear_hover(&mut self) {
        self.tooltip = None;
    }

    /// Opens the modal for a clicked country; ignored right after a drag.
    pub fn open_country(&mut self, dataset: &Dataset, country: &str) {
        if self.suppress_click {
            return;
        }
        self.modal = ModalState::open(&dataset.bands, &self.filter, country);
        if self.modal.is_some() {
            tracing::debug!("Opened modal for {}", country);
            self.tooltip = None;
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.drag = Some(DragState {
            last: (x, y),
            travelled: 0.0,
        });
        self.suppress_click = false;
    }

    /// Pans by the pointer movement since the last drag event.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let (dx, dy) = (x - drag.last.0, y - drag.last.1);
        drag.last = (x, y);
        drag.travelled += dx.hypot(dy);
        if drag.travelled > CLICK_SLOP {
            self.suppress_click = true;
        }

        let k = self.viewport.units_per_pixel();
        self.zoom = self.zoom.translate_by(dx * k, dy * k);
        self.tooltip = None;
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Zooms around the pointer at client `(x, y)`.
    pub fn wheel(&mut self, delta_y: f64, mode: WheelMode, x: f64, y: f64) {
        let (px, py) = self.viewport.to_map(x, y);
        self.zoom = self.zoom.wheel(delta_y, mode, px, py);
        self.tooltip = None;
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = ZoomTransform::IDENTITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metalmap_core::{aggregate, DataSource, SourceConfig, StatusFilter, SubgenreFilter};

    const BANDS: &str = "\
band_name,formed,origin,split,style
Alpha,1987,USA,-,\"Black,Death\"
Beta,1992,USA,1999,Doom
";

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "United States of America" },
            "geometry": { "type": "Polygon", "coordinates": [[[-120, 30], [-70, 30], [-70, 48], [-120, 48], [-120, 30]]] }
        }]
    }"#;

    fn dataset() -> Dataset {
        let config = SourceConfig {
            bands: DataSource::parse("bands.csv"),
            world: DataSource::parse("world.json"),
            ..Default::default()
        };
        Dataset::from_bytes(BANDS.as_bytes(), WORLD.as_bytes(), &config).unwrap()
    }

    #[test]
    fn test_dispatch_replaces_filter_and_clears_tooltip() {
        let dataset = dataset();
        let mut state = MapState::default();
        let counts = aggregate(&dataset.bands, &state.filter);
        state.hover("United States of America", &counts, 10.0, 10.0);
        assert!(state.tooltip.is_some());

        state.dispatch(FilterEvent::Status(StatusFilter::Inactive));

        assert_eq!(state.filter.status, StatusFilter::Inactive);
        assert!(state.tooltip.is_none());
    }

    #[test]
    fn test_open_country_picks_view() {
        let dataset = dataset();
        let mut state = MapState::default();

        state.open_country(&dataset, "United States of America");
        assert!(!state.modal.as_ref().unwrap().is_roster());

        state.close_modal();
        state.dispatch(FilterEvent::Subgenre(SubgenreFilter::parse("Doom")));
        state.open_country(&dataset, "United States of America");
        assert!(state.modal.as_ref().unwrap().is_roster());

        state.close_modal();
        state.open_country(&dataset, "Norway");
        assert!(state.modal.is_none());
    }

    #[test]
    fn test_drag_pans_and_suppresses_click() {
        let dataset = dataset();
        let mut state = MapState::default();

        state.begin_drag(100.0, 100.0);
        state.drag_to(110.0, 95.0);
        state.end_drag();

        assert_eq!((state.zoom.x, state.zoom.y), (10.0, -5.0));
        state.open_country(&dataset, "United States of America");
        assert!(state.modal.is_none());

        state.begin_drag(0.0, 0.0);
        state.end_drag();
        state.open_country(&dataset, "United States of America");
        assert!(state.modal.is_some());
    }

    #[test]
    fn test_wheel_zooms_around_pointer() {
        let mut state = MapState::default();
        state.viewport = MapViewport {
            left: 10.0,
            top: 10.0,
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
        };

        state.wheel(-500.0, WheelMode::Pixels, 110.0, 60.0);

        assert_eq!(state.zoom.k, 2.0);
        assert_eq!(state.zoom.invert(100.0, 50.0), (100.0, 50.0));
    }

    #[test]
    fn test_viewport_conversion() {
        let viewport = MapViewport {
            left: 20.0,
            top: 10.0,
            width: MAP_WIDTH / 2.0,
            height: MAP_HEIGHT / 2.0,
        };
        assert_eq!(viewport.units_per_pixel(), 2.0);
        assert_eq!(viewport.to_map(20.0, 10.0), (0.0, 0.0));
        assert_eq!(viewport.to_map(20.0 + MAP_WIDTH / 2.0, 10.0), (MAP_WIDTH, 0.0));

        let letterboxed = MapViewport {
            left: 0.0,
            top: 0.0,
            width: MAP_WIDTH,
            height: MAP_HEIGHT + 100.0,
        };
        assert_eq!(letterboxed.to_map(0.0, 50.0), (0.0, 0.0));
    }
}
