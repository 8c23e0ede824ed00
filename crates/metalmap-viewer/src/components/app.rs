//! Root component of the loaded map.

use std::time::Duration;

use dioxus::prelude::*;

use metalmap_core::{aggregate, bubble_layout, CountryCounts};

use crate::state::{BubbleLayer, MapState, SharedDataset};

use super::{CountryModal, FilterBar, MapView, TooltipOverlay};

/// Interval between bubble animation frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Map, controls and overlays for one loaded dataset.
#[component]
pub fn App(dataset: SharedDataset, show_bubbles: bool) -> Element {
    let state = use_signal(|| MapState::new(show_bubbles));
    let mut bubbles = use_signal(BubbleLayer::new);

    // Recomputed whenever the filter is replaced
    let counts_source = dataset.clone();
    let counts = use_memo(move || {
        let filter = state.read().filter.clone();
        aggregate(&counts_source.bands, &filter)
    });

    // Retarget bubbles on every new set of counts
    let layout_source = dataset.clone();
    use_effect(move || {
        let layout = bubble_layout(&counts.read(), &layout_source.projected);
        bubbles.write().retarget(&layout);
    });

    // Animation loop
    use_future(move || {
        let mut bubbles = bubbles;
        async move {
            loop {
                tokio::time::sleep(FRAME_INTERVAL).await;
                if !bubbles.peek().is_settled() {
                    bubbles.write().tick();
                }
            }
        }
    });

    rsx! {
        div {
            class: "metal-map",

            Header { counts }

            FilterBar { options: dataset.options.clone(), state }

            MapView { dataset: dataset.clone(), state, counts, bubbles }

            TooltipOverlay { state }

            CountryModal { state }
        }
    }
}

/// Title and totals for the current filters.
#[component]
fn Header(counts: Memo<CountryCounts>) -> Element {
    let counts = counts.read();
    let total = counts.total();
    let countries = counts.len();

    rsx! {
        header {
            class: "header",
            h1 {
                class: "header-title",
                "Metal Bands of the World"
            }
            span {
                class: "header-stats",
                "{total} bands from {countries} countries"
            }
        }
    }
}
