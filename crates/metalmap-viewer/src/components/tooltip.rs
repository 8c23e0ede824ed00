//! Hover tooltip.

use dioxus::prelude::*;

use crate::state::MapState;

/// Floating label next to the cursor for the hovered country.
#[component]
pub fn TooltipOverlay(state: Signal<MapState>) -> Element {
    let state_read = state.read();
    let Some(tooltip) = state_read.tooltip.as_ref() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "tooltip",
            style: "left: {tooltip.left}px; top: {tooltip.top}px;",
            strong { "{tooltip.country}" }
            br {}
            "{tooltip.label}"
        }
    }
}
