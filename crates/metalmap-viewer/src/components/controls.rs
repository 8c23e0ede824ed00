//! Filter controls above the map.

use dioxus::prelude::*;

use metalmap_core::filter::ALL;
use metalmap_core::{DecadeFilter, FilterEvent, FilterOptions, StatusFilter, SubgenreFilter};

use crate::state::MapState;

/// Decade, status and subgenre controls plus the bubble toggle.
#[component]
pub fn FilterBar(options: FilterOptions, state: Signal<MapState>) -> Element {
    let mut state_write = state;
    let state_read = state.read();
    let filter = state_read.filter.clone();
    let show_bubbles = state_read.show_bubbles;
    let zoomed = !state_read.zoom.is_identity();

    rsx! {
        div {
            class: "filter-bar",

            // Decade
            div {
                class: "control-group",
                span { class: "control-label", "Decade" }
                label {
                    class: "control-option",
                    input {
                        r#type: "radio",
                        name: "decade",
                        value: ALL,
                        checked: filter.decade == DecadeFilter::All,
                        onchange: move |evt: FormEvent| on_decade(&mut state_write, &evt.value()),
                    }
                    "All"
                }
                for decade in options.decades.iter().copied() {
                    label {
                        key: "{decade}",
                        class: "control-option",
                        input {
                            r#type: "radio",
                            name: "decade",
                            value: "{decade}",
                            checked: filter.decade == DecadeFilter::Decade(decade),
                            onchange: move |evt: FormEvent| on_decade(&mut state_write, &evt.value()),
                        }
                        "{decade}s"
                    }
                }
            }

            // Status
            div {
                class: "control-group",
                span { class: "control-label", "Status" }
                for status in StatusFilter::OPTIONS {
                    label {
                        key: "{status.as_str()}",
                        class: "control-option",
                        input {
                            r#type: "radio",
                            name: "status",
                            value: status.as_str(),
                            checked: filter.status == status,
                            onchange: move |evt: FormEvent| {
                                if let Some(status) = StatusFilter::parse(&evt.value()) {
                                    state_write.write().dispatch(FilterEvent::Status(status));
                                }
                            },
                        }
                        "{status.label()}"
                    }
                }
            }

            // Subgenre
            div {
                class: "control-group",
                span { class: "control-label", "Subgenre" }
                select {
                    class: "subgenre-select",
                    value: "{filter.subgenre}",
                    onchange: move |evt: FormEvent| {
                        let subgenre = SubgenreFilter::parse(&evt.value());
                        state_write.write().dispatch(FilterEvent::Subgenre(subgenre));
                    },
                    option {
                        value: ALL,
                        selected: filter.subgenre == SubgenreFilter::All,
                        "All subgenres"
                    }
                    for subgenre in options.subgenres.iter() {
                        option {
                            key: "{subgenre}",
                            value: "{subgenre}",
                            selected: filter.subgenre.style() == Some(subgenre.as_str()),
                            "{subgenre}"
                        }
                    }
                }
            }

            div {
                class: "control-group control-actions",
                label {
                    class: "control-option",
                    input {
                        r#type: "checkbox",
                        checked: show_bubbles,
                        onchange: move |evt: FormEvent| {
                            state_write.write().show_bubbles = evt.checked();
                        },
                    }
                    "Bubbles"
                }
                button {
                    class: "control-button",
                    onclick: move |_| state_write.write().dispatch(FilterEvent::Reset),
                    "Reset filters"
                }
                button {
                    class: "control-button",
                    disabled: !zoomed,
                    onclick: move |_| state_write.write().reset_zoom(),
                    "Reset zoom"
                }
            }
        }
    }
}

fn on_decade(state: &mut Signal<MapState>, value: &str) {
    match DecadeFilter::parse(value) {
        Some(decade) => state.write().dispatch(FilterEvent::Decade(decade)),
        None => tracing::warn!("Ignoring unknown decade {:?}", value),
    }
}
