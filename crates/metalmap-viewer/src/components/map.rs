//! The choropleth map with its bubble layer.

use std::rc::Rc;

use dioxus::html::geometry::WheelDelta;
use dioxus::prelude::*;

use metalmap_core::projection::{MAP_HEIGHT, MAP_WIDTH};
use metalmap_core::{ColorRamp, CountryCounts, WheelMode, DISABLED_FILL};

use crate::state::{BubbleLayer, MapState, MapViewport, SharedDataset};

/// Country shapes coloured by band count, bubbles on top.
#[component]
pub fn MapView(
    dataset: SharedDataset,
    state: Signal<MapState>,
    counts: Memo<CountryCounts>,
    bubbles: Signal<BubbleLayer>,
) -> Element {
    let mut state_write = state;
    let mut mounted: Signal<Option<Rc<MountedData>>> = use_signal(|| None);
    let ramp = ColorRamp::default();

    let counts_read = counts.read();
    let (transform, show_bubbles, dragging) = {
        let state_read = state.read();
        (
            state_read.zoom.to_svg(),
            state_read.show_bubbles,
            state_read.drag.is_some(),
        )
    };
    let svg_class = if dragging { "map dragging" } else { "map" };

    rsx! {
        div {
            class: "map-container",

            svg {
                class: "{svg_class}",
                width: "{MAP_WIDTH}",
                height: "{MAP_HEIGHT}",
                view_box: "0 0 {MAP_WIDTH} {MAP_HEIGHT}",
                preserve_aspect_ratio: "xMidYMid meet",

                onmounted: move |evt: MountedEvent| {
                    let element = evt.data();
                    mounted.set(Some(element.clone()));
                    spawn(measure(element, state_write));
                },
                onmouseenter: move |_| {
                    if let Some(element) = mounted.peek().clone() {
                        spawn(measure(element, state_write));
                    }
                },
                onwheel: move |evt: WheelEvent| {
                    evt.prevent_default();
                    let (delta_y, mode) = match evt.delta() {
                        WheelDelta::Pixels(delta) => (delta.y, WheelMode::Pixels),
                        WheelDelta::Lines(delta) => (delta.y, WheelMode::Lines),
                        WheelDelta::Pages(delta) => (delta.y, WheelMode::Pages),
                    };
                    let point = evt.client_coordinates();
                    state_write.write().wheel(delta_y, mode, point.x, point.y);
                },
                onmousedown: move |evt: MouseEvent| {
                    let point = evt.client_coordinates();
                    state_write.write().begin_drag(point.x, point.y);
                },
                onmousemove: move |evt: MouseEvent| {
                    if state_write.peek().drag.is_some() {
                        let point = evt.client_coordinates();
                        state_write.write().drag_to(point.x, point.y);
                    }
                },
                onmouseup: move |_| state_write.write().end_drag(),
                onmouseleave: move |_| {
                    let mut state = state_write.write();
                    state.end_drag();
                    state.clear_hover();
                },

                g {
                    transform: "{transform}",

                    // Countries
                    g {
                        class: "countries",
                        for feature in dataset.projected.iter() {
                            {
                                let count = counts_read.count(&feature.name);
                                let enabled = count > 0;
                                let fill = if enabled {
                                    ramp.sample(counts_read.normalized(&feature.name)).to_string()
                                } else {
                                    DISABLED_FILL.to_string()
                                };
                                let class = if enabled { "country" } else { "country disabled" };
                                let hover_name = feature.name.clone();
                                let click_name = feature.name.clone();
                                let click_dataset = dataset.clone();

                                rsx! {
                                    path {
                                        key: "{feature.name}",
                                        class: "{class}",
                                        d: "{feature.path}",
                                        fill: "{fill}",
                                        onmousemove: move |evt: MouseEvent| {
                                            let point = evt.client_coordinates();
                                            let counts = counts.read();
                                            state_write.write().hover(&hover_name, &counts, point.x, point.y);
                                        },
                                        onmouseout: move |_| state_write.write().clear_hover(),
                                        onclick: move |_| {
                                            if enabled {
                                                state_write.write().open_country(&click_dataset, &click_name);
                                            }
                                        },
                                    }
                                }
                            }
                        }
                    }

                    // Bubbles
                    if show_bubbles {
                        BubbleLayerView { state, counts, bubbles }
                    }
                }
            }
        }
    }
}

/// Proportional circles at country centroids.
#[component]
fn BubbleLayerView(
    state: Signal<MapState>,
    counts: Memo<CountryCounts>,
    bubbles: Signal<BubbleLayer>,
) -> Element {
    let mut state_write = state;
    let layer = bubbles.read();

    rsx! {
        g {
            class: "bubble-layer",
            for frame in layer.frames().iter() {
                {
                    let name = frame.name.clone();
                    let class = if frame.exiting { "country-bubble exiting" } else { "country-bubble" };

                    rsx! {
                        circle {
                            key: "{frame.name}",
                            class: "{class}",
                            cx: "{frame.x:.2}",
                            cy: "{frame.y:.2}",
                            r: "{frame.radius:.2}",
                            onmousemove: move |evt: MouseEvent| {
                                let point = evt.client_coordinates();
                                let counts = counts.read();
                                state_write.write().hover(&name, &counts, point.x, point.y);
                            },
                            onmouseout: move |_| state_write.write().clear_hover(),
                        }
                    }
                }
            }
        }
    }
}

/// Records where the map sits on screen.
async fn measure(element: Rc<MountedData>, mut state: Signal<MapState>) {
    match element.get_client_rect().await {
        Ok(rect) => {
            let viewport = MapViewport {
                left: rect.origin.x,
                top: rect.origin.y,
                width: rect.size.width,
                height: rect.size.height,
            };
            if state.peek().viewport != viewport {
                state.write().viewport = viewport;
            }
        }
        Err(e) => tracing::debug!("Could not measure the map: {:?}", e),
    }
}
