//! Country drill-down modal.

use dioxus::prelude::*;

use metalmap_core::StatusFilter;

use crate::state::MapState;

/// Subgenre breakdown or band roster for the clicked country.
#[component]
pub fn CountryModal(state: Signal<MapState>) -> Element {
    let mut state_write = state;
    let Some(modal) = state.read().modal.clone() else {
        return rsx! {};
    };

    let title = modal.title();
    let is_roster = modal.is_roster();
    let placeholder = if is_roster { "Search bands or styles" } else { "Search subgenres" };
    let subgenres = modal.visible_subgenres();
    let roster = modal.visible_roster();
    let shown = if is_roster { roster.len() } else { subgenres.len() };
    let total = modal.total_rows();

    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| state_write.write().close_modal(),

            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),

                div {
                    class: "modal-header",
                    h2 { class: "modal-title", "{title}" }
                    button {
                        class: "modal-close",
                        onclick: move |_| state_write.write().close_modal(),
                        "×"
                    }
                }

                div {
                    class: "modal-controls",
                    input {
                        class: "modal-search",
                        r#type: "search",
                        placeholder: "{placeholder}",
                        value: "{modal.search}",
                        autofocus: true,
                        oninput: move |evt: FormEvent| {
                            if let Some(modal) = state_write.write().modal.as_mut() {
                                modal.set_search(evt.value());
                            }
                        },
                    }

                    if is_roster {
                        div {
                            class: "modal-status",
                            for status in StatusFilter::OPTIONS {
                                label {
                                    key: "{status.as_str()}",
                                    class: "control-option",
                                    input {
                                        r#type: "radio",
                                        name: "modal-status",
                                        value: status.as_str(),
                                        checked: modal.status == status,
                                        onchange: move |_| {
                                            if let Some(modal) = state_write.write().modal.as_mut() {
                                                modal.set_status(status);
                                            }
                                        },
                                    }
                                    "{status.label()}"
                                }
                            }
                        }
                    }

                    span { class: "modal-count", "{shown} of {total}" }
                }

                div {
                    class: "modal-body",
                    if is_roster {
                        table {
                            class: "modal-table",
                            thead {
                                tr {
                                    th { "Band" }
                                    th { "Formed" }
                                    th { "Styles" }
                                    th { "Status" }
                                }
                            }
                            tbody {
                                for row in roster.iter() {
                                    tr {
                                        key: "{row.name}-{row.formed}",
                                        class: if row.is_active { "row-active" } else { "row-inactive" },
                                        td { "{row.name}" }
                                        td { "{row.formed}" }
                                        td { "{row.styles}" }
                                        td { "{row.status}" }
                                    }
                                }
                            }
                        }
                    } else {
                        table {
                            class: "modal-table",
                            thead {
                                tr {
                                    th { "Subgenre" }
                                    th { "Bands" }
                                }
                            }
                            tbody {
                                for row in subgenres.iter() {
                                    tr {
                                        key: "{row.subgenre}",
                                        td { "{row.subgenre}" }
                                        td { class: "numeric", "{row.count}" }
                                    }
                                }
                            }
                        }
                    }

                    if shown == 0 {
                        p { class: "modal-empty", "No rows match the search." }
                    }
                }
            }
        }
    }
}
