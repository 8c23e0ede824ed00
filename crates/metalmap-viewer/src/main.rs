//! Entry point for the metal band origins map.
//!
//! Loads the band table and country boundaries once, then hands the dataset
//! to the interactive map.

use std::sync::OnceLock;

use clap::Parser;
use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use tracing_subscriber::EnvFilter;

use metalmap_viewer::components::App;
use metalmap_viewer::config::{Args, ViewerConfig};
use metalmap_viewer::state::SharedDataset;

/// CSS styles embedded at compile time.
const STYLES_CSS: &str = include_str!("../assets/styles.css");

/// Global storage for the resolved configuration.
static VIEWER_CONFIG: OnceLock<ViewerConfig> = OnceLock::new();

fn main() {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::info!("Starting Metal Map Viewer");

    VIEWER_CONFIG.set(args.viewer_config()).ok();

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title("Metal Bands of the World")
                        .with_inner_size(LogicalSize::new(1200, 860))
                        .with_resizable(true),
                )
                .with_custom_head(format!(r#"<style>{}</style>"#, STYLES_CSS)),
        )
        .launch(RootApp);
}

/// Root component: loads the data, then shows the map or a failure notice.
#[component]
fn RootApp() -> Element {
    let config = VIEWER_CONFIG.get().cloned().unwrap_or_else(|| Args::parse().viewer_config());
    let show_bubbles = config.show_bubbles;

    let dataset = use_resource(move || {
        let source = config.source.clone();
        async move {
            match metalmap_core::load(&source).await {
                Ok(dataset) => Ok(SharedDataset::new(dataset)),
                Err(e) => {
                    tracing::error!("Failed to load map data: {}", e);
                    Err(e.to_string())
                }
            }
        }
    });

    let body = match &*dataset.read() {
        None => rsx! {
            div { class: "status-screen", "Loading map data..." }
        },
        Some(Err(message)) => rsx! {
            div {
                class: "status-screen status-error",
                h1 { "The map could not be drawn" }
                p { "{message}" }
            }
        },
        Some(Ok(dataset)) => rsx! {
            App { dataset: dataset.clone(), show_bubbles }
        },
    };

    rsx! {
        div {
            class: "themed-root",
            "data-theme": "blackout",
            {body}
        }
    }
}
