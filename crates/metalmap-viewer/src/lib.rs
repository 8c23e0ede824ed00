//! Interactive world map of metal band origins.
//!
//! This crate provides a Dioxus desktop application that shades each country
//! by how many bands formed there, overlays proportional bubbles, and drills
//! down into a country's subgenres or band roster on click.

pub mod components;
pub mod config;
pub mod state;
