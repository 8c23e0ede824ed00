//! State management for the map viewer.

pub mod bubble_layer;
pub mod map_state;

pub use bubble_layer::*;
pub use map_state::*;
