//! UI components for the map viewer.

mod app;
mod controls;
mod map;
mod modal;
mod tooltip;

pub use app::*;
pub use controls::*;
pub use map::*;
pub use modal::*;
pub use tooltip::*;
