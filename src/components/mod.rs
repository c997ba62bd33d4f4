//! UI components.

pub mod lantern_sky;
