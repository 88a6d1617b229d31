//! UI rendering for pusher.

pub mod render;

pub use render::render;
