//! Interactive session logic for pusher.
//!
//! - [browser]: the browsing/selection state machine driven by key events.

pub mod browser;

pub use browser::{BrowserState, KeypressResult};
