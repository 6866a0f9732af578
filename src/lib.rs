// Library exports for testing and potential library use
//
// The binary is a thin shell over `app::App`; everything it does is
// reachable from here so integration tests can drive the same paths.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod cli;
pub mod debug;
pub mod preview;

pub use app::{App, SELECTION_RECORD};
pub use preview::LivePreview;
