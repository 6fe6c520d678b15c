//! Shared plumbing for the canvas engine: errors and configuration.
//!
//! Nothing in here depends on a windowing toolkit.

pub mod config;
pub mod errors;

pub use config::CanvasConfig;
pub use errors::{SurfaceError, SurfaceResult};
