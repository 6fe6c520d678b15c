//! Sutu canvas - sparse tiled pixel surface for low-latency pen painting
//!
//! The surface stores only the 64×64 tiles that hold paint. A brush engine writes
//! into per-tile high-precision buffers during a stroke; each commit refreshes the
//! tile's 8-bit display buffer and notifies listeners.

pub mod brush;
pub mod controller;
pub mod core;
pub mod file;
pub mod input;
pub mod surface;

pub use brush::{BrushSettings, PressureCurve, SoftRoundBrush, StrokeEngine, TileTarget};
pub use controller::SurfaceController;
pub use crate::core::{CanvasConfig, SurfaceError, SurfaceResult};
pub use input::StrokeSample;
pub use surface::{Image, Point, Rect, Surface, SurfaceEvent, TileIndex, TILE_SIZE};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Calling this more than once is harmless.
pub fn init_logging(default_filter: &str) {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("Sutu canvas logging initialized");
    }
}
