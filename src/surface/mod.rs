//! Tiled surface engine
//!
//! The canvas is an unbounded plane split into `TILE_SIZE × TILE_SIZE` tiles.
//! Only tiles that have been touched are materialized. During a stroke the brush
//! engine paints straight into each tile's high-precision buffer; committing a
//! tile re-derives its 8-bit display buffer, which is what the display layer and
//! `save` read.

mod events;
mod geometry;
mod raster;
mod tile;
mod tile_index;
mod tiled_surface;

#[cfg(test)]
mod tests;

pub use events::{DirtyRegion, DirtySnapshot, SurfaceEvent, SurfaceListener};
pub use geometry::{Point, Rect};
pub use raster::{alpha, argb, channels, premultiply, unpremultiply, Image};
pub use tile::{to_display_channel, to_linear_channel, Tile, FIXED_ONE, TILE_BUFFER_LEN};
pub use tile_index::TileIndex;
pub use tiled_surface::Surface;

/// Edge length of a tile in pixels
pub const TILE_SIZE: u32 = 64;
