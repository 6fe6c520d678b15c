//! One `TILE_SIZE × TILE_SIZE` block held in two pixel formats
//!
//! The high-precision buffer is what the brush engine paints into: interleaved
//! premultiplied RGBA, 16 bits per channel, with full scale at `1 << 15`.
//! The display buffer is the same content as 8-bit premultiplied ARGB for
//! compositing. `cache_valid` tracks whether the display buffer is current.

use super::geometry::{Point, Rect};
use super::raster::{argb, channels, Image};
use super::tile_index::TileIndex;
use super::TILE_SIZE;

/// Full-scale value of a high-precision channel
pub const FIXED_ONE: u32 = 1 << 15;

/// Number of `u16` values in one high-precision tile buffer
pub const TILE_BUFFER_LEN: usize = (TILE_SIZE * TILE_SIZE * 4) as usize;

/// High-precision channel to 8-bit: `v * 255 / 32768`, truncating
#[inline]
pub fn to_display_channel(v: u16) -> u8 {
    ((v as u32 * 255) / FIXED_ONE).min(255) as u8
}

/// 8-bit channel to high precision: `v * 32768 / 255`, truncating
#[inline]
pub fn to_linear_channel(v: u8) -> u16 {
    ((v as u32 * FIXED_ONE) / 255) as u16
}

/// A materialized tile
#[derive(Clone)]
pub struct Tile {
    index: TileIndex,
    position: Point,
    buffer: Vec<u16>,
    display: Image,
    cache_valid: bool,
}

impl std::fmt::Debug for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tile")
            .field("index", &self.index)
            .field("position", &self.position)
            .field("cache_valid", &self.cache_valid)
            .finish_non_exhaustive()
    }
}

impl Tile {
    /// Create a fully transparent tile at `index`
    pub fn new(index: TileIndex) -> Self {
        Self {
            index,
            position: index.to_pixel_position(),
            buffer: vec![0; TILE_BUFFER_LEN],
            display: Image::new(TILE_SIZE, TILE_SIZE),
            cache_valid: true,
        }
    }

    #[inline]
    pub fn index(&self) -> TileIndex {
        self.index
    }

    /// Top-left corner in canvas pixel space
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn is_cache_valid(&self) -> bool {
        self.cache_valid
    }

    /// Hand the high-precision buffer to a writer.
    ///
    /// Unless `read_only` is set the display cache is invalidated up front, since the
    /// caller is about to mutate the buffer.
    pub fn write_buffer(&mut self, read_only: bool) -> &mut [u16] {
        if !read_only {
            self.cache_valid = false;
        }
        &mut self.buffer
    }

    /// Read-only view of the high-precision buffer
    #[inline]
    pub fn buffer(&self) -> &[u16] {
        &self.buffer
    }

    /// The display buffer. May be stale when [`Tile::is_cache_valid`] is false.
    #[inline]
    pub fn display(&self) -> &Image {
        &self.display
    }

    /// Re-derive the display buffer from the high-precision buffer
    pub fn refresh_display_cache(&mut self) {
        for (out, px) in self
            .display
            .pixels_mut()
            .iter_mut()
            .zip(self.buffer.chunks_exact(4))
        {
            let a = to_display_channel(px[3]);
            *out = if a == 0 {
                0
            } else {
                argb(
                    a,
                    to_display_channel(px[0]),
                    to_display_channel(px[1]),
                    to_display_channel(px[2]),
                )
            };
        }
        self.cache_valid = true;
    }

    /// Overwrite the high-precision buffer from a display-format image.
    ///
    /// Does not touch the display buffer or the cache flag; pair it with a display
    /// replacement, or use [`Tile::install_display_image`] which does both.
    pub fn ingest_display_image(&mut self, image: &Image) {
        if image.width() != TILE_SIZE || image.height() != TILE_SIZE {
            tracing::warn!(
                "Ignoring {}x{} image for tile {:?}: expected {}x{}",
                image.width(),
                image.height(),
                self.index,
                TILE_SIZE,
                TILE_SIZE
            );
            return;
        }

        for (px, &src) in self.buffer.chunks_exact_mut(4).zip(image.pixels()) {
            let [a, r, g, b] = channels(src);
            px[0] = to_linear_channel(r);
            px[1] = to_linear_channel(g);
            px[2] = to_linear_channel(b);
            px[3] = to_linear_channel(a);
        }
    }

    /// Make `image` the tile's content in both representations
    pub fn install_display_image(&mut self, image: Image) {
        if image.width() != TILE_SIZE || image.height() != TILE_SIZE {
            tracing::warn!(
                "Ignoring {}x{} display image for tile {:?}",
                image.width(),
                image.height(),
                self.index
            );
            return;
        }
        self.ingest_display_image(&image);
        self.display = image;
        self.cache_valid = true;
    }

    /// Reset both buffers to transparent
    pub fn clear(&mut self) {
        self.buffer.fill(0);
        self.display.fill(0);
        self.cache_valid = true;
    }

    /// `(0, 0, TILE_SIZE, TILE_SIZE)` in tile-local space
    pub fn bounding_rect(&self) -> Rect {
        Rect::new(0, 0, TILE_SIZE as i32, TILE_SIZE as i32)
    }

    /// The tile's square in canvas space
    pub fn pixel_rect(&self) -> Rect {
        self.bounding_rect().translated(self.position.x, self.position.y)
    }

    /// High-precision RGBA at a tile-local pixel
    pub fn linear_pixel(&self, x: u32, y: u32) -> Option<[u16; 4]> {
        if x >= TILE_SIZE || y >= TILE_SIZE {
            return None;
        }
        let i = ((y * TILE_SIZE + x) * 4) as usize;
        Some([
            self.buffer[i],
            self.buffer[i + 1],
            self.buffer[i + 2],
            self.buffer[i + 3],
        ])
    }
}
