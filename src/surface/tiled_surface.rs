//! Sparse tile grid covering the canvas
//!
//! Tiles are created on first access and dropped again when they become fully
//! transparent, so an absent key always means "transparent".

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use rayon::prelude::*;

use super::events::{Listeners, SurfaceEvent, SurfaceListener};
use super::geometry::{Point, Rect};
use super::raster::Image;
use super::tile::{Tile, TILE_BUFFER_LEN};
use super::tile_index::TileIndex;
use super::TILE_SIZE;
use crate::brush::TileTarget;
use crate::core::{SurfaceError, SurfaceResult};

/// Number of tiles needed to cover `pixels`
#[inline]
fn tile_span(pixels: u32) -> i32 {
    pixels.div_ceil(TILE_SIZE) as i32
}

/// The tiled pixel surface backing one canvas
pub struct Surface {
    tiles: HashMap<TileIndex, Tile>,
    width: u32,
    height: u32,
    tiles_x: i32,
    tiles_y: i32,
    /// Scratch buffer handed out when the surface has no area
    null_tile: Vec<u16>,
    listeners: Listeners,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tiles_x", &self.tiles_x)
            .field("tiles_y", &self.tiles_y)
            .field("tiles", &self.tiles.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Surface {
    /// Create an empty surface of `width × height` pixels.
    ///
    /// Unlike [`Surface::resize`], a zero dimension is accepted here: such a surface
    /// routes every write request to the shared null buffer.
    ///
    /// Fails only if the shared null buffer cannot be allocated.
    pub fn new(width: u32, height: u32) -> SurfaceResult<Self> {
        let mut null_tile = Vec::new();
        if null_tile.try_reserve_exact(TILE_BUFFER_LEN).is_err() {
            let bytes = TILE_BUFFER_LEN * std::mem::size_of::<u16>();
            tracing::error!("Surface backing buffer allocation failed ({} bytes)", bytes);
            return Err(SurfaceError::Allocation { bytes });
        }
        null_tile.resize(TILE_BUFFER_LEN, 0);

        tracing::info!("Creating surface: {}x{}", width, height);

        Ok(Self {
            tiles: HashMap::new(),
            width,
            height,
            tiles_x: tile_span(width),
            tiles_y: tile_span(height),
            null_tile,
            listeners: Listeners::default(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Known tile-grid width. Grows when the brush engine writes past it.
    #[inline]
    pub fn tile_count_x(&self) -> i32 {
        self.tiles_x
    }

    #[inline]
    pub fn tile_count_y(&self) -> i32 {
        self.tiles_y
    }

    /// `(0, 0, width, height)`
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Number of materialized tiles
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn contains_tile(&self, index: TileIndex) -> bool {
        self.tiles.contains_key(&index)
    }

    /// Look up a tile without materializing it
    pub fn tile(&self, index: TileIndex) -> Option<&Tile> {
        self.tiles.get(&index)
    }

    /// Indices of all materialized tiles, sorted
    pub fn tile_indices(&self) -> Vec<TileIndex> {
        let mut indices: Vec<_> = self.tiles.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Register a listener for tile notifications
    pub fn subscribe(&mut self, listener: impl SurfaceListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// The tile at `index`, creating a transparent one if needed.
    ///
    /// Emits `TileAdded` for a new tile and `TileUpdated` for an existing one.
    pub fn get_tile(&mut self, index: TileIndex) -> &mut Tile {
        let rect = index.pixel_rect();
        match self.tiles.entry(index) {
            Entry::Occupied(entry) => {
                self.listeners
                    .emit(SurfaceEvent::TileUpdated { index, rect });
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                tracing::trace!("Materializing tile ({}, {})", index.x, index.y);
                self.listeners.emit(SurfaceEvent::TileAdded { index, rect });
                entry.insert(Tile::new(index))
            }
        }
    }

    /// [`Surface::get_tile`] for the tile nearest to a pixel position
    pub fn get_tile_at(&mut self, pos: Point) -> &mut Tile {
        self.get_tile(TileIndex::from_pixel_position(pos))
    }

    /// Hand the brush engine the high-precision buffer of tile `(tx, ty)`.
    ///
    /// A surface without area returns the shared null buffer, whose contents are
    /// discarded. Otherwise the known tile bound grows to include the request.
    pub fn request_write_buffer(&mut self, tx: i32, ty: i32) -> &mut [u16] {
        if self.tiles_x == 0 || self.tiles_y == 0 {
            self.null_tile.fill(0);
            return &mut self.null_tile;
        }

        if tx >= self.tiles_x {
            self.tiles_x = tx.saturating_add(1);
        }
        if ty >= self.tiles_y {
            self.tiles_y = ty.saturating_add(1);
        }

        self.get_tile(TileIndex::new(tx, ty)).write_buffer(false)
    }

    /// The brush engine finished writing tile `(tx, ty)`. Unknown tiles are ignored.
    pub fn commit_write_buffer(&mut self, tx: i32, ty: i32) {
        let index = TileIndex::new(tx, ty);
        let Some(tile) = self.tiles.get_mut(&index) else {
            tracing::trace!("Commit for missing tile ({}, {}) ignored", tx, ty);
            return;
        };
        tile.refresh_display_cache();
        let rect = tile.pixel_rect();
        self.listeners
            .emit(SurfaceEvent::TileUpdated { index, rect });
    }

    /// Every tile index whose square intersects `rect`
    pub fn find_overlapping_tiles(&self, rect: &Rect) -> BTreeSet<TileIndex> {
        if rect.is_empty() {
            return BTreeSet::new();
        }
        let first = TileIndex::containing(rect.x, rect.y);
        let last = TileIndex::containing(rect.right() - 1, rect.bottom() - 1);

        (first.y..=last.y)
            .flat_map(|y| (first.x..=last.x).map(move |x| TileIndex::new(x, y)))
            .collect()
    }

    /// Change the canvas size. All tiles are discarded.
    ///
    /// # Panics
    /// If either dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) {
        assert!(
            width > 0 && height > 0,
            "surface dimensions must be positive, got {}x{}",
            width,
            height
        );
        if width == self.width && height == self.height {
            return;
        }

        tracing::info!(
            "Resizing surface {}x{} -> {}x{}, dropping {} tiles",
            self.width,
            self.height,
            width,
            height,
            self.tiles.len()
        );

        self.tiles.clear();
        self.width = width;
        self.height = height;
        self.tiles_x = tile_span(width);
        self.tiles_y = tile_span(height);
        self.null_tile.fill(0);
        self.listeners.emit(SurfaceEvent::SurfaceCleared);
    }

    /// Drop every tile
    pub fn clear(&mut self) {
        tracing::info!("Clearing surface ({} tiles)", self.tiles.len());
        for tile in self.tiles.values_mut() {
            tile.clear();
        }
        self.tiles.clear();
        self.listeners.emit(SurfaceEvent::SurfaceCleared);
    }

    /// Drop one tile. Returns false if it was not materialized.
    pub fn clear_tile(&mut self, index: TileIndex) -> bool {
        let Some(mut tile) = self.tiles.remove(&index) else {
            return false;
        };
        tile.clear();
        self.listeners.emit(SurfaceEvent::TileCleared {
            rect: tile.pixel_rect(),
        });
        true
    }

    /// True iff every pixel of `image` has zero alpha
    pub fn is_fully_transparent(image: &Image) -> bool {
        image.is_fully_transparent()
    }

    /// Paint `image` over the surface with its top-left corner at `top_left`.
    ///
    /// Each touched tile is re-rendered as existing content plus the image. Tiles that
    /// come out fully transparent are dropped instead of stored.
    pub fn composite_image_at(&mut self, image: &Image, top_left: Point) {
        let target = image.rect().translated(top_left.x, top_left.y);
        let indices = self.find_overlapping_tiles(&target);
        if indices.is_empty() {
            return;
        }
        self.refresh_stale(&indices);

        let tiles = &self.tiles;
        let rendered: Vec<(TileIndex, Option<Image>)> = indices
            .par_iter()
            .map(|&index| {
                let mut scratch = match tiles.get(&index) {
                    Some(tile) => tile.display().clone(),
                    None => Image::new(TILE_SIZE, TILE_SIZE),
                };
                let origin = index.to_pixel_position();
                scratch.draw_image(
                    image,
                    Point::new(
                        top_left.x.saturating_sub(origin.x),
                        top_left.y.saturating_sub(origin.y),
                    ),
                );
                if Self::is_fully_transparent(&scratch) {
                    (index, None)
                } else {
                    (index, Some(scratch))
                }
            })
            .collect();

        tracing::debug!(
            "Composited {}x{} image at ({}, {}) over {} tiles",
            image.width(),
            image.height(),
            top_left.x,
            top_left.y,
            rendered.len()
        );

        for (index, scratch) in rendered {
            match scratch {
                Some(scratch) => self.install_tile_image(index, scratch),
                None => {
                    self.clear_tile(index);
                }
            }
        }
    }

    /// Make every pixel inside `rect` transparent
    pub fn clear_area(&mut self, rect: &Rect) {
        let indices = self.find_overlapping_tiles(rect);
        self.refresh_stale(&indices);

        let mut cleared = 0usize;
        for index in indices {
            let Some(tile) = self.tiles.get(&index) else {
                continue;
            };
            let tile_rect = tile.pixel_rect();
            if rect.contains_rect(&tile_rect) {
                self.clear_tile(index);
                cleared += 1;
                continue;
            }

            let mut scratch = tile.display().clone();
            scratch.erase_rect(&rect.translated(-tile_rect.x, -tile_rect.y));
            if Self::is_fully_transparent(&scratch) {
                self.clear_tile(index);
                cleared += 1;
            } else {
                self.install_tile_image(index, scratch);
            }
        }

        tracing::debug!(
            "Cleared area ({}, {}) {}x{}, {} tiles dropped",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            cleared
        );
    }

    /// High-precision RGBA at a canvas pixel. Absent tiles read as transparent;
    /// points outside the canvas give `None`.
    pub fn sample_pixel(&mut self, pos: Point) -> Option<[u16; 4]> {
        if !self.rect().contains(pos) {
            return None;
        }
        let index = TileIndex::containing(pos.x, pos.y);
        let Some(tile) = self.tiles.get_mut(&index) else {
            return Some([0; 4]);
        };
        let origin = tile.position();
        let i = (((pos.y - origin.y) as u32 * TILE_SIZE + (pos.x - origin.x) as u32) * 4) as usize;
        let buffer = tile.write_buffer(true);
        Some([buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]])
    }

    /// Flatten the committed display content of all tiles into one canvas-sized image.
    ///
    /// Writes that were never passed to [`Surface::commit_write_buffer`] are not
    /// included; the result matches what the display layer was told about.
    pub fn flatten(&self) -> Image {
        let mut out = Image::new(self.width, self.height);
        for tile in self.tiles.values() {
            out.draw_image(tile.display(), tile.position());
        }
        out
    }

    /// Write the visible pixels to `path` as PNG.
    ///
    /// Reads committed display content only, like [`Surface::flatten`]. Uncommitted
    /// buffer writes are left out.
    pub fn save(&self, path: impl AsRef<Path>) -> SurfaceResult<()> {
        let path = path.as_ref();
        tracing::info!(
            "Saving surface {}x{} ({} tiles) to {:?}",
            self.width,
            self.height,
            self.tiles.len(),
            path
        );
        crate::file::save_png(&self.flatten(), path)
    }

    fn refresh_stale(&mut self, indices: &BTreeSet<TileIndex>) {
        for index in indices {
            if let Some(tile) = self.tiles.get_mut(index) {
                if !tile.is_cache_valid() {
                    tile.refresh_display_cache();
                }
            }
        }
    }

    fn install_tile_image(&mut self, index: TileIndex, image: Image) {
        let rect = index.pixel_rect();
        let event = match self.tiles.entry(index) {
            Entry::Occupied(entry) => {
                entry.into_mut().install_display_image(image);
                SurfaceEvent::TileUpdated { index, rect }
            }
            Entry::Vacant(entry) => {
                entry.insert(Tile::new(index)).install_display_image(image);
                SurfaceEvent::TileAdded { index, rect }
            }
        };
        self.listeners.emit(event);
    }
}

impl TileTarget for Surface {
    fn request_write_buffer(&mut self, tx: i32, ty: i32) -> &mut [u16] {
        Surface::request_write_buffer(self, tx, ty)
    }

    fn commit_write_buffer(&mut self, tx: i32, ty: i32) {
        Surface::commit_write_buffer(self, tx, ty)
    }
}
