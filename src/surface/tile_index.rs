//! Integer coordinates in the infinite tile grid

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect};
use super::TILE_SIZE;

/// Grid coordinate of one tile. Not a pixel position.
///
/// Pixel <-> index conversion rounds to the nearest tile in both directions, so
/// `from_pixel_position(p).to_pixel_position()` snaps `p` to the nearest
/// multiple of [`TILE_SIZE`]. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileIndex {
    pub x: i32,
    pub y: i32,
}

impl TileIndex {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Top-left corner of the tile in pixel space.
    ///
    /// Saturates for indices whose pixel position does not fit in `i32`.
    pub fn to_pixel_position(self) -> Point {
        let t = TILE_SIZE as i32;
        Point::new(self.x.saturating_mul(t), self.y.saturating_mul(t))
    }

    /// Nearest tile to a pixel position (round half away from zero)
    pub fn from_pixel_position(pos: Point) -> Self {
        Self::new(round_div(pos.x), round_div(pos.y))
    }

    /// The `TILE_SIZE × TILE_SIZE` square this tile covers in pixel space
    pub fn pixel_rect(self) -> Rect {
        let pos = self.to_pixel_position();
        Rect::new(pos.x, pos.y, TILE_SIZE as i32, TILE_SIZE as i32)
    }

    /// Index of the tile that contains pixel `(x, y)`
    pub fn containing(x: i32, y: i32) -> Self {
        let t = TILE_SIZE as i32;
        Self::new(x.div_euclid(t), y.div_euclid(t))
    }
}

impl Ord for TileIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for TileIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(i32, i32)> for TileIndex {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[inline]
fn round_div(v: i32) -> i32 {
    (v as f64 / TILE_SIZE as f64).round() as i32
}
