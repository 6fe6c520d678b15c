//! Integer pixel-space geometry

use serde::{Deserialize, Serialize};

/// A point in canvas pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle. Covers `[x, x + width) × [y, y + height)`.
///
/// Edge arithmetic saturates at the `i32` limits, so rectangles near the edge of
/// the coordinate space are clipped there instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True when the two rectangles share at least one pixel
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y)))
    }

    /// Smallest rectangle covering both. Empty rectangles are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_exclusive() {
        let a = Rect::new(0, 0, 64, 64);
        let b = Rect::new(64, 0, 64, 64);
        assert!(!a.intersects(&b));
        assert!(a.contains(Point::new(63, 63)));
        assert!(!a.contains(Point::new(64, 0)));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 64, 64);
        let b = Rect::new(32, 48, 64, 64);
        assert_eq!(a.intersection(&b), Some(Rect::new(32, 48, 32, 16)));
        assert_eq!(a.intersection(&Rect::new(100, 100, 1, 1)), None);
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = Rect::new(0, 0, 64, 64);
        assert!(!a.intersects(&Rect::new(10, 10, 0, 5)));
        assert!(!a.intersects(&Rect::new(10, 10, 5, -1)));
    }

    #[test]
    fn test_union_skips_empty() {
        let a = Rect::new(10, 10, 5, 5);
        assert_eq!(a.union(&Rect::default()), a);
        assert_eq!(Rect::default().union(&a), a);
        assert_eq!(
            a.union(&Rect::new(-5, 20, 2, 2)),
            Rect::new(-5, 10, 20, 12)
        );
    }

    #[test]
    fn test_edges_saturate_at_limits() {
        let r = Rect::new(i32::MAX - 10, i32::MIN, 64, 64);
        assert_eq!(r.right(), i32::MAX);
        assert_eq!(r.bottom(), i32::MIN + 64);
        assert!(r.contains(Point::new(i32::MAX - 1, i32::MIN)));

        let moved = r.translated(100, -100);
        assert_eq!((moved.x, moved.y), (i32::MAX, i32::MIN));
        assert_eq!(moved.right(), i32::MAX);

        let wide = Rect::new(i32::MIN, 0, 1, 1).union(&Rect::new(i32::MAX - 1, 0, 1, 1));
        assert_eq!(wide.x, i32::MIN);
        assert_eq!(wide.width, i32::MAX);
    }
}
