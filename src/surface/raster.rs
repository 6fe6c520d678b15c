//! Display-format image: 8-bit premultiplied ARGB packed into `u32`

use super::geometry::{Point, Rect};
use crate::core::{SurfaceError, SurfaceResult};

/// Pack premultiplied channels into an ARGB word
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub const fn alpha(pixel: u32) -> u8 {
    (pixel >> 24) as u8
}

/// Split an ARGB word into `[a, r, g, b]`
#[inline]
pub const fn channels(pixel: u32) -> [u8; 4] {
    [
        (pixel >> 24) as u8,
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    ]
}

/// Straight RGBA8 -> premultiplied ARGB
pub fn premultiply(rgba: [u8; 4]) -> u32 {
    let a = rgba[3] as u32;
    match a {
        0 => 0,
        255 => argb(255, rgba[0], rgba[1], rgba[2]),
        _ => {
            let mul = |c: u8| ((c as u32 * a + 127) / 255) as u8;
            argb(a as u8, mul(rgba[0]), mul(rgba[1]), mul(rgba[2]))
        }
    }
}

/// Premultiplied ARGB -> straight RGBA8
pub fn unpremultiply(pixel: u32) -> [u8; 4] {
    let [a, r, g, b] = channels(pixel);
    match a {
        0 => [0, 0, 0, 0],
        255 => [r, g, b, 255],
        _ => {
            let a32 = a as u32;
            let div = |c: u8| ((c as u32 * 255 + a32 / 2) / a32).min(255) as u8;
            [div(r), div(g), div(b), a]
        }
    }
}

/// Premultiplied source-over of a single pixel
#[inline]
fn source_over(src: u32, dst: u32) -> u32 {
    let sa = alpha(src);
    if sa == 255 || dst == 0 {
        return src;
    }
    if src == 0 {
        return dst;
    }
    let inv = 255 - sa as u32;
    let s = channels(src);
    let d = channels(dst);
    let blend = |i: usize| (s[i] as u32 + (d[i] as u32 * inv + 127) / 255).min(255) as u8;
    argb(blend(0), blend(1), blend(2), blend(3))
}

/// An 8-bit premultiplied ARGB raster
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Image {
    /// Create a fully transparent image
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Create an image filled with one premultiplied ARGB value
    pub fn filled(width: u32, height: u32, pixel: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        }
    }

    /// Wrap an existing pixel buffer. The buffer must hold exactly `width * height` pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> SurfaceResult<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
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

    /// `(0, 0, width, height)`
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Set a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = pixel;
        }
    }

    pub fn fill(&mut self, pixel: u32) {
        self.pixels.fill(pixel);
    }

    /// True iff every pixel has zero alpha
    pub fn is_fully_transparent(&self) -> bool {
        self.pixels.iter().all(|&p| alpha(p) == 0)
    }

    /// Paint `src` over this image with its top-left corner at `at`,
    /// clipped to this image's bounds.
    pub fn draw_image(&mut self, src: &Image, at: Point) {
        let Some(clip) = self.rect().intersection(&src.rect().translated(at.x, at.y)) else {
            return;
        };

        let dst_stride = self.width as usize;
        let src_stride = src.width as usize;
        let span = clip.width as usize;
        for y in clip.y..clip.bottom() {
            let dst_start = y as usize * dst_stride + clip.x as usize;
            let src_start = (y - at.y) as usize * src_stride + (clip.x - at.x) as usize;
            let dst_row = &mut self.pixels[dst_start..dst_start + span];
            let src_row = &src.pixels[src_start..src_start + span];
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d = source_over(s, *d);
            }
        }
    }

    /// Make every pixel inside `rect` fully transparent
    pub fn erase_rect(&mut self, rect: &Rect) {
        let Some(clip) = self.rect().intersection(rect) else {
            return;
        };
        let stride = self.width as usize;
        for y in clip.y..clip.bottom() {
            let start = y as usize * stride + clip.x as usize;
            self.pixels[start..start + clip.width as usize].fill(0);
        }
    }
}
