//! Soft round dab rendering into high-precision tile buffers
//!
//! The mask is a Krita-style Gaussian built from two erf terms; `hardness`
//! controls how wide the falloff band is. Compositing is premultiplied
//! source-over in the tile buffer's `1 << 15` fixed-point scale.
//!
//! Reference: Krita's kis_brush_mask_processor_factories.cpp

use std::f32::consts::SQRT_2;

use crate::surface::{Point, Rect, FIXED_ONE, TILE_SIZE};

/// Gaussian mask parameters (pre-calculated for performance)
#[derive(Clone, Debug)]
pub struct GaussParams {
    pub center: f32,
    pub alphafactor: f32,
    pub distfactor: f32,
    pub fade: f32,
}

impl GaussParams {
    /// # Arguments
    /// * `hardness` - Brush hardness (0.0 = soft, 1.0 = hard)
    /// * `radius` - Brush radius in pixels
    pub fn new(hardness: f32, radius: f32) -> Self {
        let fade = (1.0 - hardness.clamp(0.0, 1.0)) * 2.0;
        let safe_fade = fade.clamp(1e-6, 2.0);

        let center = (2.5 * (6761.0 * safe_fade - 10000.0)) / (SQRT_2 * 6761.0 * safe_fade);
        let alphafactor = 255.0 / (2.0 * erf_scalar(center));
        let distfactor = SQRT_2 * 12500.0 / (6761.0 * safe_fade * radius.max(0.5));

        Self {
            center,
            alphafactor,
            distfactor,
            fade: safe_fade,
        }
    }

    /// Coverage (0.0 - 1.0) at `dist` pixels from the dab centre
    #[inline]
    pub fn coverage(&self, dist: f32) -> f32 {
        let val_dist = dist * self.distfactor;
        let full_fade = self.alphafactor
            * (erf_scalar(val_dist + self.center) - erf_scalar(val_dist - self.center));
        (full_fade / 255.0).clamp(0.0, 1.0)
    }

    /// How far past the radius the falloff can reach
    pub fn extent(&self, radius: f32) -> i32 {
        (radius * (1.0 + self.fade) + 1.0).ceil() as i32
    }
}

/// Scalar erf function (Abramowitz and Stegun formula 7.1.26)
/// Accuracy: |error| < 1.5e-7
#[inline]
pub fn erf_scalar(x: f32) -> f32 {
    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();

    const A1: f32 = 0.254_829_6;
    const A2: f32 = -0.284_496_72;
    const A3: f32 = 1.421_413_8;
    const A4: f32 = -1.453_152_1;
    const A5: f32 = 1.061_405_4;
    const P: f32 = 0.327_591_1;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// One brush stamp in canvas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dab {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
}

impl Dab {
    /// Pixel area the dab may touch
    pub fn bounds(&self, params: &GaussParams) -> Rect {
        let extent = params.extent(self.radius);
        let left = (self.x.floor() as i32).saturating_sub(extent);
        let top = (self.y.floor() as i32).saturating_sub(extent);
        let size = extent.saturating_mul(2).saturating_add(1);
        Rect::new(left, top, size, size)
    }
}

/// Paint one dab into the tile whose top-left pixel is `origin`.
///
/// `buffer` is the tile's premultiplied RGBA buffer and `color` is straight RGB in
/// 0.0 - 1.0. Returns the canvas-space area actually written.
pub fn render_dab(
    buffer: &mut [u16],
    origin: Point,
    dab: &Dab,
    params: &GaussParams,
    color: [f32; 3],
) -> Option<Rect> {
    let tile_rect = Rect::new(origin.x, origin.y, TILE_SIZE as i32, TILE_SIZE as i32);
    let clip = dab.bounds(params).intersection(&tile_rect)?;
    let opacity = dab.opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return None;
    }

    let one = FIXED_ONE as f32;
    let mut touched = Rect::default();

    for y in clip.y..clip.bottom() {
        let dy = y as f32 + 0.5 - dab.y;
        let row = ((y - origin.y) as u32 * TILE_SIZE) as usize;

        for x in clip.x..clip.right() {
            let dx = x as f32 + 0.5 - dab.x;
            let mask = params.coverage((dx * dx + dy * dy).sqrt());
            let a = (mask * opacity * one) as u32;
            if a == 0 {
                continue;
            }
            let a = a.min(FIXED_ONE);
            let inv = FIXED_ONE - a;

            let i = (row + (x - origin.x) as usize) * 4;
            let px = &mut buffer[i..i + 4];
            for (c, &channel) in px.iter_mut().zip(&color) {
                let src = (channel.clamp(0.0, 1.0) * a as f32) as u32;
                *c = (src + (*c as u32 * inv) / FIXED_ONE).min(FIXED_ONE) as u16;
            }
            px[3] = (a + (px[3] as u32 * inv) / FIXED_ONE).min(FIXED_ONE) as u16;

            touched = touched.union(&Rect::new(x, y, 1, 1));
        }
    }

    (!touched.is_empty()).then_some(touched)
}
