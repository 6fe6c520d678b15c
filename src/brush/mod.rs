//! Brush engine module - the stroke-engine contract and a reference round brush
//!
//! A [`StrokeEngine`] turns stroke samples into pixels. It never owns pixels itself:
//! for every tile it wants to paint it asks a [`TileTarget`] for that tile's
//! high-precision buffer, writes into it, and commits the tile when done.

mod engine;
mod interpolation;
mod soft_dab;

pub use engine::SoftRoundBrush;
pub use interpolation::{DabSpacer, MAX_SEGMENT_DABS};
pub use soft_dab::{erf_scalar, render_dab, Dab, GaussParams};

use serde::{Deserialize, Serialize};

use crate::input::StrokeSample;
use crate::surface::Rect;

/// Tile buffer hand-off used by stroke engines
pub trait TileTarget {
    /// High-precision RGBA buffer of tile `(tx, ty)`, `TILE_SIZE² × 4` values long
    fn request_write_buffer(&mut self, tx: i32, ty: i32) -> &mut [u16];

    /// Writing to tile `(tx, ty)` is finished for now
    fn commit_write_buffer(&mut self, tx: i32, ty: i32);
}

/// Something that paints strokes into a [`TileTarget`]
pub trait StrokeEngine {
    fn begin_stroke(&mut self);

    /// Feed one input sample. May request and commit any number of tiles.
    fn stroke_to(&mut self, target: &mut dyn TileTarget, sample: &StrokeSample);

    /// Finish the stroke, returning the canvas area it touched
    fn end_stroke(&mut self, target: &mut dyn TileTarget) -> Option<Rect>;
}

/// Pressure curve types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PressureCurve {
    /// Linear mapping (1:1)
    #[default]
    Linear,
    /// Soft curve (more sensitive at low pressure)
    Soft,
    /// Hard curve (less sensitive at low pressure)
    Hard,
    /// Smoothstep: soft at both extremes, steep in the middle
    SCurve,
}

impl PressureCurve {
    /// Apply the pressure curve to a raw pressure value
    pub fn apply(&self, pressure: f32) -> f32 {
        let p = pressure.clamp(0.0, 1.0);

        match self {
            PressureCurve::Linear => p,
            // Ease-out
            PressureCurve::Soft => 1.0 - (1.0 - p).powi(2),
            // Ease-in
            PressureCurve::Hard => p.powi(2),
            PressureCurve::SCurve => p * p * (3.0 - 2.0 * p),
        }
    }
}

/// Brush settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrushSettings {
    /// Base radius in pixels
    pub radius: f32,
    /// Base opacity (0.0 - 1.0)
    pub opacity: f32,
    /// Hardness (0.0 - 1.0), affects edge falloff
    pub hardness: f32,
    /// Distance between dabs as a fraction of the diameter
    pub spacing: f32,
    /// Straight RGB colour (0.0 - 1.0)
    pub color: [f32; 3],
    /// Pressure affects size
    pub pressure_size: bool,
    /// Pressure affects opacity
    pub pressure_opacity: bool,
    /// Pressure curve for size
    pub size_curve: PressureCurve,
    /// Pressure curve for opacity
    pub opacity_curve: PressureCurve,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: 10.0,
            opacity: 1.0,
            hardness: 0.8,
            spacing: 0.25,
            color: [0.0, 0.0, 0.0],
            pressure_size: true,
            pressure_opacity: false,
            size_curve: PressureCurve::Linear,
            opacity_curve: PressureCurve::Linear,
        }
    }
}

impl BrushSettings {
    /// Dab radius for a given pen pressure
    pub fn radius_at(&self, pressure: f32) -> f32 {
        let r = if self.pressure_size {
            self.radius * self.size_curve.apply(pressure)
        } else {
            self.radius
        };
        r.max(0.5)
    }

    /// Dab opacity for a given pen pressure
    pub fn opacity_at(&self, pressure: f32) -> f32 {
        let o = if self.pressure_opacity {
            self.opacity * self.opacity_curve.apply(pressure)
        } else {
            self.opacity
        };
        o.clamp(0.0, 1.0)
    }

    /// Distance between consecutive dabs in pixels
    pub fn spacing_px(&self) -> f32 {
        (self.radius * 2.0 * self.spacing).max(1.0)
    }
}
