//! Input module - stroke samples as delivered by the pen

use serde::{Deserialize, Serialize};

/// One pen sample in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeSample {
    /// X coordinate in canvas space
    pub x: f32,
    /// Y coordinate in canvas space
    pub y: f32,
    /// Pressure value (0.0 - 1.0)
    pub pressure: f32,
    /// Tilt X angle in degrees (-90 to 90)
    pub tilt_x: f32,
    /// Tilt Y angle in degrees (-90 to 90)
    pub tilt_y: f32,
    /// Seconds since the previous sample
    pub dt: f64,
}

impl StrokeSample {
    /// Create a sample with no tilt and no elapsed time
    pub fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self::with_tilt(x, y, pressure, 0.0, 0.0, 0.0)
    }

    /// Create with full parameters. Out-of-range values are clamped and NaN
    /// pressure, tilt or `dt` read as zero. Position is kept as given; check
    /// [`StrokeSample::is_finite`] before painting it.
    pub fn with_tilt(x: f32, y: f32, pressure: f32, tilt_x: f32, tilt_y: f32, dt: f64) -> Self {
        let or_zero = |v: f32| if v.is_nan() { 0.0 } else { v };
        Self {
            x,
            y,
            pressure: or_zero(pressure).clamp(0.0, 1.0),
            tilt_x: or_zero(tilt_x).clamp(-90.0, 90.0),
            tilt_y: or_zero(tilt_y).clamp(-90.0, 90.0),
            dt: if dt.is_nan() { 0.0 } else { dt.max(0.0) },
        }
    }

    /// True when the position is a real point on the canvas plane
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Point `t` of the way from `self` to `other`. `dt` is the share of `other.dt`
    /// elapsed at that point.
    pub fn lerp(&self, other: &StrokeSample, t: f32) -> StrokeSample {
        StrokeSample {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            pressure: self.pressure + (other.pressure - self.pressure) * t,
            tilt_x: self.tilt_x + (other.tilt_x - self.tilt_x) * t,
            tilt_y: self.tilt_y + (other.tilt_y - self.tilt_y) * t,
            dt: other.dt * t as f64,
        }
    }
}
