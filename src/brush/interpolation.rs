//! Even dab spacing along a stroke

use crate::input::StrokeSample;

/// Upper bound on dabs placed for one input segment
pub const MAX_SEGMENT_DABS: usize = 65_536;

/// Places samples at a fixed distance along the stroke path.
///
/// Leftover distance carries over between segments, so spacing stays even no matter
/// how the input is chunked.
#[derive(Debug, Clone)]
pub struct DabSpacer {
    spacing: f32,
    /// Distance travelled since the last placed dab
    travelled: f32,
}

impl DabSpacer {
    pub fn new(spacing: f32) -> Self {
        Self {
            spacing: spacing.max(f32::EPSILON),
            travelled: 0.0,
        }
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Forget carried distance (call when a stroke ends)
    pub fn reset(&mut self) {
        self.travelled = 0.0;
    }

    /// Dab positions on the segment `from -> to`, excluding `from` itself.
    ///
    /// A segment that would need more than [`MAX_SEGMENT_DABS`] dabs is treated as a
    /// jump: one dab at `to` and the carried distance is dropped. Non-finite
    /// segments produce nothing.
    pub fn step(&mut self, from: &StrokeSample, to: &StrokeSample) -> Vec<StrokeSample> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if !dist.is_finite() {
            tracing::warn!("Skipping non-finite stroke segment");
            self.travelled = 0.0;
            return vec![];
        }
        if dist <= 0.0 {
            return vec![];
        }

        let first = self.spacing - self.travelled;
        if first > dist {
            self.travelled += dist;
            return vec![];
        }

        let count = (((dist - first) / self.spacing) as usize).saturating_add(1);
        if count > MAX_SEGMENT_DABS {
            tracing::warn!(
                "Stroke segment of {:.0}px needs {} dabs, placing one at the end",
                dist,
                count
            );
            self.travelled = 0.0;
            return vec![*to];
        }

        let result: Vec<StrokeSample> = (0..count)
            .map(|i| first + i as f32 * self.spacing)
            .filter(|&pos| pos <= dist)
            .map(|pos| from.lerp(to, pos / dist))
            .collect();

        let last = first + (count - 1) as f32 * self.spacing;
        self.travelled = (dist - last).clamp(0.0, self.spacing);

        result
    }
}
