//! Brush engine - turns stroke samples into dabs painted through a `TileTarget`

use std::collections::BTreeMap;

use super::interpolation::DabSpacer;
use super::soft_dab::{render_dab, Dab, GaussParams};
use super::{BrushSettings, StrokeEngine, TileTarget};
use crate::input::StrokeSample;
use crate::surface::{Rect, TileIndex};

/// Round soft brush painting straight into high-precision tile buffers
#[derive(Debug, Clone)]
pub struct SoftRoundBrush {
    settings: BrushSettings,
    spacer: DabSpacer,
    last: Option<StrokeSample>,
    stroke_bounds: Rect,
}

impl SoftRoundBrush {
    /// Create a new brush with default settings
    pub fn new() -> Self {
        Self::with_settings(BrushSettings::default())
    }

    /// Create with custom settings
    pub fn with_settings(settings: BrushSettings) -> Self {
        let spacer = DabSpacer::new(settings.spacing_px());
        Self {
            settings,
            spacer,
            last: None,
            stroke_bounds: Rect::default(),
        }
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    /// Update brush settings. Takes effect from the next sample.
    pub fn set_settings(&mut self, settings: BrushSettings) {
        self.spacer = DabSpacer::new(settings.spacing_px());
        self.settings = settings;
    }

    /// Set brush color (straight RGB, 0.0-1.0)
    pub fn set_color(&mut self, color: [f32; 3]) {
        self.settings.color = color;
    }

    fn dab_for(&self, sample: &StrokeSample) -> Option<Dab> {
        if !sample.is_finite() {
            return None;
        }
        if sample.pressure <= 0.0 && self.settings.pressure_size {
            return None;
        }
        let opacity = self.settings.opacity_at(sample.pressure);
        if opacity <= 0.0 {
            return None;
        }
        Some(Dab {
            x: sample.x,
            y: sample.y,
            radius: self.settings.radius_at(sample.pressure),
            opacity,
        })
    }

    /// Paint `dabs`, requesting and committing each touched tile exactly once
    fn paint(&mut self, target: &mut dyn TileTarget, dabs: &[Dab]) {
        if dabs.is_empty() {
            return;
        }

        let params: Vec<GaussParams> = dabs
            .iter()
            .map(|dab| GaussParams::new(self.settings.hardness, dab.radius))
            .collect();

        let mut by_tile: BTreeMap<TileIndex, Vec<usize>> = BTreeMap::new();
        for (i, (dab, params)) in dabs.iter().zip(&params).enumerate() {
            let bounds = dab.bounds(params);
            let first = TileIndex::containing(bounds.x, bounds.y);
            let last = TileIndex::containing(bounds.right() - 1, bounds.bottom() - 1);
            for ty in first.y..=last.y {
                for tx in first.x..=last.x {
                    by_tile.entry(TileIndex::new(tx, ty)).or_default().push(i);
                }
            }
        }

        let color = self.settings.color;
        for (index, dab_ids) in by_tile {
            let origin = index.to_pixel_position();
            let buffer = target.request_write_buffer(index.x, index.y);
            for i in dab_ids {
                if let Some(touched) = render_dab(buffer, origin, &dabs[i], &params[i], color) {
                    self.stroke_bounds = self.stroke_bounds.union(&touched);
                }
            }
            target.commit_write_buffer(index.x, index.y);
        }
    }
}

impl Default for SoftRoundBrush {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeEngine for SoftRoundBrush {
    fn begin_stroke(&mut self) {
        self.last = None;
        self.spacer.reset();
        self.stroke_bounds = Rect::default();
    }

    fn stroke_to(&mut self, target: &mut dyn TileTarget, sample: &StrokeSample) {
        if !sample.is_finite() {
            tracing::warn!("Ignoring non-finite stroke sample ({}, {})", sample.x, sample.y);
            return;
        }
        let samples = match self.last {
            // The first sample of a stroke always gets a dab
            None => vec![*sample],
            Some(last) => self.spacer.step(&last, sample),
        };
        self.last = Some(*sample);

        let dabs: Vec<Dab> = samples.iter().filter_map(|s| self.dab_for(s)).collect();
        self.paint(target, &dabs);
    }

    fn end_stroke(&mut self, _target: &mut dyn TileTarget) -> Option<Rect> {
        let bounds = std::mem::take(&mut self.stroke_bounds);
        self.last = None;
        self.spacer.reset();

        tracing::debug!("Stroke ended, bounds {:?}", bounds);
        (!bounds.is_empty()).then_some(bounds)
    }
}
