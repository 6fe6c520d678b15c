//! Surface controller - the façade the application talks to
//!
//! Owns one [`Surface`] and one [`StrokeEngine`]. Stroke input goes to the
//! engine, which paints back into the surface through [`TileTarget`]; image and
//! area operations go straight to the surface. Listeners registered here see
//! every tile notification the surface emits.
//!
//! [`TileTarget`]: crate::brush::TileTarget

use std::path::Path;

use crate::brush::{SoftRoundBrush, StrokeEngine};
use crate::core::{CanvasConfig, SurfaceResult};
use crate::file;
use crate::input::StrokeSample;
use crate::surface::{argb, to_display_channel, Image, Point, Rect, Surface, SurfaceListener};

pub struct SurfaceController<E: StrokeEngine = SoftRoundBrush> {
    surface: Surface,
    engine: E,
    stroking: bool,
}

impl SurfaceController<SoftRoundBrush> {
    /// Controller with the built-in round brush configured from `config`
    pub fn from_config(config: &CanvasConfig) -> SurfaceResult<Self> {
        Self::new(config, SoftRoundBrush::with_settings(config.brush.clone()))
    }
}

impl<E: StrokeEngine> SurfaceController<E> {
    /// Create a controller for a canvas described by `config`
    pub fn new(config: &CanvasConfig, engine: E) -> SurfaceResult<Self> {
        config.validate()?;
        Self::with_size(config.width, config.height, engine)
    }

    pub fn with_size(width: u32, height: u32, engine: E) -> SurfaceResult<Self> {
        Ok(Self {
            surface: Surface::new(width, height)?,
            engine,
            stroking: false,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Register a listener for tile notifications
    pub fn subscribe(&mut self, listener: impl SurfaceListener + 'static) {
        self.surface.subscribe(listener);
    }

    pub fn is_stroking(&self) -> bool {
        self.stroking
    }

    pub fn begin_stroke(&mut self) {
        if self.stroking {
            tracing::debug!("begin_stroke during an open stroke, restarting");
        }
        self.engine.begin_stroke();
        self.stroking = true;
    }

    /// Forward one pen sample to the brush engine.
    ///
    /// Starts a stroke if none is open.
    pub fn stroke_to(&mut self, x: f32, y: f32, pressure: f32, tilt_x: f32, tilt_y: f32, dt: f64) {
        self.stroke_sample(&StrokeSample::with_tilt(x, y, pressure, tilt_x, tilt_y, dt));
    }

    pub fn stroke_sample(&mut self, sample: &StrokeSample) {
        if !self.stroking {
            self.begin_stroke();
        }
        self.engine.stroke_to(&mut self.surface, sample);
    }

    /// Close the open stroke. Returns the canvas area it painted, or `None` if
    /// nothing was painted or no stroke was open.
    pub fn end_stroke(&mut self) -> Option<Rect> {
        if !self.stroking {
            return None;
        }
        self.stroking = false;
        let bounds = self.engine.end_stroke(&mut self.surface);
        if let Some(b) = bounds {
            tracing::debug!(
                "Stroke painted ({}, {}) {}x{}",
                b.x,
                b.y,
                b.width,
                b.height
            );
        }
        bounds
    }

    /// Replace the canvas content with `image` placed at `top_left`
    pub fn load_image(&mut self, image: &Image, top_left: Point) {
        self.surface.clear();
        self.surface.composite_image_at(image, top_left);
    }

    /// Decode an image file and replace the canvas content with it
    pub fn load_image_file(&mut self, path: impl AsRef<Path>, top_left: Point) -> SurfaceResult<()> {
        let image = file::load_image(path)?;
        self.load_image(&image, top_left);
        Ok(())
    }

    /// Paint `image` over the existing content
    pub fn draw_image_at(&mut self, image: &Image, top_left: Point) {
        self.surface.composite_image_at(image, top_left);
    }

    pub fn clear_area(&mut self, rect: &Rect) {
        self.surface.clear_area(rect);
    }

    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Change the canvas size, discarding all content.
    ///
    /// # Panics
    /// If either dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SurfaceResult<()> {
        self.surface.save(path)
    }

    /// Premultiplied ARGB colour under `pos`, read from the high-precision buffer.
    /// `None` outside the canvas.
    pub fn pick_color(&mut self, pos: Point) -> Option<u32> {
        let [r, g, b, a] = self.surface.sample_pixel(pos)?;
        Some(argb(
            to_display_channel(a),
            to_display_channel(r),
            to_display_channel(g),
            to_display_channel(b),
        ))
    }
}

impl<E: StrokeEngine> std::fmt::Debug for SurfaceController<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceController")
            .field("surface", &self.surface)
            .field("stroking", &self.stroking)
            .finish_non_exhaustive()
    }
}
