//! The effect host: owns the backend, the clock and a [`Scene`].
//!
//! ```text
//!            pause()                     resume()
//! running ───────────► paused ───────────────────► running
//!    │                   │
//!    │ render()          │ render(): time frozen
//!    │ step(d): +d       │ step(d): +d, draws once
//! ```
//!
//! The host never drives itself. Something calls [`Glimpse::render`] once
//! per animation frame (`web::animate` in the browser, a loop in tests) and
//! [`Glimpse::handle_resize_event`] on window resizes.

use crate::backend::Backend;
use crate::clock::Clock;
use crate::encode::{self, Blob};
use crate::error::{EffectError, Result};
use crate::timeline::Timeline;

/// An animated drawing on top of a [`Backend`].
pub trait Scene<B: Backend> {
    /// Compile shaders and upload static buffers.
    fn init(&mut self, backend: &mut B) -> Result<()>;

    /// Canvas size changed (also called once right after `init`).
    fn resize(&mut self, backend: &mut B, width: u32, height: u32) -> Result<()>;

    /// Elapsed animation time in milliseconds, before each draw.
    fn update(&mut self, elapsed_ms: f64);

    fn draw(&mut self, backend: &mut B);
}

pub struct Glimpse<B, C, S> {
    backend: B,
    clock: C,
    scene: S,
    timeline: Timeline,
    resize_attached: bool,
    size: (u32, u32),
}

impl<B: Backend, C: Clock, S: Scene<B>> Glimpse<B, C, S> {
    /// Initialize the scene, size it to the canvas, and start the clock.
    pub fn new(mut backend: B, clock: C, mut scene: S) -> Result<Self> {
        scene.init(&mut backend)?;

        let timeline = Timeline::new(clock.now());
        let mut glimpse = Self {
            backend,
            clock,
            scene,
            timeline,
            resize_attached: false,
            size: (0, 0),
        };
        glimpse.attach_resize()?;
        Ok(glimpse)
    }

    /// Draw one frame, advancing time unless paused.
    pub fn render(&mut self) {
        self.timeline.tick(self.clock.now());
        self.draw();
    }

    /// Resize the canvas; a missing or zero dimension falls back to the
    /// canvas' displayed size.
    pub fn resize(&mut self, width: Option<u32>, height: Option<u32>) -> Result<()> {
        let (client_width, client_height) = self.backend.client_size();
        let width = width.filter(|w| *w > 0).unwrap_or(client_width);
        let height = height.filter(|h| *h > 0).unwrap_or(client_height);

        self.backend.set_canvas_size(width, height);
        self.backend.viewport(width, height);
        self.scene.resize(&mut self.backend, width, height)?;
        self.size = (width, height);
        Ok(())
    }

    /// Window resize callback; ignored while detached (during `to_blob`).
    pub fn handle_resize_event(&mut self) -> Result<()> {
        if self.resize_attached {
            self.resize(None, None)?;
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        self.timeline.pause(self.clock.now());
    }

    pub fn resume(&mut self) {
        self.timeline.resume(self.clock.now());
    }

    /// Advance time by exactly `delta_ms` and draw once.
    pub fn step(&mut self, delta_ms: f64) {
        self.timeline.step(delta_ms);
        self.draw();
    }

    /// Render a `width × height` still and hand it to `callback`.
    ///
    /// Pauses and stops following window resizes for the capture, then
    /// resizes back to the canvas and resumes if it was running.
    pub fn to_blob(
        &mut self,
        callback: impl FnOnce(Blob),
        width: u32,
        height: u32,
        mime_type: &str,
        quality: Option<f64>,
    ) -> Result<()> {
        let was_paused = self.timeline.is_paused();
        self.pause();
        self.resize_attached = false;

        let captured = self.capture(width, height, mime_type, quality).map(callback);

        let restored = self.attach_resize();
        if !was_paused {
            self.resume();
        }
        captured.and(restored)
    }

    pub fn elapsed(&self) -> f64 {
        self.timeline.elapsed()
    }

    pub fn is_paused(&self) -> bool {
        self.timeline.is_paused()
    }

    pub fn is_resize_attached(&self) -> bool {
        self.resize_attached
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn draw(&mut self) {
        self.scene.update(self.timeline.elapsed());
        self.scene.draw(&mut self.backend);
    }

    fn attach_resize(&mut self) -> Result<()> {
        self.resize_attached = true;
        self.resize(None, None)
    }

    fn capture(&mut self, width: u32, height: u32, mime_type: &str, quality: Option<f64>) -> Result<Blob> {
        self.resize(Some(width), Some(height))?;
        let (width, height) = self.size;
        self.render();

        let pixels = self
            .backend
            .read_pixels(width, height)
            .map_err(EffectError::Backend)?;
        encode::encode(pixels, width, height, mime_type, quality)
    }
}
