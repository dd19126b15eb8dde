//! Full-screen fragment shader effect.
//!
//! The vertex shader receives a quad covering clip space as `a_position`;
//! the fragment shader gets `time` in seconds.

use crate::backend::{AttributeLayout, Backend, Primitive, ProgramId, build_program};
use crate::clock::Clock;
use crate::error::{EffectError, Result};
use crate::host::{Glimpse, Scene};

/// Two triangles covering clip space.
const QUAD: [f32; 12] = [
    -1.0, -1.0, //
    1.0, -1.0, //
    -1.0, 1.0, //
    -1.0, 1.0, //
    1.0, -1.0, //
    1.0, 1.0,
];

const CLEAR_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// A canvas and the shader pair to run on it.
pub struct CanvasConfig<B> {
    pub canvas: B,
    pub vertex_shader_source: String,
    pub fragment_shader_source: String,
}

/// A pixel shader canvas driven by the generic host.
pub type PixelCanvas<B, C> = Glimpse<B, C, PixelShader>;

impl<B: Backend, C: Clock> Glimpse<B, C, PixelShader> {
    /// Compile the shaders, upload the quad and start the clock.
    pub fn from_config(config: CanvasConfig<B>, clock: C) -> Result<Self> {
        let scene = PixelShader::new(config.vertex_shader_source, config.fragment_shader_source);
        Self::new(config.canvas, clock, scene)
    }
}

#[derive(Debug, Clone)]
pub struct PixelShader {
    vertex_source: String,
    fragment_source: String,
    program: Option<ProgramId>,
    time: f32,
}

impl PixelShader {
    pub fn new(vertex_source: impl Into<String>, fragment_source: impl Into<String>) -> Self {
        Self {
            vertex_source: vertex_source.into(),
            fragment_source: fragment_source.into(),
            program: None,
            time: 0.0,
        }
    }

    /// Value of the `time` uniform, in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }
}

impl<B: Backend> Scene<B> for PixelShader {
    fn init(&mut self, backend: &mut B) -> Result<()> {
        let program = build_program(backend, &self.vertex_source, &self.fragment_source)?;
        backend.use_program(program);
        backend
            .upload_vertices(&QUAD)
            .map_err(EffectError::Backend)?;
        self.program = Some(program);
        Ok(())
    }

    fn resize(&mut self, _: &mut B, _: u32, _: u32) -> Result<()> {
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, elapsed_ms: f64) {
        self.time = (elapsed_ms / 1000.0) as f32;
    }

    fn draw(&mut self, backend: &mut B) {
        let Some(program) = self.program else {
            return;
        };

        backend.clear(CLEAR_COLOR);
        backend.use_program(program);
        backend.bind_attribute(program, "a_position", AttributeLayout::packed(2));
        backend.set_uniform_f32(program, "time", self.time);
        backend.draw(Primitive::Triangles, QUAD.len() / 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ShaderStage;
    use crate::testing::{Call, ManualClock, RecordingBackend};

    const VERTEX: &str = "attribute vec2 a_position; void main() { gl_Position = vec4(a_position, 0.0, 1.0); }";
    const FRAGMENT: &str = "precision mediump float; uniform float time; void main() { gl_FragColor = vec4(time); }";

    fn config(backend: RecordingBackend) -> CanvasConfig<RecordingBackend> {
        CanvasConfig {
            canvas: backend,
            vertex_shader_source: VERTEX.into(),
            fragment_shader_source: FRAGMENT.into(),
        }
    }

    #[test]
    fn test_init_uploads_quad() {
        let canvas = PixelCanvas::from_config(config(RecordingBackend::new(64, 64)), ManualClock::new(0.0)).unwrap();

        assert!(canvas.backend().calls.contains(&Call::UploadVertices(QUAD.to_vec())));
        assert_eq!(canvas.size(), (64, 64));
    }

    #[test]
    fn test_frame_sets_time_in_seconds() {
        let clock = ManualClock::new(0.0);
        let mut canvas = PixelCanvas::from_config(config(RecordingBackend::new(64, 64)), clock.clone()).unwrap();

        clock.advance(1500.0);
        canvas.render();

        let calls = &canvas.backend().calls;
        assert!(calls.contains(&Call::Clear(CLEAR_COLOR)));
        assert!(calls.contains(&Call::BindAttribute("a_position".into(), AttributeLayout::packed(2))));
        assert!(calls.contains(&Call::UniformF32("time".into(), 1.5)));
        assert_eq!(calls.last(), Some(&Call::Draw(Primitive::Triangles, 6)));
        assert_eq!(canvas.scene().time(), 1.5);
    }

    #[test]
    fn test_step_from_paused() {
        let clock = ManualClock::new(0.0);
        let mut canvas = PixelCanvas::from_config(config(RecordingBackend::new(8, 8)), clock.clone()).unwrap();
        canvas.pause();

        canvas.step(1000.0);
        canvas.step(500.0);
        assert_eq!(canvas.scene().time(), 1.5);
    }

    #[test]
    fn test_shader_error_aborts_init() {
        let mut backend = RecordingBackend::new(8, 8);
        backend.fail_compile = Some(ShaderStage::Vertex);

        let result = PixelCanvas::from_config(config(backend), ManualClock::new(0.0));
        assert!(matches!(
            result,
            Err(EffectError::ShaderCompile { stage: ShaderStage::Vertex, .. })
        ));
    }
}
