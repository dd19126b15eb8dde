//! Wireframe plane rippled by a travelling sine wave.
//!
//! Every vertex is pushed along its normal by
//! `drMax * sin((t + x/w + y/(4h)) * 10) * (sin(t/5) + 1.5)`, and the plane
//! is tilted away from the camera so the ripples read as a horizon. The
//! fragment shader fades the lines out towards the edges.

use crate::backend::{AttributeLayout, Backend, Primitive, ProgramId, build_program};
use crate::error::{EffectError, Result};
use crate::host::Scene;
use crate::math::Mat4;
use crate::mesh::{PlaneGeometry, WIREFRAME_STRIDE};
use std::f32::consts::PI;

pub const VERTEX_SHADER: &str = r"
precision mediump float;

attribute vec3 position;
attribute vec3 normal;

uniform mat4 projectionMatrix;
uniform mat4 modelViewMatrix;
uniform float t;
uniform float drMax;
uniform float w;
uniform float h;

varying vec3 vPosition;

void main() {
    vPosition = position;
    float drFactor = sin((t + position.x / w + position.y / (4.0 * h)) * 10.0) * (sin(t / 5.0) + 1.5);
    float dr = drMax * drFactor;
    vec3 newPosition = position + normal * dr;
    gl_Position = projectionMatrix * modelViewMatrix * vec4(newPosition, 1.0);
}
";

pub const FRAGMENT_SHADER: &str = r"
precision mediump float;

uniform float w;
uniform float h;

varying vec3 vPosition;

void main() {
    float alpha = min(1.0, min(-(vPosition.y / 1.5 - h / 2.0) / h, ((w / 2.0) - abs(vPosition.x)) / w));
    vec3 color = 0.5 * vec3(1.0, 1.0, 1.0);
    gl_FragColor = vec4(color.rgb * alpha, alpha);
}
";

/// Time scale from elapsed milliseconds to the `t` uniform.
const TIME_SCALE: f64 = 0.000_25;
/// Peak displacement along the normal.
const DR_MAX: f32 = 10.0;
/// Minimum grid segments per axis.
const MIN_SEGMENTS: u32 = 20;
/// Target pixels per grid segment.
const SEGMENT_PIXELS: f32 = 20.0;

const FOV_Y_DEGREES: f32 = 60.0;
const NEAR: f32 = 1.0;
const FAR: f32 = 10_000.0;

/// Current values of the shader's scalar uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveUniforms {
    pub t: f32,
    pub dr_max: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone)]
pub struct Wave {
    program: Option<ProgramId>,
    uniforms: WaveUniforms,
    segments: (u32, u32),
    vertex_count: usize,
    model_view: Mat4,
    projection: Mat4,
}

impl Default for Wave {
    fn default() -> Self {
        Self::new()
    }
}

impl Wave {
    pub fn new() -> Self {
        Self {
            program: None,
            uniforms: WaveUniforms {
                t: 0.0,
                dr_max: DR_MAX,
                w: 0.0,
                h: 0.0,
            },
            segments: (MIN_SEGMENTS, MIN_SEGMENTS),
            vertex_count: 0,
            model_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }

    /// Grid density for a canvas size: `max(20, round(size / 20))` per axis.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn segments_for(width: u32, height: u32) -> (u32, u32) {
        let per_axis = |size: u32| ((size as f32 / SEGMENT_PIXELS).round() as u32).max(MIN_SEGMENTS);
        (per_axis(width), per_axis(height))
    }

    pub fn uniforms(&self) -> WaveUniforms {
        self.uniforms
    }

    pub fn segments(&self) -> (u32, u32) {
        self.segments
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn model_view(&self) -> Mat4 {
        self.model_view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }
}

impl<B: Backend> Scene<B> for Wave {
    fn init(&mut self, backend: &mut B) -> Result<()> {
        let program = build_program(backend, VERTEX_SHADER, FRAGMENT_SHADER)?;
        backend.enable_blending();
        self.program = Some(program);
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn resize(&mut self, backend: &mut B, width: u32, height: u32) -> Result<()> {
        let (w, h) = (width as f32, height as f32);
        self.uniforms.w = w;
        self.uniforms.h = h;
        self.segments = Self::segments_for(width, height);

        let (dx, dy) = self.segments;
        let plane = PlaneGeometry::new(w * 1.1, h * 1.5, dx, dy);
        let vertices = plane.wireframe_vertices();
        backend.upload_vertices(&vertices).map_err(EffectError::Backend)?;
        self.vertex_count = vertices.len() / WIREFRAME_STRIDE;

        // Mesh tilted back and raised; camera on the Z axis at distance h
        let model = Mat4::translation(0.0, h / 10.0, 0.0) * Mat4::rotation_x(-PI / 3.0);
        let view = Mat4::translation(0.0, 0.0, -h);
        self.model_view = view * model;
        self.projection = Mat4::perspective(FOV_Y_DEGREES, w / h.max(1.0), NEAR, FAR);
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, elapsed_ms: f64) {
        self.uniforms.t = (TIME_SCALE * elapsed_ms) as f32;
    }

    fn draw(&mut self, backend: &mut B) {
        let Some(program) = self.program else {
            return;
        };
        let WaveUniforms { t, dr_max, w, h } = self.uniforms;

        backend.clear([0.0, 0.0, 0.0, 0.0]);
        backend.use_program(program);
        let layout = |offset| AttributeLayout {
            components: 3,
            stride: WIREFRAME_STRIDE,
            offset,
        };
        backend.bind_attribute(program, "position", layout(0));
        backend.bind_attribute(program, "normal", layout(3));

        backend.set_uniform_f32(program, "t", t);
        backend.set_uniform_f32(program, "drMax", dr_max);
        backend.set_uniform_f32(program, "w", w);
        backend.set_uniform_f32(program, "h", h);
        backend.set_uniform_mat4(program, "projectionMatrix", &self.projection.0);
        backend.set_uniform_mat4(program, "modelViewMatrix", &self.model_view.0);

        backend.draw(Primitive::Lines, self.vertex_count);
    }
}
