//! The graphics seam.
//!
//! Effects talk to a [`Backend`] instead of a WebGL context directly, so the
//! same scene code runs against the browser (`web` feature) and against a
//! recording backend in tests. The calls map one-to-one onto WebGL 1.

use crate::error::{EffectError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub usize);

/// Layout of one vertex attribute inside the bound buffer, in `f32` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    pub components: usize,
    pub stride: usize,
    pub offset: usize,
}

impl AttributeLayout {
    /// Tightly packed attribute with `components` floats per vertex.
    pub const fn packed(components: usize) -> Self {
        Self {
            components,
            stride: 0,
            offset: 0,
        }
    }
}

/// A canvas with a WebGL-style drawing context.
///
/// Uniform and attribute lookups that miss (an optimized-out variable) are
/// silently ignored, as WebGL does.
pub trait Backend {
    /// Displayed size of the canvas element in CSS pixels.
    fn client_size(&self) -> (u32, u32);

    /// Size of the drawing buffer.
    fn set_canvas_size(&mut self, width: u32, height: u32);

    fn viewport(&mut self, width: u32, height: u32);

    /// Compile one shader, returning the driver's info log on failure.
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, String>;

    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId, String>;

    fn use_program(&mut self, program: ProgramId);

    /// Replace the contents of the vertex buffer and leave it bound.
    fn upload_vertices(&mut self, data: &[f32]) -> Result<(), String>;

    fn bind_attribute(&mut self, program: ProgramId, name: &str, layout: AttributeLayout);

    fn set_uniform_f32(&mut self, program: ProgramId, name: &str, value: f32);

    /// Column-major 4x4 matrix.
    fn set_uniform_mat4(&mut self, program: ProgramId, name: &str, value: &[f32; 16]);

    /// Premultiplied-alpha blending.
    fn enable_blending(&mut self);

    fn clear(&mut self, rgba: [f32; 4]);

    fn draw(&mut self, primitive: Primitive, vertex_count: usize);

    /// RGBA8 pixels of the drawing buffer, bottom row first.
    fn read_pixels(&mut self, width: u32, height: u32) -> Result<Vec<u8>, String>;
}

/// Compile and link a vertex/fragment pair.
///
/// Failures carry the compiler's diagnostic text and are also logged.
pub fn build_program<B: Backend>(backend: &mut B, vertex_source: &str, fragment_source: &str) -> Result<ProgramId> {
    let vertex = compile(backend, ShaderStage::Vertex, vertex_source)?;
    let fragment = compile(backend, ShaderStage::Fragment, fragment_source)?;

    backend.link_program(vertex, fragment).map_err(|log| {
        tracing::error!(%log, "shader program failed to link");
        EffectError::ProgramLink { log }
    })
}

fn compile<B: Backend>(backend: &mut B, stage: ShaderStage, source: &str) -> Result<ShaderId> {
    backend.compile_shader(stage, source).map_err(|log| {
        tracing::error!(%stage, %log, "shader failed to compile");
        EffectError::ShaderCompile { stage, log }
    })
}
