//! Test doubles: a backend that records every call and a hand-driven clock.

use crate::backend::{AttributeLayout, Backend, Primitive, ProgramId, ShaderId, ShaderStage};
use crate::clock::Clock;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetCanvasSize(u32, u32),
    Viewport(u32, u32),
    CompileShader(ShaderStage),
    LinkProgram,
    UseProgram(ProgramId),
    UploadVertices(Vec<f32>),
    BindAttribute(String, AttributeLayout),
    UniformF32(String, f32),
    UniformMat4(String, [f32; 16]),
    EnableBlending,
    Clear([f32; 4]),
    Draw(Primitive, usize),
    ReadPixels(u32, u32),
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub client_size: (u32, u32),
    pub canvas_size: (u32, u32),
    pub fail_compile: Option<ShaderStage>,
    pub fail_link: bool,
    pub fail_read: bool,
    shaders: usize,
    programs: usize,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            client_size: (width, height),
            ..Self::default()
        }
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Draw(..)))
            .count()
    }
}

impl Backend for RecordingBackend {
    fn client_size(&self) -> (u32, u32) {
        self.client_size
    }

    fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas_size = (width, height);
        self.calls.push(Call::SetCanvasSize(width, height));
    }

    fn viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, String> {
        self.calls.push(Call::CompileShader(stage));
        if self.fail_compile == Some(stage) {
            return Err(format!("ERROR: 0:1: syntax error near `{source}`"));
        }
        self.shaders += 1;
        Ok(ShaderId(self.shaders - 1))
    }

    fn link_program(&mut self, _: ShaderId, _: ShaderId) -> Result<ProgramId, String> {
        self.calls.push(Call::LinkProgram);
        if self.fail_link {
            return Err("ERROR: varyings do not match".into());
        }
        self.programs += 1;
        Ok(ProgramId(self.programs - 1))
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(Call::UseProgram(program));
    }

    fn upload_vertices(&mut self, data: &[f32]) -> Result<(), String> {
        self.calls.push(Call::UploadVertices(data.to_vec()));
        Ok(())
    }

    fn bind_attribute(&mut self, _: ProgramId, name: &str, layout: AttributeLayout) {
        self.calls.push(Call::BindAttribute(name.into(), layout));
    }

    fn set_uniform_f32(&mut self, _: ProgramId, name: &str, value: f32) {
        self.calls.push(Call::UniformF32(name.into(), value));
    }

    fn set_uniform_mat4(&mut self, _: ProgramId, name: &str, value: &[f32; 16]) {
        self.calls.push(Call::UniformMat4(name.into(), *value));
    }

    fn enable_blending(&mut self) {
        self.calls.push(Call::EnableBlending);
    }

    fn clear(&mut self, rgba: [f32; 4]) {
        self.calls.push(Call::Clear(rgba));
    }

    fn draw(&mut self, primitive: Primitive, vertex_count: usize) {
        self.calls.push(Call::Draw(primitive, vertex_count));
    }

    fn read_pixels(&mut self, width: u32, height: u32) -> Result<Vec<u8>, String> {
        self.calls.push(Call::ReadPixels(width, height));
        if self.fail_read {
            return Err("context lost".into());
        }
        // Opaque gradient so encoders have something real to chew on
        let pixels = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, 255 - v, 128, 255]
            })
            .collect();
        Ok(pixels)
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self(Rc::new(Cell::new(start)))
    }

    pub fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.0.get()
    }
}
