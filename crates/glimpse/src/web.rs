//! Browser bindings: a WebGL 1 [`Backend`], a `performance.now()` clock and
//! the `requestAnimationFrame` loop.

use crate::backend::{AttributeLayout, Backend, Primitive, ProgramId, ShaderId, ShaderStage};
use crate::clock::Clock;
use crate::error::{EffectError, Result};
use crate::host::{Glimpse, Scene};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    HtmlCanvasElement, Performance, WebGlBuffer, WebGlProgram, WebGlRenderingContext as Gl,
    WebGlShader, Window,
};

const FLOAT_BYTES: i32 = 4;

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| EffectError::Backend("no global window".into()))
}

fn js_error(value: wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// WebGL 1 context on a canvas element.
pub struct WebGlBackend {
    canvas: HtmlCanvasElement,
    gl: Gl,
    buffer: Option<WebGlBuffer>,
    shaders: Vec<WebGlShader>,
    programs: Vec<WebGlProgram>,
}

impl WebGlBackend {
    /// Acquire `webgl`, falling back to `experimental-webgl`.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let context = ["webgl", "experimental-webgl"]
            .into_iter()
            .find_map(|kind| canvas.get_context(kind).ok().flatten())
            .ok_or(EffectError::NoContext)?;
        let gl = context.dyn_into::<Gl>().map_err(|_| EffectError::NoContext)?;

        Ok(Self {
            canvas,
            gl,
            buffer: None,
            shaders: Vec::new(),
            programs: Vec::new(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn program(&self, id: ProgramId) -> Option<&WebGlProgram> {
        self.programs.get(id.0)
    }
}

impl Backend for WebGlBackend {
    #[allow(clippy::cast_sign_loss)]
    fn client_size(&self) -> (u32, u32) {
        (
            self.canvas.client_width().max(0) as u32,
            self.canvas.client_height().max(0) as u32,
        )
    }

    fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    #[allow(clippy::cast_possible_wrap)]
    fn viewport(&mut self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, String> {
        let kind = match stage {
            ShaderStage::Vertex => Gl::VERTEX_SHADER,
            ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
        };
        let shader = self
            .gl
            .create_shader(kind)
            .ok_or_else(|| "unable to create shader object".to_string())?;
        self.gl.shader_source(&shader, source);
        self.gl.compile_shader(&shader);

        let compiled = self
            .gl
            .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !compiled {
            let log = self.gl.get_shader_info_log(&shader).unwrap_or_default();
            self.gl.delete_shader(Some(&shader));
            return Err(log);
        }

        self.shaders.push(shader);
        Ok(ShaderId(self.shaders.len() - 1))
    }

    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId, String> {
        let (Some(vs), Some(fs)) = (self.shaders.get(vertex.0), self.shaders.get(fragment.0)) else {
            return Err("unknown shader".into());
        };
        let program = self
            .gl
            .create_program()
            .ok_or_else(|| "unable to create program object".to_string())?;
        self.gl.attach_shader(&program, vs);
        self.gl.attach_shader(&program, fs);
        self.gl.link_program(&program);

        let linked = self
            .gl
            .get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !linked {
            let log = self.gl.get_program_info_log(&program).unwrap_or_default();
            self.gl.delete_program(Some(&program));
            return Err(log);
        }

        self.programs.push(program);
        Ok(ProgramId(self.programs.len() - 1))
    }

    fn use_program(&mut self, program: ProgramId) {
        self.gl.use_program(self.program(program));
    }

    fn upload_vertices(&mut self, data: &[f32]) -> Result<(), String> {
        if self.buffer.is_none() {
            self.buffer = self.gl.create_buffer();
        }
        let buffer = self.buffer.as_ref().ok_or("unable to create buffer")?;
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));

        let array = js_sys::Float32Array::from(data);
        self.gl
            .buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::STATIC_DRAW);
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn bind_attribute(&mut self, program: ProgramId, name: &str, layout: AttributeLayout) {
        let Some(program) = self.program(program) else {
            return;
        };
        let location = self.gl.get_attrib_location(program, name);
        if location < 0 {
            return;
        }
        let location = location as u32;
        self.gl.vertex_attrib_pointer_with_i32(
            location,
            layout.components as i32,
            Gl::FLOAT,
            false,
            layout.stride as i32 * FLOAT_BYTES,
            layout.offset as i32 * FLOAT_BYTES,
        );
        self.gl.enable_vertex_attrib_array(location);
    }

    fn set_uniform_f32(&mut self, program: ProgramId, name: &str, value: f32) {
        let Some(program) = self.program(program) else {
            return;
        };
        let location = self.gl.get_uniform_location(program, name);
        self.gl.uniform1f(location.as_ref(), value);
    }

    fn set_uniform_mat4(&mut self, program: ProgramId, name: &str, value: &[f32; 16]) {
        let Some(program) = self.program(program) else {
            return;
        };
        let location = self.gl.get_uniform_location(program, name);
        self.gl
            .uniform_matrix4fv_with_f32_array(location.as_ref(), false, value);
    }

    fn enable_blending(&mut self) {
        self.gl.enable(Gl::BLEND);
        self.gl.blend_func(Gl::ONE, Gl::ONE_MINUS_SRC_ALPHA);
    }

    fn clear(&mut self, [r, g, b, a]: [f32; 4]) {
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(Gl::COLOR_BUFFER_BIT);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw(&mut self, primitive: Primitive, vertex_count: usize) {
        let mode = match primitive {
            Primitive::Triangles => Gl::TRIANGLES,
            Primitive::Lines => Gl::LINES,
        };
        self.gl.draw_arrays(mode, 0, vertex_count as i32);
    }

    #[allow(clippy::cast_possible_wrap)]
    fn read_pixels(&mut self, width: u32, height: u32) -> Result<Vec<u8>, String> {
        let mut pixels = vec![0; width as usize * height as usize * 4];
        self.gl
            .read_pixels_with_opt_u8_array(
                0,
                0,
                width as i32,
                height as i32,
                Gl::RGBA,
                Gl::UNSIGNED_BYTE,
                Some(&mut pixels),
            )
            .map_err(js_error)?;
        Ok(pixels)
    }
}

/// `performance.now()`.
#[derive(Clone)]
pub struct PerformanceClock {
    performance: Performance,
}

impl PerformanceClock {
    pub fn new() -> Result<Self> {
        let performance = window()?
            .performance()
            .ok_or_else(|| EffectError::Backend("performance API unavailable".into()))?;
        Ok(Self { performance })
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        self.performance.now()
    }
}

type FrameCallback = Closure<dyn FnMut()>;

/// Keeps the animation loop and resize listener alive; dropping it stops both.
pub struct AnimationHandle {
    window: Window,
    running: Rc<RefCell<bool>>,
    frame: Rc<RefCell<Option<FrameCallback>>>,
    on_resize: FrameCallback,
}

impl AnimationHandle {
    pub fn stop(&self) {
        *self.running.borrow_mut() = false;
    }

    /// False after `stop` or once the browser refused to queue a frame.
    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }
}

/// Queue `callback` for the next frame. A refusal is logged and ends the loop.
fn schedule(window: &Window, callback: &FrameCallback, running: &RefCell<bool>) {
    if let Err(err) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        tracing::error!(err = %js_error(err), "requestAnimationFrame failed, animation stopped");
        *running.borrow_mut() = false;
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.stop();
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
        // Break the frame closure's reference to itself
        self.frame.borrow_mut().take();
    }
}

/// Render `glimpse` on every animation frame and follow window resizes.
pub fn animate<B, C, S>(glimpse: Rc<RefCell<Glimpse<B, C, S>>>) -> Result<AnimationHandle>
where
    B: Backend + 'static,
    C: Clock + 'static,
    S: Scene<B> + 'static,
{
    let window = window()?;
    let running = Rc::new(RefCell::new(true));
    let frame: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

    let on_resize = {
        let glimpse = Rc::clone(&glimpse);
        Closure::<dyn FnMut()>::new(move || {
            if let Err(err) = glimpse.borrow_mut().handle_resize_event() {
                tracing::error!(%err, "resize failed");
            }
        })
    };
    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(|err| EffectError::Backend(js_error(err)))?;

    {
        let window = window.clone();
        let running = Rc::clone(&running);
        let next = Rc::clone(&frame);
        *frame.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            if !*running.borrow() {
                return;
            }
            glimpse.borrow_mut().render();
            if let Some(callback) = next.borrow().as_ref() {
                schedule(&window, callback, &running);
            }
        }));
    }

    if let Some(callback) = frame.borrow().as_ref() {
        window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|err| EffectError::Backend(js_error(err)))?;
    }

    Ok(AnimationHandle {
        window,
        running,
        frame,
        on_resize,
    })
}
