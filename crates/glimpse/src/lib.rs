//! Shader-driven canvas effects.
//!
//! Two effects ship with the crate:
//!
//! - [`PixelCanvas`]: a full-screen quad running a user-supplied fragment
//!   shader with a `time` uniform.
//! - [`Wave`]: a tilted wireframe plane rippled by a sine wave in the vertex
//!   shader.
//!
//! Both run inside a [`Glimpse`] host that owns the animation clock
//! (pause, resume, exact stepping), follows canvas resizes, and can capture
//! stills at arbitrary sizes with [`Glimpse::to_blob`].
//!
//! Graphics go through the [`Backend`] trait. With the `web` feature on
//! `wasm32`, `web::WebGlBackend` binds it to a real canvas and
//! `web::animate` drives frames from `requestAnimationFrame`.
//!
//! ```ignore
//! let canvas = WebGlBackend::new(element)?;
//! let wave = Glimpse::new(canvas, PerformanceClock::new()?, Wave::new())?;
//! let handle = web::animate(Rc::new(RefCell::new(wave)))?;
//! ```

pub mod backend;
pub mod clock;
pub mod encode;
mod error;
pub mod host;
pub mod math;
pub mod mesh;
pub mod pixel;
pub mod timeline;
pub mod wave;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

#[cfg(test)]
mod testing;

pub use backend::Backend;
pub use clock::{Clock, SystemClock};
pub use encode::Blob;
pub use error::{EffectError, Result};
pub use host::{Glimpse, Scene};
pub use math::Mat4;
pub use mesh::PlaneGeometry;
pub use pixel::{CanvasConfig, PixelCanvas, PixelShader};
pub use timeline::Timeline;
pub use wave::Wave;
