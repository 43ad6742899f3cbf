//! OpenGL backend for shader constants, built on [`glow`].

pub use context::GlDevice;
pub use error::GlError;
pub use settings::GlSettings;

mod buffer;
mod constants;
mod context;
mod error;
mod samplers;
mod settings;
