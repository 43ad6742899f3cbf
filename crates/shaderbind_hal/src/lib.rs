use std::fmt::Debug;

use sampler::TextureUnit;
use shader::ShaderStage;

pub use nalgebra::{Matrix4, Vector3, Vector4};

pub mod sampler;
pub mod shader;
pub mod uniforms;

/// Device is the part of a rendering context that constant synchronization talks to.
///
/// Program and texture handles are opaque to this crate: they are compared and copied,
/// never created or destroyed. Their lifetime is owned by whoever links programs
/// and loads textures.
pub trait Device
where
    Self: 'static,
{
    type Program: Copy + Eq + Debug;
    type Texture: Copy + Eq + Debug;

    /// Returns the program currently bound for drawing.
    ///
    /// This is the only source of truth used to decide whether a uniform write
    /// goes straight into GPU-visible storage or is deferred until the program
    /// is activated.
    fn bound_program(&self) -> Option<Self::Program>;

    /// Binds a program for the following draw calls.
    fn use_program(&mut self, program: Option<Self::Program>);

    /// Transfers the packed constant bytes of a stage to device storage.
    fn bind_constant_buffer(&mut self, stage: ShaderStage, bytes: &[u8]);

    /// Binds a texture to a texture unit, sampled through the given sampler unit.
    fn bind_texture(&mut self, unit: TextureUnit, texture: Self::Texture);

    fn is_bound(&self, program: Self::Program) -> bool {
        self.bound_program() == Some(program)
    }
}
