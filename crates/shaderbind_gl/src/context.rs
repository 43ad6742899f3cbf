use enum_map::EnumMap;
use glow::HasContext;
use log::{debug, error, warn};
use shaderbind_hal::{
    sampler::{SamplerState, TextureUnit},
    shader::ShaderStage,
    Device,
};

use crate::{buffer::ConstantBuffer, samplers::Samplers, GlSettings};

pub const MAX_TEXTURES: usize = 32;

#[derive(Default, Clone, Copy)]
pub struct TextureUnitState {
    pub texture: Option<glow::Texture>,
    pub sampler: Option<SamplerState>,
}

/// Objects currently bound on the context, used to skip redundant calls.
#[derive(Default)]
pub struct GlState {
    pub bound_program: Option<glow::Program>,
    pub active_texture_unit: u32,
    pub texture_unit_limit: usize,
    pub texture_units: [TextureUnitState; MAX_TEXTURES],
}

/// A [`Device`] on top of an OpenGL 3.3 or OpenGL ES 3.0 context.
///
/// Each stage's constants live in a uniform buffer object attached to the
/// binding point named in [`GlSettings`]. Textures are sampled through
/// sampler objects, configured per sampler unit with
/// [`set_sampler_unit`](Self::set_sampler_unit).
///
/// Constant bytes are uploaded as they are packed by the tables. Blocks are
/// laid out by std140 rules, where every array element takes 16 bytes, so
/// `float` and `vec3` arrays must be declared as `vec4` arrays in the shader
/// (or the block declared with a matching packed layout).
pub struct GlDevice {
    pub gl: glow::Context,
    pub settings: GlSettings,
    state: GlState,
    samplers: Samplers,
    sampler_units: Vec<SamplerState>,
    constant_buffers: EnumMap<ShaderStage, Option<ConstantBuffer>>,
}

impl Drop for GlDevice {
    fn drop(&mut self) {
        for i in 0..self.state.texture_unit_limit {
            unsafe { self.gl.bind_sampler(i as u32, None) };
        }
        self.samplers.drain(&self.gl);

        for buffer in self.constant_buffers.values().flatten() {
            unsafe { buffer.destroy(&self.gl) };
        }
    }
}

impl GlDevice {
    /// # Safety
    ///
    /// The context must be current on this thread for the whole
    /// lifetime of the device.
    pub unsafe fn new(gl: glow::Context, settings: GlSettings) -> Self {
        let texture_unit_limit = (gl.get_parameter_i32(glow::MAX_TEXTURE_IMAGE_UNITS) as usize)
            .min(MAX_TEXTURES);

        Self {
            gl,
            settings,
            state: GlState {
                texture_unit_limit,
                ..Default::default()
            },
            samplers: Default::default(),
            sampler_units: Vec::new(),
            constant_buffers: Default::default(),
        }
    }

    /// Attaches the constant blocks of a freshly linked program to the
    /// binding points their buffers are uploaded to.
    pub fn bind_constant_blocks(&self, program: glow::Program) {
        for stage in ShaderStage::ALL {
            let (name, binding) = self.settings.block(stage);
            match unsafe { self.gl.get_uniform_block_index(program, name) } {
                Some(index) => unsafe { self.gl.uniform_block_binding(program, index, binding) },
                None => debug!("Program {:?} has no `{}` block", program, name),
            }
        }
    }

    /// Sets the sampling parameters used by textures bound through `unit`.
    pub fn set_sampler_unit(&mut self, unit: u32, state: SamplerState) {
        let unit = unit as usize;
        if self.sampler_units.len() <= unit {
            self.sampler_units.resize(unit + 1, SamplerState::default());
        }
        self.sampler_units[unit] = state;
    }

    fn activate_texture_unit(&mut self, unit: u32) {
        if self.state.active_texture_unit != unit {
            unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
            self.state.active_texture_unit = unit;
        }
    }

    fn bind_sampler_object(&mut self, unit: u32, state: SamplerState) {
        if self.state.texture_units[unit as usize].sampler == Some(state) {
            return;
        }

        let sampler = match unsafe { self.samplers.get(&self.gl, state) } {
            Ok(sampler) => sampler,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        unsafe { self.gl.bind_sampler(unit, Some(sampler)) };
        self.state.texture_units[unit as usize].sampler = Some(state);
    }
}

impl Device for GlDevice {
    type Program = glow::Program;
    type Texture = glow::Texture;

    fn bound_program(&self) -> Option<glow::Program> {
        self.state.bound_program
    }

    fn use_program(&mut self, program: Option<glow::Program>) {
        if self.state.bound_program != program {
            unsafe { self.gl.use_program(program) };
            self.state.bound_program = program;
        }
    }

    fn bind_constant_buffer(&mut self, stage: ShaderStage, bytes: &[u8]) {
        let (_, binding) = self.settings.block(stage);

        if self.constant_buffers[stage].is_none() {
            match unsafe { ConstantBuffer::new(&self.gl) } {
                Ok(buffer) => self.constant_buffers[stage] = Some(buffer),
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            }
        }

        if let Some(buffer) = &mut self.constant_buffers[stage] {
            unsafe { buffer.upload(&self.gl, binding, bytes) };
        }
    }

    fn bind_texture(&mut self, unit: TextureUnit, texture: glow::Texture) {
        if unit.texture as usize >= self.state.texture_unit_limit {
            warn!(
                "Texture unit {} is out of the supported {} units",
                unit.texture, self.state.texture_unit_limit
            );
            return;
        }

        if self.state.texture_units[unit.texture as usize].texture != Some(texture) {
            self.activate_texture_unit(unit.texture);
            unsafe { self.gl.bind_texture(glow::TEXTURE_2D, Some(texture)) };
            self.state.texture_units[unit.texture as usize].texture = Some(texture);
        }

        let state = self
            .sampler_units
            .get(unit.sampler as usize)
            .copied()
            .unwrap_or_default();
        self.bind_sampler_object(unit.texture, state);
    }
}
