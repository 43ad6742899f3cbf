use std::collections::HashMap;

use glow::HasContext;
use shaderbind_hal::sampler::SamplerState;

use crate::{constants::GlConstant, GlError};

/// Sampler objects, one per distinct sampling state.
#[derive(Default)]
pub struct Samplers {
    cache: HashMap<SamplerState, glow::Sampler>,
}

impl Samplers {
    pub unsafe fn get(
        &mut self,
        gl: &glow::Context,
        state: SamplerState,
    ) -> Result<glow::Sampler, GlError> {
        if let Some(sampler) = self.cache.get(&state) {
            return Ok(*sampler);
        }

        let sampler = gl.create_sampler().map_err(GlError::CreateSampler)?;

        let wrap_gl = state.wrap.gl_const();
        let min_filter_gl = state.min_filter.gl_const();
        let mag_filter_gl = state.mag_filter.gl_const();

        gl.sampler_parameter_i32(sampler, glow::TEXTURE_WRAP_S, wrap_gl as i32);
        gl.sampler_parameter_i32(sampler, glow::TEXTURE_WRAP_T, wrap_gl as i32);
        gl.sampler_parameter_i32(sampler, glow::TEXTURE_MIN_FILTER, min_filter_gl as i32);
        gl.sampler_parameter_i32(sampler, glow::TEXTURE_MAG_FILTER, mag_filter_gl as i32);

        self.cache.insert(state, sampler);
        Ok(sampler)
    }

    pub fn drain(&mut self, gl: &glow::Context) {
        for (_, sampler) in self.cache.drain() {
            unsafe {
                gl.delete_sampler(sampler);
            }
        }
    }
}
