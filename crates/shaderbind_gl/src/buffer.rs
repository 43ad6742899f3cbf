use glow::HasContext;

use crate::GlError;

/// A uniform buffer object backing the constant table of one stage.
pub struct ConstantBuffer {
    pub buffer: glow::Buffer,
    pub size: usize,
}

impl ConstantBuffer {
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, GlError> {
        let buffer = gl.create_buffer().map_err(GlError::CreateBuffer)?;
        Ok(Self { buffer, size: 0 })
    }

    /// Replaces the buffer contents and attaches it to a binding point.
    /// Storage is reallocated only when the size changes.
    pub unsafe fn upload(&mut self, gl: &glow::Context, binding: u32, bytes: &[u8]) {
        gl.bind_buffer(glow::UNIFORM_BUFFER, Some(self.buffer));

        if self.size == bytes.len() {
            gl.buffer_sub_data_u8_slice(glow::UNIFORM_BUFFER, 0, bytes);
        } else {
            gl.buffer_data_u8_slice(glow::UNIFORM_BUFFER, bytes, glow::DYNAMIC_DRAW);
            self.size = bytes.len();
        }

        gl.bind_buffer_base(glow::UNIFORM_BUFFER, binding, Some(self.buffer));
    }

    pub unsafe fn destroy(&self, gl: &glow::Context) {
        gl.delete_buffer(self.buffer);
    }
}
