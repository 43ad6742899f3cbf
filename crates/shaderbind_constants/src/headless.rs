use shaderbind_hal::{sampler::TextureUnit, shader::ShaderStage, Device};

/// A device call recorded by [`HeadlessDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    UseProgram(Option<u32>),
    BindConstantBuffer { stage: ShaderStage, bytes: Vec<u8> },
    BindTexture { unit: TextureUnit, texture: u32 },
}

/// A device without a GPU behind it. Programs and textures are plain numbers,
/// and every call is recorded in order.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    bound_program: Option<u32>,
    calls: Vec<DeviceCall>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Forgets the recorded calls, keeping the bound program.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn texture_binds(&self) -> Vec<(TextureUnit, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::BindTexture { unit, texture } => Some((*unit, *texture)),
                _ => None,
            })
            .collect()
    }

    pub fn constant_uploads(&self) -> Vec<(ShaderStage, &[u8])> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::BindConstantBuffer { stage, bytes } => Some((*stage, bytes.as_slice())),
                _ => None,
            })
            .collect()
    }
}

impl Device for HeadlessDevice {
    type Program = u32;
    type Texture = u32;

    fn bound_program(&self) -> Option<u32> {
        self.bound_program
    }

    fn use_program(&mut self, program: Option<u32>) {
        self.bound_program = program;
        self.calls.push(DeviceCall::UseProgram(program));
    }

    fn bind_constant_buffer(&mut self, stage: ShaderStage, bytes: &[u8]) {
        self.calls.push(DeviceCall::BindConstantBuffer {
            stage,
            bytes: bytes.to_vec(),
        });
    }

    fn bind_texture(&mut self, unit: TextureUnit, texture: u32) {
        self.calls.push(DeviceCall::BindTexture { unit, texture });
    }
}
