use enum_map::EnumMap;
use log::debug;
use shaderbind_hal::{shader::ShaderStage, uniforms::UniformSlot, Device};

use crate::{
    settings::SyncSettings,
    table::{ConstantTable, UniformHandle},
    uniform::{Uniform, UniformMut},
    LayoutError, UniformError,
};

/// Pre-resolved position of a uniform inside a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramUniform {
    pub stage: ShaderStage,
    pub handle: UniformHandle,
}

/// The constant tables of a linked shader program, one per stage.
///
/// The program itself is owned elsewhere. This only keeps its handle
/// to compare against the program bound on the device.
#[derive(Debug)]
pub struct ShaderProgram<D: Device> {
    id: D::Program,
    tables: EnumMap<ShaderStage, ConstantTable<D>>,
}

impl<D: Device> ShaderProgram<D> {
    pub fn link(
        id: D::Program,
        vertex: &[UniformSlot],
        fragment: &[UniformSlot],
        settings: SyncSettings,
    ) -> Result<Self, LayoutError> {
        let vertex = ConstantTable::from_layout(id, ShaderStage::Vertex, vertex, settings)?;
        let fragment = ConstantTable::from_layout(id, ShaderStage::Fragment, fragment, settings)?;

        Ok(Self {
            id,
            tables: EnumMap::from_array([vertex, fragment]),
        })
    }

    pub fn id(&self) -> D::Program {
        self.id
    }

    pub fn table(&self, stage: ShaderStage) -> &ConstantTable<D> {
        &self.tables[stage]
    }

    pub fn table_mut(&mut self, stage: ShaderStage) -> &mut ConstantTable<D> {
        &mut self.tables[stage]
    }

    /// Looks a uniform up by name, in the vertex stage first.
    pub fn find(&self, name: &str) -> Option<ProgramUniform> {
        ShaderStage::ALL.into_iter().find_map(|stage| {
            self.tables[stage]
                .find(name)
                .map(|handle| ProgramUniform { stage, handle })
        })
    }

    pub fn get(&self, name: &str) -> Option<&Uniform<D>> {
        let uniform = self.find(name)?;
        self.tables[uniform.stage].uniform(uniform.handle)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<UniformMut<'_, D>> {
        let uniform = self.find(name)?;
        self.uniform_mut(uniform)
    }

    /// Like [`get_mut`](Self::get_mut), but reports unknown names as an error.
    pub fn try_get_mut(&mut self, name: &str) -> Result<UniformMut<'_, D>, UniformError> {
        self.get_mut(name)
            .ok_or_else(|| UniformError::UnknownUniform(name.to_owned()))
    }

    pub fn uniform_mut(&mut self, uniform: ProgramUniform) -> Option<UniformMut<'_, D>> {
        self.tables[uniform.stage].uniform_mut(uniform.handle)
    }

    pub fn is_active(&self, device: &D) -> bool {
        device.is_bound(self.id)
    }

    /// Binds the program and pushes every cached value that the device
    /// doesn't have yet. Must precede any draw call using this program.
    pub fn activate(&mut self, device: &mut D) {
        debug!("Activating program {:?}", self.id);
        device.use_program(Some(self.id));

        for table in self.tables.values_mut() {
            table.update(device);
        }
    }

    /// Sends the constant buffers written since the last flush.
    /// Called right before each draw call.
    pub fn flush(&mut self, device: &mut D) -> bool {
        let mut flushed = false;
        for table in self.tables.values_mut() {
            flushed |= table.flush(device);
        }
        flushed
    }
}

#[cfg(test)]
mod tests {
    use shaderbind_hal::{sampler::TextureUnit, uniforms::UniformKind, Matrix4, Vector4};

    use super::*;
    use crate::headless::{DeviceCall, HeadlessDevice};

    fn program(id: u32) -> ShaderProgram<HeadlessDevice> {
        ShaderProgram::link(
            id,
            &[
                UniformSlot::constant("view_projection", UniformKind::Matrix44, 1, 0),
                UniformSlot::constant("color", UniformKind::Float4, 1, 64),
            ],
            &[
                UniformSlot::constant("color", UniformKind::Float4, 1, 0),
                UniformSlot::texture("diffuse", TextureUnit::new(1, 0)),
            ],
            SyncSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_find_prefers_vertex_stage() {
        let program = program(1);

        let color = program.find("color").unwrap();
        assert_eq!(color.stage, ShaderStage::Vertex);

        let diffuse = program.find("diffuse").unwrap();
        assert_eq!(diffuse.stage, ShaderStage::Fragment);

        assert!(program.find("missing").is_none());
    }

    #[test]
    fn test_unknown_uniform_error() {
        let mut program = program(1);
        assert_eq!(
            program.try_get_mut("missing").err().map(|e| e.to_string()),
            Some("uniform `missing` is not defined by the program".to_owned())
        );
    }

    #[test]
    fn test_link_reports_stage_errors() {
        let result = ShaderProgram::<HeadlessDevice>::link(
            1,
            &[],
            &[UniformSlot::constant("a", UniformKind::Float, 0, 0)],
            SyncSettings::default(),
        );
        assert_eq!(result.err(), Some(LayoutError::ZeroCount("a".into())));
    }

    #[test]
    fn test_activate_binds_and_updates() {
        let mut program = program(1);
        let mut device = HeadlessDevice::new();

        program
            .get_mut("view_projection")
            .unwrap()
            .set_value(&device, Matrix4::<f32>::identity(), 0);
        program.get_mut("diffuse").unwrap().set_texture(&mut device, 4);
        assert!(!program.is_active(&device));
        assert!(device.calls().is_empty());

        program.activate(&mut device);

        assert!(program.is_active(&device));
        assert_eq!(
            device.calls(),
            &[
                DeviceCall::UseProgram(Some(1)),
                DeviceCall::BindTexture {
                    unit: TextureUnit::new(1, 0),
                    texture: 4
                },
            ]
        );
        assert!(program.table(ShaderStage::Vertex).is_dirty());
        assert!(!program.table(ShaderStage::Fragment).is_dirty());
    }

    #[test]
    fn test_flush_sends_dirty_stages_only() {
        let mut program = program(1);
        let mut device = HeadlessDevice::new();
        program.activate(&mut device);
        device.clear();

        program
            .uniform_mut(ProgramUniform {
                stage: ShaderStage::Fragment,
                handle: program.table(ShaderStage::Fragment).find("color").unwrap(),
            })
            .unwrap()
            .set_value(&device, Vector4::<f32>::new(1.0, 0.0, 0.0, 1.0), 0);

        assert!(program.flush(&mut device));
        assert!(!program.flush(&mut device));

        let uploads = device.constant_uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, ShaderStage::Fragment);
    }

    #[test]
    fn test_programs_do_not_share_writes() {
        let mut first = program(1);
        let mut second = program(2);
        let mut device = HeadlessDevice::new();

        first.activate(&mut device);
        second.get_mut("color").unwrap().set_value(&device, Vector4::<f32>::repeat(1.0), 0);
        first.get_mut("color").unwrap().set_value(&device, Vector4::<f32>::repeat(0.5), 0);

        assert!(first.table(ShaderStage::Vertex).is_dirty());
        assert!(!second.table(ShaderStage::Vertex).is_dirty());
        assert!(second.get("color").unwrap().needs_update());

        second.activate(&mut device);
        assert!(second.table(ShaderStage::Vertex).is_dirty());
        assert_eq!(
            second.get("color").unwrap().value(0),
            Some(Vector4::<f32>::repeat(1.0))
        );
    }
}
